//! Cafe Finder - distance-aware filtering and ranking of cafes
//!
//! The heart of the crate is [`rank`](crate::core::rank), a pure pipeline that filters a
//! collection of cafes by text, rating and radius, annotates distances from
//! the user and sorts the result. The HTTP routes and the Overpass importer
//! are thin collaborators around it.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{rank, distance::haversine_distance};
pub use models::{Point, Coordinates, Query, SortKey, RankedPoint};
