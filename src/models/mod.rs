// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Point, Coordinates, Query, SortKey, RankedPoint, BoundingBox, UNNAMED_PLACEHOLDER, ADDRESS_PLACEHOLDER};
pub use requests::{CafeSearchParams, CreateCafeRequest, RankRequest};
pub use responses::{HealthResponse, ErrorResponse, DeleteResponse, ImportResponse};
