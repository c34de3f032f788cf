// Service exports
pub mod overpass;
pub mod store;

pub use overpass::{OverpassClient, OverpassElement, OverpassError, normalize_element};
pub use store::{PointStore, StoreError};
