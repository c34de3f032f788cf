// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod ranker;
pub mod sorting;

pub use distance::{haversine_distance, distance_between, calculate_bounding_box};
pub use filters::{matches_text, meets_rating, annotate_distance, within_radius};
pub use ranker::rank;
pub use sorting::{sort_ranked, compare_names, compare_distances};
