use crate::models::{Coordinates, Point, RankedPoint};
use super::distance::distance_between;

/// Separator used when matching against a point's tag list
const TAG_SEPARATOR: &str = ", ";

/// Check if a point matches a case-folded search needle
///
/// Stage 1 of the ranking pipeline. Name, address and the joined tag list
/// are each checked on their own, so a match never spans two fields.
#[inline]
pub fn matches_text(point: &Point, needle: &str) -> bool {
    point.name.to_lowercase().contains(needle)
        || point.address.to_lowercase().contains(needle)
        || point.tags.join(TAG_SEPARATOR).to_lowercase().contains(needle)
}

/// Check if a point meets the rating floor
///
/// Stage 2. A NaN rating never passes an active floor.
#[inline]
pub fn meets_rating(point: &Point, min_rating: f64) -> bool {
    point.rating >= min_rating
}

/// Annotate a point with its distance from the user
///
/// Stage 3. Points without coordinates get no distance.
#[inline]
pub fn annotate_distance(point: &Point, user_position: &Coordinates) -> Option<f64> {
    point
        .coordinates
        .as_ref()
        .map(|coords| distance_between(user_position, coords))
}

/// Check if an annotated point lies inside the search radius
///
/// Stage 4. Points without a distance are outside every radius.
#[inline]
pub fn within_radius(ranked: &RankedPoint, radius_km: f64) -> bool {
    matches!(ranked.distance_km, Some(d) if d <= radius_km)
}
