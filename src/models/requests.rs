use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{parse_lenient_f64, Coordinates, Point, Query, SortKey, ADDRESS_PLACEHOLDER};

/// Query string for listing stored cafes
///
/// GET /api/v1/cafes?search=&minRating=&lat=&lon=&radius=&sort=
///
/// Every field is kept as raw text so that a malformed number switches its
/// filter off instead of rejecting the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CafeSearchParams {
    pub search: Option<String>,
    #[serde(rename = "minRating")]
    pub min_rating: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub radius: Option<String>,
    pub sort: Option<String>,
}

impl CafeSearchParams {
    /// Coerce the raw parameters into an engine query
    pub fn into_query(self) -> Query {
        let lat = self.lat.as_deref().and_then(parse_lenient_f64);
        let lon = self.lon.as_deref().and_then(parse_lenient_f64);

        Query {
            search_text: self.search.unwrap_or_default(),
            min_rating: self.min_rating.as_deref().and_then(parse_lenient_f64),
            user_position: match (lat, lon) {
                (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
                _ => None,
            },
            radius_km: self.radius.as_deref().and_then(parse_lenient_f64),
            sort_key: self
                .sort
                .as_deref()
                .map(SortKey::parse)
                .unwrap_or_default(),
        }
    }
}

/// Request to store a new cafe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCafeRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateCafeRequest {
    /// Build the record to persist once an id has been assigned
    pub fn into_point(self, id: i64) -> Point {
        let coordinates = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        };

        Point {
            id,
            name: self.name,
            coordinates,
            address: self
                .address
                .unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_string()),
            rating: self.rating,
            tags: self.tags,
        }
    }
}

/// Request to rank a caller-supplied collection
///
/// POST /api/v1/cafes/rank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRequest {
    pub points: Vec<Point>,
    pub query: Query,
}
