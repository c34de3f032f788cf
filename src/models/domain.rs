use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Name substituted when a point arrives without one
pub const UNNAMED_PLACEHOLDER: &str = "Unnamed Cafe";

/// Address substituted when a point arrives without one
pub const ADDRESS_PLACEHOLDER: &str = "Unknown address";

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinates> for geo::Point<f64> {
    fn from(value: Coordinates) -> Self {
        geo::Point::new(value.lon, value.lat)
    }
}

/// A cafe as supplied by the store or the ingestion layer
///
/// Coordinates live in the flat `lat`/`lon` fields on the wire and are
/// `None` when either is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: i64,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,
    #[serde(default = "default_address")]
    pub address: String,
    pub rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_name() -> String {
    UNNAMED_PLACEHOLDER.to_string()
}

fn default_address() -> String {
    ADDRESS_PLACEHOLDER.to_string()
}

/// Ordering criterion for ranked results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    RatingDesc,
    RatingAsc,
    NameAsc,
    NameDesc,
    DistanceAsc,
    DistanceDesc,
}

impl SortKey {
    /// Parse a sort key, falling back to `RatingDesc` for anything unrecognized
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "rating_asc" => SortKey::RatingAsc,
            "name_asc" => SortKey::NameAsc,
            "name_desc" => SortKey::NameDesc,
            "distance_asc" => SortKey::DistanceAsc,
            "distance_desc" => SortKey::DistanceDesc,
            _ => SortKey::RatingDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::RatingDesc => "rating_desc",
            SortKey::RatingAsc => "rating_asc",
            SortKey::NameAsc => "name_asc",
            SortKey::NameDesc => "name_desc",
            SortKey::DistanceAsc => "distance_asc",
            SortKey::DistanceDesc => "distance_desc",
        }
    }

    pub fn is_distance(&self) -> bool {
        matches!(self, SortKey::DistanceAsc | SortKey::DistanceDesc)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SortKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => SortKey::parse(&s),
            _ => SortKey::default(),
        })
    }
}

/// Filter and ordering parameters for a ranking call
///
/// Numeric fields use `None` for "not supplied". A supplied NaN is treated
/// the same way, and zero is always a real value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default)]
    pub search_text: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub user_position: Option<Coordinates>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub sort_key: SortKey,
}

impl Query {
    /// Rating floor, if one is in effect
    pub fn rating_floor(&self) -> Option<f64> {
        self.min_rating.filter(|r| !r.is_nan())
    }

    /// Radius in kilometres, if radius filtering is in effect
    pub fn active_radius(&self) -> Option<f64> {
        self.user_position?;
        self.radius_km.filter(|r| r.is_finite() && *r >= 0.0)
    }

    /// Case-folded search text, `None` when no text filter applies
    pub fn needle(&self) -> Option<String> {
        let needle = self.search_text.trim().to_lowercase();
        if needle.is_empty() {
            None
        } else {
            Some(needle)
        }
    }
}

/// Parse a loosely-typed numeric value: finite numbers and numeric strings
/// are accepted, everything else (including `inf` and `NaN`) becomes `None`
pub fn parse_lenient_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => parse_lenient_f64(&s),
        _ => None,
    })
}

/// A point after ranking, with its distance from the user when known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPoint {
    #[serde(flatten)]
    pub point: Point,
    #[serde(rename = "distanceKm", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl RankedPoint {
    pub fn new(point: Point) -> Self {
        Self {
            point,
            distance_km: None,
        }
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
