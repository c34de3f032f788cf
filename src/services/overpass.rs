use crate::config::OverpassSettings;
use crate::core::distance::calculate_bounding_box;
use crate::models::{BoundingBox, Coordinates, Point, UNNAMED_PLACEHOLDER};
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Number of tag values copied onto an ingested point
const MAX_TAGS: usize = 3;

/// Range of the synthetic ratings given to ingested points
const MOCK_RATING_MIN: f64 = 3.0;
const MOCK_RATING_MAX: f64 = 5.0;

/// Errors that can occur when fetching from Overpass
#[derive(Debug, Error)]
pub enum OverpassError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

/// Raw element as returned by `out center;`
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Node position, falling back to the centre of ways and relations
    fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => self.center.map(|c| Coordinates::new(c.lat, c.lon)),
        }
    }
}

/// Overpass API client
///
/// Fetches amenities inside a box around the configured city centre and
/// normalizes them into point records.
pub struct OverpassClient {
    endpoint: String,
    bounding_box: BoundingBox,
    amenity: String,
    city: String,
    timeout_secs: u64,
    client: Client,
}

impl OverpassClient {
    /// Create a new Overpass client
    pub fn new(settings: &OverpassSettings) -> Result<Self, OverpassError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs + 5))
            .build()?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            bounding_box: calculate_bounding_box(
                settings.center_lat,
                settings.center_lon,
                settings.radius_km,
            ),
            amenity: settings.amenity.clone(),
            city: settings.city.clone(),
            timeout_secs: settings.timeout_secs,
            client,
        })
    }

    /// Overpass QL for every node, way and relation with the amenity
    pub fn query(&self) -> String {
        let bbox = format!(
            "{},{},{},{}",
            self.bounding_box.min_lat,
            self.bounding_box.min_lon,
            self.bounding_box.max_lat,
            self.bounding_box.max_lon
        );

        format!(
            "[out:json][timeout:{timeout}];(node[\"amenity\"=\"{amenity}\"]({bbox});way[\"amenity\"=\"{amenity}\"]({bbox});relation[\"amenity\"=\"{amenity}\"]({bbox}););out center;",
            timeout = self.timeout_secs,
            amenity = self.amenity,
            bbox = bbox,
        )
    }

    /// Fetch raw elements from the interpreter endpoint
    pub async fn fetch_elements(&self) -> Result<Vec<OverpassElement>, OverpassError> {
        let query = self.query();
        tracing::debug!("Querying Overpass at {}: {}", self.endpoint, query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("data", query.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OverpassError::ApiError(format!(
                "Failed to fetch elements: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: OverpassResponse = serde_json::from_str(&body)
            .map_err(|e| OverpassError::InvalidResponse(format!("Failed to parse elements: {}", e)))?;

        Ok(parsed.elements)
    }

    /// Fetch and normalize cafes
    pub async fn fetch_points(&self) -> Result<Vec<Point>, OverpassError> {
        let elements = self.fetch_elements().await?;
        let mut rng = rand::thread_rng();

        let points: Vec<Point> = elements
            .iter()
            .map(|el| normalize_element(el, &self.city, &mut rng))
            .collect();

        tracing::info!("Fetched {} {} elements from Overpass", points.len(), self.amenity);
        Ok(points)
    }
}

/// Turn a raw Overpass element into a point record
///
/// Ratings are synthetic: OpenStreetMap carries none, so each point gets a
/// uniform draw in `[3.0, 5.0)` from the supplied generator.
pub fn normalize_element<R: Rng + ?Sized>(element: &OverpassElement, city: &str, rng: &mut R) -> Point {
    Point {
        id: element.id,
        name: element
            .tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| UNNAMED_PLACEHOLDER.to_string()),
        coordinates: element.coordinates(),
        address: element
            .tags
            .get("addr:street")
            .cloned()
            .unwrap_or_else(|| city.to_string()),
        rating: rng.gen_range(MOCK_RATING_MIN..MOCK_RATING_MAX),
        tags: element.tags.values().take(MAX_TAGS).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings(endpoint: String) -> OverpassSettings {
        OverpassSettings {
            endpoint,
            center_lat: 9.9252,
            center_lon: 78.1198,
            radius_km: 14.0,
            timeout_secs: 25,
            city: "Madurai".to_string(),
            amenity: "cafe".to_string(),
        }
    }

    fn element(json: &str) -> OverpassElement {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_node() {
        let el = element(
            r#"{"type":"node","id":101,"lat":9.93,"lon":78.12,
                "tags":{"amenity":"cafe","name":"Sunrise Cafe","addr:street":"Town Hall Road","cuisine":"coffee_shop"}}"#,
        );
        let mut rng = StdRng::seed_from_u64(7);
        let point = normalize_element(&el, "Madurai", &mut rng);

        assert_eq!(point.id, 101);
        assert_eq!(point.name, "Sunrise Cafe");
        assert_eq!(point.address, "Town Hall Road");
        assert_eq!(point.coordinates, Some(Coordinates::new(9.93, 78.12)));
        assert!(point.rating >= 3.0 && point.rating < 5.0);
        // Values in key order: addr:street, amenity, cuisine
        assert_eq!(point.tags, vec!["Town Hall Road", "cafe", "coffee_shop"]);
    }

    #[test]
    fn test_normalize_way_uses_center_and_placeholders() {
        let el = element(r#"{"type":"way","id":202,"center":{"lat":9.91,"lon":78.10},"tags":{"amenity":"cafe"}}"#);
        let mut rng = StdRng::seed_from_u64(7);
        let point = normalize_element(&el, "Madurai", &mut rng);

        assert_eq!(point.name, UNNAMED_PLACEHOLDER);
        assert_eq!(point.address, "Madurai");
        assert_eq!(point.coordinates, Some(Coordinates::new(9.91, 78.10)));
    }

    #[test]
    fn test_normalize_without_geometry() {
        let el = element(r#"{"type":"relation","id":303}"#);
        let mut rng = StdRng::seed_from_u64(7);
        let point = normalize_element(&el, "Madurai", &mut rng);

        assert!(point.coordinates.is_none());
        assert!(point.tags.is_empty());
    }

    #[test]
    fn test_query_contains_bbox() {
        let client = OverpassClient::new(&settings("http://localhost".to_string())).unwrap();
        let query = client.query();

        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains("node[\"amenity\"=\"cafe\"]"));
        assert!(query.contains("relation[\"amenity\"=\"cafe\"]"));
        assert!(query.ends_with("out center;"));
    }

    #[tokio::test]
    async fn test_fetch_points_from_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/interpreter")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"elements":[
                    {"type":"node","id":1,"lat":9.93,"lon":78.12,"tags":{"name":"Sunrise Cafe"}},
                    {"type":"way","id":2,"center":{"lat":9.91,"lon":78.10},"tags":{"name":"Moonlight Cafe"}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = OverpassClient::new(&settings(format!("{}/api/interpreter", server.url()))).unwrap();
        let points = client.fetch_points().await.unwrap();

        mock.assert_async().await;
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].name, "Moonlight Cafe");
    }

    #[tokio::test]
    async fn test_fetch_maps_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/interpreter")
            .match_query(mockito::Matcher::Any)
            .with_status(504)
            .create_async()
            .await;

        let client = OverpassClient::new(&settings(format!("{}/api/interpreter", server.url()))).unwrap();
        let result = client.fetch_points().await;

        assert!(matches!(result, Err(OverpassError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_garbage() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/interpreter")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>rate limited</html>")
            .create_async()
            .await;

        let client = OverpassClient::new(&settings(format!("{}/api/interpreter", server.url()))).unwrap();
        let result = client.fetch_points().await;

        assert!(matches!(result, Err(OverpassError::InvalidResponse(_))));
    }
}
