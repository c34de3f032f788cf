use crate::models::{Point, Query, RankedPoint};
use crate::core::{
    filters::{annotate_distance, matches_text, meets_rating, within_radius},
    sorting::sort_ranked,
};

/// Filter, annotate and order a collection of points
///
/// # Pipeline Stages
/// 1. Text filter over name, address and tags
/// 2. Rating floor
/// 3. Distance annotation (only with a user position)
/// 4. Radius filter (only with a user position and a valid radius)
/// 5. Stable sort by the requested key
///
/// The input is never modified; every returned record is a fresh clone.
/// Malformed numeric query fields switch their filter off instead of failing.
pub fn rank(points: &[Point], query: &Query) -> Vec<RankedPoint> {
    let needle = query.needle();
    let rating_floor = query.rating_floor();
    let radius = query.active_radius();

    let mut ranked: Vec<RankedPoint> = points
        .iter()
        // Stage 1: Text filter
        .filter(|point| needle.as_deref().map_or(true, |n| matches_text(point, n)))
        // Stage 2: Rating filter
        .filter(|point| rating_floor.map_or(true, |floor| meets_rating(point, floor)))
        // Stage 3: Distance annotation
        .map(|point| RankedPoint {
            point: point.clone(),
            distance_km: query
                .user_position
                .as_ref()
                .and_then(|position| annotate_distance(point, position)),
        })
        // Stage 4: Radius filter
        .filter(|ranked| radius.map_or(true, |r| within_radius(ranked, r)))
        .collect();

    // Stage 5: Sort
    sort_ranked(&mut ranked, query.sort_key);

    tracing::debug!(
        "Ranked {} of {} points (sort: {}, radius: {:?})",
        ranked.len(),
        points.len(),
        query.sort_key,
        radius
    );

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance::haversine_distance;
    use crate::models::{Coordinates, SortKey};

    fn create_point(id: i64, name: &str, rating: f64, coords: Option<(f64, f64)>) -> Point {
        Point {
            id,
            name: name.to_string(),
            coordinates: coords.map(|(lat, lon)| Coordinates::new(lat, lon)),
            address: "Madurai".to_string(),
            rating,
            tags: vec!["cafe".to_string()],
        }
    }

    fn create_points() -> Vec<Point> {
        vec![
            create_point(1, "Sunrise Cafe", 4.5, Some((9.93, 78.12))),
            create_point(2, "Moonlight Cafe", 3.0, Some((9.91, 78.10))),
        ]
    }

    fn names(ranked: &[RankedPoint]) -> Vec<&str> {
        ranked.iter().map(|r| r.point.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let points = create_points();
        let result = rank(&points, &Query::default());

        assert_eq!(names(&result), vec!["Sunrise Cafe", "Moonlight Cafe"]);
        assert!(result.iter().all(|r| r.distance_km.is_none()));
    }

    #[test]
    fn test_rating_floor() {
        let points = create_points();
        let query = Query {
            min_rating: Some(4.0),
            ..Query::default()
        };

        assert_eq!(names(&rank(&points, &query)), vec!["Sunrise Cafe"]);
    }

    #[test]
    fn test_radius_with_distance_sort() {
        let points = create_points();
        let user = Coordinates::new(9.92, 78.11);
        let query = Query {
            user_position: Some(user),
            radius_km: Some(5.0),
            sort_key: SortKey::DistanceAsc,
            ..Query::default()
        };

        let result = rank(&points, &query);
        assert_eq!(result.len(), 2);

        for r in &result {
            let coords = r.point.coordinates.unwrap();
            let expected = haversine_distance(user.lat, user.lon, coords.lat, coords.lon);
            assert!((r.distance_km.unwrap() - expected).abs() < 1e-3);
        }
        assert!(result[0].distance_km.unwrap() <= result[1].distance_km.unwrap());
    }

    #[test]
    fn test_missing_coordinates_dropped_only_under_radius() {
        let mut points = create_points();
        points.push(create_point(3, "Ghost Cafe", 5.0, None));
        let user = Some(Coordinates::new(9.92, 78.11));

        let with_radius = Query {
            user_position: user,
            radius_km: Some(50.0),
            ..Query::default()
        };
        assert!(rank(&points, &with_radius).iter().all(|r| r.point.id != 3));

        let without_radius = Query {
            user_position: user,
            ..Query::default()
        };
        let result = rank(&points, &without_radius);
        let ghost = result.iter().find(|r| r.point.id == 3).unwrap();
        assert!(ghost.distance_km.is_none());
    }

    #[test]
    fn test_input_untouched() {
        let points = create_points();
        let snapshot = points.clone();
        let query = Query {
            search_text: "cafe".to_string(),
            user_position: Some(Coordinates::new(9.92, 78.11)),
            sort_key: SortKey::NameAsc,
            ..Query::default()
        };

        let _ = rank(&points, &query);
        assert_eq!(points, snapshot);
    }

    #[test]
    fn test_zero_radius_is_active() {
        let points = create_points();
        let query = Query {
            user_position: Some(Coordinates::new(9.92, 78.11)),
            radius_km: Some(0.0),
            ..Query::default()
        };
        assert!(rank(&points, &query).is_empty());
    }
}
