use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{RankedPoint, SortKey};

/// Sort ranked points in place by the requested key
///
/// The sort is stable, so records that compare equal keep their input order.
/// Floats are compared with `total_cmp` to keep the order total even when a
/// rating is NaN.
pub fn sort_ranked(points: &mut [RankedPoint], key: SortKey) {
    match key {
        SortKey::RatingDesc => points.sort_by(|a, b| b.point.rating.total_cmp(&a.point.rating)),
        SortKey::RatingAsc => points.sort_by(|a, b| a.point.rating.total_cmp(&b.point.rating)),
        SortKey::NameAsc => points.sort_by(|a, b| compare_names(&a.point.name, &b.point.name)),
        SortKey::NameDesc => points.sort_by(|a, b| compare_names(&b.point.name, &a.point.name)),
        SortKey::DistanceAsc => {
            points.sort_by(|a, b| compare_distances(a.distance_km, b.distance_km, false))
        }
        SortKey::DistanceDesc => {
            points.sort_by(|a, b| compare_distances(a.distance_km, b.distance_km, true))
        }
    }
}

/// Compare display names the way a reader expects
///
/// The primary key ignores case and accents, so "apple" sorts before
/// "Banana" and "Éclair" sorts among the e's. Accents then case break ties,
/// which keeps the order total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| {
            a.nfd()
                .flat_map(char::to_lowercase)
                .cmp(b.nfd().flat_map(char::to_lowercase))
        })
        .then_with(|| a.cmp(b))
}

/// Base letters only: decomposed, combining marks dropped, lowercased
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare optional distances; missing distances always go last
pub fn compare_distances(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            if descending {
                b.total_cmp(&a)
            } else {
                a.total_cmp(&b)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
