/// Magnitude extremes over a feature collection.
///
/// # Seeding
/// The first feature seeds both `highest` and `lowest`, even when its
/// magnitude is unknown. Later features only replace an extreme through a
/// strict comparison against the seed's magnitude, and a comparison against
/// an unknown magnitude never succeeds. A collection whose first entry has
/// no magnitude therefore reports that entry for both extremes.

use crate::model::{EarthquakeFeature, MagnitudeExtremes};

/// Single pass over `features`. Returns both `None` only for an empty slice.
///
/// Ties keep the earlier feature. Features with a missing or NaN magnitude
/// are skipped.
pub fn compute_extremes(features: &[EarthquakeFeature]) -> MagnitudeExtremes {
    let Some(first) = features.first() else {
        return MagnitudeExtremes::default();
    };

    let mut highest = first;
    let mut lowest = first;

    for feature in features {
        let Some(mag) = feature.known_magnitude() else {
            continue;
        };
        if highest.known_magnitude().is_some_and(|current| mag > current) {
            highest = feature;
        }
        if lowest.known_magnitude().is_some_and(|current| mag < current) {
            lowest = feature;
        }
    }

    MagnitudeExtremes {
        highest: Some(highest.clone()),
        lowest: Some(lowest.clone()),
    }
}
