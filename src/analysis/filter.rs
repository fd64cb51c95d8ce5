/// Place search for the tabular event list.

use crate::model::EarthquakeFeature;

/// Returns the features whose `place` contains `term`, case-insensitively.
///
/// A blank term matches everything. Features with no place never match a
/// non-blank term. Source order is preserved.
pub fn filter_by_place<'a>(features: &'a [EarthquakeFeature], term: &str) -> Vec<&'a EarthquakeFeature> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return features.iter().collect();
    }

    features
        .iter()
        .filter(|f| {
            f.place
                .as_deref()
                .is_some_and(|place| place.to_lowercase().contains(&term))
        })
        .collect()
}
