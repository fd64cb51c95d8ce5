/// Magnitude classes.
///
/// Buckets events into the bands the map legend uses, so summaries and
/// markers agree on what counts as "strong" or "major".

use crate::model::EarthquakeFeature;

/// Magnitude classes, in ascending order of severity.
///
/// Bands (lower bound inclusive):
///   Minor < 4.0 <= Light < 5.0 <= Moderate < 6.0 <= Strong < 7.0 <= Major
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MagnitudeClass {
    Minor,
    Light,
    Moderate,
    Strong,
    Major,
}

impl MagnitudeClass {
    pub const ALL: [MagnitudeClass; 5] = [
        MagnitudeClass::Minor,
        MagnitudeClass::Light,
        MagnitudeClass::Moderate,
        MagnitudeClass::Strong,
        MagnitudeClass::Major,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MagnitudeClass::Minor => "minor",
            MagnitudeClass::Light => "light",
            MagnitudeClass::Moderate => "moderate",
            MagnitudeClass::Strong => "strong",
            MagnitudeClass::Major => "major",
        }
    }
}

/// Classifies a magnitude. Returns `None` if it is unknown or NaN.
pub fn classify(magnitude: Option<f64>) -> Option<MagnitudeClass> {
    let mag = magnitude.filter(|m| !m.is_nan())?;
    let class = if mag >= 7.0 {
        MagnitudeClass::Major
    } else if mag >= 6.0 {
        MagnitudeClass::Strong
    } else if mag >= 5.0 {
        MagnitudeClass::Moderate
    } else if mag >= 4.0 {
        MagnitudeClass::Light
    } else {
        MagnitudeClass::Minor
    };
    Some(class)
}

/// Per-class event counts for one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassHistogram {
    /// Indexed by `MagnitudeClass as usize`.
    pub counts: [usize; 5],
    pub unknown: usize,
}

impl ClassHistogram {
    pub fn count(&self, class: MagnitudeClass) -> usize {
        self.counts[class as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.unknown
    }
}

pub fn class_histogram(features: &[EarthquakeFeature]) -> ClassHistogram {
    let mut histogram = ClassHistogram::default();
    for feature in features {
        match classify(feature.magnitude) {
            Some(class) => histogram.counts[class as usize] += 1,
            None => histogram.unknown += 1,
        }
    }
    histogram
}
