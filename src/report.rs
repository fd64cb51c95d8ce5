/// Text rendering of a collection summary.
///
/// Mirrors the summary panel of the map view: data source, total events,
/// the date window, a truncation warning, the magnitude extremes, and a
/// per-class breakdown. Used by the `quakeview` binary.

use std::fmt::Write;

use crate::analysis::{class_histogram, MagnitudeClass};
use crate::model::{EarthquakeCollection, EarthquakeFeature, MagnitudeExtremes};

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// `M 4.5` style label; unknown magnitudes render as `M N/A`.
pub fn magnitude_label(magnitude: Option<f64>) -> String {
    match magnitude.filter(|m| !m.is_nan()) {
        Some(mag) => format!("M {:.1}", mag),
        None => "M N/A".to_string(),
    }
}

fn describe(feature: &EarthquakeFeature) -> String {
    let place = feature.place.as_deref().unwrap_or("Unknown Location");
    let time = feature
        .event_time()
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!("{} - {} ({})", magnitude_label(feature.magnitude), place, time)
}

pub fn render_summary(collection: &EarthquakeCollection, extremes: &MagnitudeExtremes) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Data Source:   {}", collection.display_title());
    let _ = writeln!(out, "Total Events:  {}", collection.display_count());
    let _ = writeln!(out, "Start Time:    {}", collection.requested_start.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "End Time:      {}", collection.requested_end.as_deref().unwrap_or("N/A"));

    if collection.truncated {
        if let Some(limit) = collection.requested_limit {
            let _ = writeln!(
                out,
                "Warning: results for this date range were limited to {} events; \
                 only a subset of the matching earthquakes is shown.",
                limit
            );
        }
    }

    if collection.is_empty() {
        let _ = writeln!(out, "No earthquakes found for the selected period.");
        let _ = write!(out, "{}", RULE);
        return out;
    }

    if let Some(ref highest) = extremes.highest {
        let _ = writeln!(out, "Highest:       {}", describe(highest));
    }
    if let Some(ref lowest) = extremes.lowest {
        let _ = writeln!(out, "Lowest:        {}", describe(lowest));
    }

    let histogram = class_histogram(&collection.features);
    let breakdown: Vec<String> = MagnitudeClass::ALL
        .iter()
        .map(|class| format!("{} {}", histogram.count(*class), class.label()))
        .chain((histogram.unknown > 0).then(|| format!("{} unknown", histogram.unknown)))
        .collect();
    let _ = writeln!(out, "By Class:      {}", breakdown.join(", "));
    let _ = write!(out, "{}", RULE);
    out
}
