/// Response normalization.
///
/// Turns a decoded `FeedPayload` into the canonical `EarthquakeCollection`:
/// features pass through untouched, the truncation flag is derived from the
/// reported count, and the query bounds actually sent are echoed back.
///
/// Normalization is total. Missing metadata yields `None` fields, never an
/// error.

use crate::ingest::usgs::FeedPayload;
use crate::model::{EarthquakeCollection, END_PRESENT};

/// Normalizes one payload.
///
/// - `requested_limit`: the clamped limit sent with a range query; `None` for
///   the default feed, which can then never be truncated.
/// - `used_start`: calendar day sent as `starttime`.
/// - `used_end`: calendar day sent as `endtime`. When a start was sent but no
///   end, the echoed end is `"Present"`.
///
/// Truncation is a strict comparison: a reported count equal to the limit is
/// not truncated.
pub fn normalize(
    payload: FeedPayload,
    requested_limit: Option<u32>,
    used_start: Option<&str>,
    used_end: Option<&str>,
) -> EarthquakeCollection {
    let truncated = match (payload.count, requested_limit) {
        (Some(count), Some(limit)) => count > u64::from(limit),
        _ => false,
    };

    let requested_end = match (used_start, used_end) {
        (_, Some(end)) => Some(end.to_string()),
        (Some(_), None) => Some(END_PRESENT.to_string()),
        (None, None) => None,
    };

    EarthquakeCollection {
        features: payload.features,
        metadata_title: payload.title,
        total_count: payload.count,
        requested_start: used_start.map(str::to_string),
        requested_end,
        truncated,
        requested_limit: if truncated { requested_limit } else { None },
    }
}
