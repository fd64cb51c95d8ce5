/// Core data types for the earthquake visualizer service.
///
/// This module defines the shared domain model imported by all other modules:
/// the normalized feature and collection values handed to the presentation
/// layer, the derived magnitude extremes, and the error taxonomy.
/// It contains no I/O.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Query constants
// ---------------------------------------------------------------------------

/// Event limit used by the date-range search when the caller does not pick one.
pub const DEFAULT_LIMIT: i64 = 5000;

/// Smallest limit the range query endpoint accepts.
pub const MIN_LIMIT: u32 = 1;

/// Largest limit the range query endpoint accepts.
pub const MAX_LIMIT: u32 = 20_000;

/// Echoed end bound when a date-range query was open-ended.
pub const END_PRESENT: &str = "Present";

/// Title shown when the upstream payload carries no metadata title.
pub const FALLBACK_TITLE: &str = "USGS Earthquake API";

// ---------------------------------------------------------------------------
// Feature types
// ---------------------------------------------------------------------------

/// A single seismic event.
///
/// Corresponds to one entry in the `features[]` array of a USGS GeoJSON
/// response, flattened from its `properties` and `geometry` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeFeature {
    pub id: String,
    /// `None` means the magnitude is unknown; it is never coerced to 0.
    pub magnitude: Option<f64>,
    pub place: Option<String>,
    pub time_millis: i64,
    /// May fall outside [-180, 180] for antimeridian-spanning queries.
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: Option<f64>,
    pub details_url: Option<String>,
}

impl EarthquakeFeature {
    /// Event origin time, or `None` if the millisecond value is out of range.
    pub fn event_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time_millis).single()
    }

    /// Magnitude if it is present and a real number.
    pub fn known_magnitude(&self) -> Option<f64> {
        self.magnitude.filter(|m| !m.is_nan())
    }
}

// ---------------------------------------------------------------------------
// Collection types
// ---------------------------------------------------------------------------

/// The normalized result of one query.
///
/// Created fresh per query and never mutated afterwards; the caller replaces
/// it wholesale when the next query completes.
///
/// `truncated` is true exactly when `total_count` exceeds `requested_limit`,
/// and `requested_limit` is only populated in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeCollection {
    pub features: Vec<EarthquakeFeature>,
    pub metadata_title: Option<String>,
    /// Source-reported count. Trusted as-is, not recomputed from `features`.
    pub total_count: Option<u64>,
    pub requested_start: Option<String>,
    /// Calendar day sent as `endtime`, or `"Present"` for open-ended ranges.
    pub requested_end: Option<String>,
    pub truncated: bool,
    pub requested_limit: Option<u32>,
}

impl EarthquakeCollection {
    /// Count to show in a summary: the reported total, else the features held.
    pub fn display_count(&self) -> u64 {
        self.total_count.unwrap_or(self.features.len() as u64)
    }

    pub fn display_title(&self) -> &str {
        self.metadata_title.as_deref().unwrap_or(FALLBACK_TITLE)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Highest- and lowest-magnitude features of one collection.
///
/// Both are `None` only when the collection has no features.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MagnitudeExtremes {
    pub highest: Option<EarthquakeFeature>,
    pub lowest: Option<EarthquakeFeature>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when querying or decoding USGS earthquake data.
#[derive(Debug, Clone, PartialEq)]
pub enum QuakeError {
    /// Caller input violates a precondition. Raised before any network call.
    Validation(String),
    /// No usable response: the transport failed, or the default feed answered
    /// with a non-success status (carried in `status`).
    Network { status: Option<u16>, message: String },
    /// The range query endpoint answered with a non-success status.
    Query { status: u16, message: String },
    /// A success response whose body is not a usable GeoJSON payload.
    Parse(String),
}

impl QuakeError {
    /// HTTP status attached to the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            QuakeError::Network { status, .. } => *status,
            QuakeError::Query { status, .. } => Some(*status),
            QuakeError::Validation(_) | QuakeError::Parse(_) => None,
        }
    }

    /// The human-readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            QuakeError::Validation(msg) | QuakeError::Parse(msg) => msg,
            QuakeError::Network { message, .. } | QuakeError::Query { message, .. } => message,
        }
    }
}

impl std::fmt::Display for QuakeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuakeError::Validation(msg) => write!(f, "Validation error: {}", msg),
            QuakeError::Network { status: Some(code), message } => {
                write!(f, "Network error ({}): {}", code, message)
            }
            QuakeError::Network { status: None, message } => write!(f, "Network error: {}", message),
            QuakeError::Query { message, .. } => write!(f, "Query error: {}", message),
            QuakeError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for QuakeError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
