/// USGS Earthquake Hazards Program API client
///
/// Two endpoints are consumed:
/// - the real-time summary feed (fixed URL, no parameters), e.g.
///   https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_hour.geojson
/// - the FDSN event query service, e.g.
///   https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&starttime=2024-03-01&limit=5000
///
/// Both return a GeoJSON FeatureCollection. This module builds the request
/// URLs, performs the call through a `Transport`, and decodes the body into a
/// `FeedPayload`. Truncation and date echoing happen later in `normalize`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::ingest::transport::{HttpResponse, Transport};
use crate::model::{EarthquakeFeature, MAX_LIMIT, MIN_LIMIT, QuakeError};

pub const USGS_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_hour.geojson";

pub const USGS_QUERY_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

// ============================================================================
// USGS API Response Structures
// ============================================================================

/// Top-level GeoJSON FeatureCollection as returned by either endpoint.
/// Every field is optional upstream; absent arrays decode as empty.
#[derive(Debug, Deserialize)]
pub struct UsgsResponse {
    #[serde(default)]
    pub metadata: Option<UsgsMetadata>,
    #[serde(default)]
    pub features: Vec<UsgsFeature>,
}

#[derive(Debug, Deserialize)]
pub struct UsgsMetadata {
    pub title: Option<String>,
    pub count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct UsgsFeature {
    pub id: String,
    pub properties: UsgsProperties,
    pub geometry: Option<UsgsGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct UsgsProperties {
    pub mag: Option<f64>,
    pub place: Option<String>,
    pub time: Option<i64>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsgsGeometry {
    /// `[longitude, latitude, depth_km]`; depth may be missing or null.
    pub coordinates: Vec<Option<f64>>,
}

/// Decoded payload: upstream metadata plus typed features, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPayload {
    pub title: Option<String>,
    pub count: Option<u64>,
    pub features: Vec<EarthquakeFeature>,
}

// ============================================================================
// Date-range query construction
// ============================================================================

/// A validated range query, ready to be turned into a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    /// `YYYY-MM-DD`, UTC calendar day.
    pub starttime: String,
    /// `None` when the caller gave no end date; `endtime` is then omitted.
    pub endtime: Option<String>,
    /// Already clamped into [MIN_LIMIT, MAX_LIMIT].
    pub limit: u32,
}

impl RangeQuery {
    /// Validates caller input and produces the query.
    ///
    /// Checks run in this order, all before any network activity:
    ///   1. start present (blank counts as absent)
    ///   2. start and end parse as dates
    ///   3. end is not before start
    ///
    /// The limit is clamped, never rejected.
    pub fn build(start: Option<&str>, end: Option<&str>, limit: i64) -> Result<Self, QuakeError> {
        let start = start
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| QuakeError::Validation("start date is required".to_string()))?;
        let start_at = parse_query_date("start", start)?;

        let end_at = match end.filter(|s| !s.trim().is_empty()) {
            Some(end) => Some(parse_query_date("end", end)?),
            None => None,
        };

        if let Some(end_at) = end_at {
            if end_at < start_at {
                return Err(QuakeError::Validation(
                    "end date must be on or after start date".to_string(),
                ));
            }
        }

        Ok(Self {
            starttime: format_calendar_day(&start_at),
            endtime: end_at.as_ref().map(format_calendar_day),
            limit: clamp_limit(limit),
        })
    }

    /// Full request URL against the given query endpoint.
    pub fn to_url(&self, base_url: &str) -> String {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{}format=geojson&starttime={}",
            base_url, separator, self.starttime
        );
        if let Some(ref endtime) = self.endtime {
            url.push_str(&format!("&endtime={}", endtime));
        }
        url.push_str(&format!("&limit={}", self.limit));
        url
    }
}

/// Clamps a requested event limit into the range the endpoint accepts.
pub fn clamp_limit(limit: i64) -> u32 {
    limit.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as u32
}

/// Reduces an instant to its UTC calendar day, `YYYY-MM-DD`.
pub fn format_calendar_day(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Parses a caller-supplied date.
///
/// Accepted forms:
/// - `2024-03-01` (midnight UTC)
/// - RFC 3339, e.g. `2024-03-01T18:30:00-06:00` (converted to UTC)
/// - `2024-03-01T18:30:00` or `2024-03-01T18:30` (taken as UTC)
pub fn parse_query_date(label: &str, input: &str) -> Result<DateTime<Utc>, QuakeError> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.and_utc());
        }
    }

    Err(QuakeError::Validation(format!("invalid {} date: '{}'", label, input)))
}

// ============================================================================
// Response decoding
// ============================================================================

/// Decodes a GeoJSON body into a `FeedPayload`.
///
/// A feature without `time` or without a numeric longitude and latitude makes
/// the whole payload unusable and yields `QuakeError::Parse`. A missing or
/// null depth is kept as unknown.
pub fn parse_geojson_response(body: &str) -> Result<FeedPayload, QuakeError> {
    let response: UsgsResponse =
        serde_json::from_str(body).map_err(|e| QuakeError::Parse(e.to_string()))?;

    let features = response
        .features
        .into_iter()
        .map(convert_feature)
        .collect::<Result<Vec<_>, _>>()?;

    let (title, count) = match response.metadata {
        Some(meta) => (meta.title, meta.count),
        None => (None, None),
    };

    Ok(FeedPayload { title, count, features })
}

fn convert_feature(feature: UsgsFeature) -> Result<EarthquakeFeature, QuakeError> {
    let time_millis = feature
        .properties
        .time
        .ok_or_else(|| QuakeError::Parse(format!("feature {} has no origin time", feature.id)))?;

    let coords = feature.geometry.map(|g| g.coordinates).unwrap_or_default();
    let (longitude, latitude) = match coords.as_slice() {
        [Some(lon), Some(lat), ..] => (*lon, *lat),
        _ => {
            return Err(QuakeError::Parse(format!(
                "feature {} has no longitude/latitude",
                feature.id
            )));
        }
    };

    Ok(EarthquakeFeature {
        id: feature.id,
        magnitude: feature.properties.mag,
        place: feature.properties.place,
        time_millis,
        longitude,
        latitude,
        depth_km: coords.get(2).copied().flatten(),
        details_url: feature.properties.url,
    })
}

/// Builds the message for a failed range query.
///
/// Priority: JSON `description`, JSON `message`, raw body text (only when the
/// body is not JSON), then a generic `HTTP error: <status>`.
///
/// A field counts when it carries a value: a non-empty string, a non-zero
/// number, `true`, or any array or object (rendered as JSON). A non-JSON body
/// is used verbatim whenever it is non-empty, whitespace included.
pub fn extract_error_message(status: u16, body: &str) -> String {
    let generic = format!("HTTP error: {}", status);

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => ["description", "message"]
            .iter()
            .find_map(|key| json.get(*key).and_then(error_field_text))
            .unwrap_or(generic),
        Err(_) if !body.is_empty() => body.to_string(),
        Err(_) => generic,
    }
}

fn error_field_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetch the fixed "recent activity" feed.
///
/// Any non-success status is reported as `QuakeError::Network` carrying the
/// status code; the body is not inspected.
pub fn fetch_feed(transport: &dyn Transport, feed_url: &str) -> Result<FeedPayload, QuakeError> {
    let response = transport.get(feed_url).map_err(|e| QuakeError::Network {
        status: None,
        message: e.message,
    })?;

    if !response.is_success() {
        return Err(QuakeError::Network {
            status: Some(response.status),
            message: format!("HTTP error: {}", response.status),
        });
    }

    parse_geojson_response(&response.body)
}

/// Fetch one bounded date-range query. Exactly one request is issued.
pub fn fetch_range(
    transport: &dyn Transport,
    query_url: &str,
    query: &RangeQuery,
) -> Result<FeedPayload, QuakeError> {
    let url = query.to_url(query_url);

    let response: HttpResponse = transport.get(&url).map_err(|e| QuakeError::Network {
        status: None,
        message: e.message,
    })?;

    if !response.is_success() {
        return Err(QuakeError::Query {
            status: response.status,
            message: extract_error_message(response.status, &response.body),
        });
    }

    parse_geojson_response(&response.body)
}

// ============================================================================
// Tests
// ============================================================================
