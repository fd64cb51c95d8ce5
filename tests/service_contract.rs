/// Contract tests for the earthquake service
///
/// These tests drive the public API end to end through an in-memory
/// transport that records every requested URL. They verify:
/// 1. Limit clamping on the outbound range query
/// 2. Validation failures issue zero network calls
/// 3. Truncation flag and echoed date bounds
/// 4. Error message priority for failed queries, and transport failures
/// 5. Magnitude extremes over fetched collections
/// 6. Repeated default-feed fetches are independent
///
/// Run with: cargo test --test service_contract

use std::sync::{Arc, Mutex};

use quakeview_service::analysis::{compute_extremes, filter_by_place};
use quakeview_service::config::ServiceConfig;
use quakeview_service::ingest::transport::{HttpResponse, Transport, TransportError};
use quakeview_service::model::{QuakeError, END_PRESENT};
use quakeview_service::service::EarthquakeService;
use quakeview_service::session::LatestResult;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Transport double: answers every request with the same response (or the
/// same connection failure) and keeps a log of requested URLs.
struct RecordingTransport {
    status: u16,
    body: String,
    failure: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingTransport {
    fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_string(),
            failure: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Every request fails before any HTTP status is received.
    fn unreachable(message: &str) -> Arc<Self> {
        Arc::new(Self {
            status: 0,
            body: String::new(),
            failure: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.failure {
            Some(ref message) => Err(TransportError { message: message.clone() }),
            None => Ok(HttpResponse::new(self.status, self.body.clone())),
        }
    }
}

const FEED_URL: &str = "http://usgs.test/summary/all_hour.geojson";
const QUERY_URL: &str = "http://usgs.test/fdsnws/event/1/query";

fn service_with(transport: Arc<RecordingTransport>) -> EarthquakeService {
    let config = ServiceConfig {
        default_feed_url: FEED_URL.to_string(),
        range_query_url: QUERY_URL.to_string(),
        ..ServiceConfig::default()
    };
    EarthquakeService::with_transport(config, transport)
}

fn feature_json(id: &str, mag: Option<f64>, place: &str) -> String {
    let mag = mag.map(|m| m.to_string()).unwrap_or_else(|| "null".to_string());
    format!(
        r#"{{"type":"Feature","id":"{}","properties":{{"mag":{},"place":"{}","time":1709251200000,"url":"https://earthquake.usgs.gov/earthquakes/eventpage/{}"}},"geometry":{{"type":"Point","coordinates":[-155.28,19.41,2.5]}}}}"#,
        id, mag, place, id
    )
}

fn payload_json(count: u64, limit: Option<u64>, features: &[String]) -> String {
    let limit = limit.map(|l| format!(r#","limit":{}"#, l)).unwrap_or_default();
    format!(
        r#"{{"type":"FeatureCollection","metadata":{{"title":"USGS Earthquakes","status":200,"count":{}{}}},"features":[{}]}}"#,
        count,
        limit,
        features.join(",")
    )
}

fn small_payload() -> String {
    payload_json(
        3,
        Some(5000),
        &[
            feature_json("hv1", Some(2.1), "5 km SW of Volcano, Hawaii"),
            feature_json("hv2", Some(3.4), "Island of Hawaii, Hawaii"),
            feature_json("ak1", None, "Southern Alaska"),
        ],
    )
}

fn limit_param(url: &str) -> u32 {
    url.split('&')
        .find_map(|pair| pair.strip_prefix("limit="))
        .expect("limit parameter present")
        .parse()
        .expect("numeric limit")
}

// ---------------------------------------------------------------------------
// Limit clamping
// ---------------------------------------------------------------------------

#[test]
fn test_sent_limit_is_always_clamped() {
    let cases: [(i64, u32); 7] = [
        (i64::MIN, 1),
        (-5, 1),
        (0, 1),
        (1, 1),
        (5000, 5000),
        (20_000, 20_000),
        (1_000_000, 20_000),
    ];

    for (requested, expected) in cases {
        let transport = RecordingTransport::new(200, &small_payload());
        let service = service_with(transport.clone());
        service
            .fetch_by_date_range_with_limit(Some("2024-03-01"), None, requested)
            .expect("search should succeed");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(limit_param(&calls[0]), expected, "limit {} should clamp to {}", requested, expected);
    }
}

// ---------------------------------------------------------------------------
// Validation happens before the network
// ---------------------------------------------------------------------------

#[test]
fn test_end_before_start_fails_without_network_call() {
    let transport = RecordingTransport::new(200, &small_payload());
    let service = service_with(transport.clone());

    let err = service
        .fetch_by_date_range(Some("2024-03-10"), Some("2024-03-01"))
        .unwrap_err();

    assert!(matches!(err, QuakeError::Validation(_)), "got {:?}", err);
    assert!(transport.calls().is_empty(), "no request may be issued");
}

#[test]
fn test_missing_start_fails_without_network_call() {
    let transport = RecordingTransport::new(200, &small_payload());
    let service = service_with(transport.clone());

    let err = service.fetch_by_date_range(None, Some("2024-03-01")).unwrap_err();

    assert_eq!(err, QuakeError::Validation("start date is required".to_string()));
    assert!(transport.calls().is_empty());
}

#[test]
fn test_unparseable_start_fails_without_network_call() {
    let transport = RecordingTransport::new(200, &small_payload());
    let service = service_with(transport.clone());

    let err = service.fetch_by_date_range(Some("last tuesday"), None).unwrap_err();

    assert!(matches!(err, QuakeError::Validation(_)));
    assert!(transport.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Outbound request shape
// ---------------------------------------------------------------------------

#[test]
fn test_open_ended_search_omits_endtime() {
    let transport = RecordingTransport::new(200, &small_payload());
    let service = service_with(transport.clone());

    service.fetch_by_date_range(Some("2024-03-01"), None).unwrap();

    assert_eq!(
        transport.calls(),
        [format!("{}?format=geojson&starttime=2024-03-01&limit=5000", QUERY_URL)]
    );
}

#[test]
fn test_closed_search_sends_calendar_days() {
    let transport = RecordingTransport::new(200, &small_payload());
    let service = service_with(transport.clone());

    service
        .fetch_by_date_range(Some("2024-02-01T12:00:00Z"), Some("2024-03-01"))
        .unwrap();

    assert_eq!(
        transport.calls(),
        [format!(
            "{}?format=geojson&starttime=2024-02-01&endtime=2024-03-01&limit=5000",
            QUERY_URL
        )]
    );
}

#[test]
fn test_default_feed_sends_no_parameters() {
    let transport = RecordingTransport::new(200, &small_payload());
    let service = service_with(transport.clone());

    service.fetch_default().unwrap();

    assert_eq!(transport.calls(), [FEED_URL]);
}

// ---------------------------------------------------------------------------
// Normalized result
// ---------------------------------------------------------------------------

#[test]
fn test_count_above_requested_limit_is_truncated() {
    let body = payload_json(25_000, Some(20_000), &[feature_json("a", Some(1.0), "Nevada")]);
    let service = service_with(RecordingTransport::new(200, &body));

    let collection = service
        .fetch_by_date_range_with_limit(Some("2000-01-01"), None, 20_000)
        .unwrap();

    assert!(collection.truncated);
    assert_eq!(collection.requested_limit, Some(20_000));
    assert_eq!(collection.total_count, Some(25_000));
}

#[test]
fn test_count_below_requested_limit_is_not_truncated() {
    let body = payload_json(100, Some(20_000), &[feature_json("a", Some(1.0), "Nevada")]);
    let service = service_with(RecordingTransport::new(200, &body));

    let collection = service
        .fetch_by_date_range_with_limit(Some("2024-01-01"), None, 20_000)
        .unwrap();

    assert!(!collection.truncated);
    assert_eq!(collection.requested_limit, None);
}

#[test]
fn test_end_date_echo() {
    let service = service_with(RecordingTransport::new(200, &small_payload()));

    let open = service.fetch_by_date_range(Some("2024-02-01"), None).unwrap();
    assert_eq!(open.requested_start.as_deref(), Some("2024-02-01"));
    assert_eq!(open.requested_end.as_deref(), Some(END_PRESENT));

    let closed = service
        .fetch_by_date_range(Some("2024-02-01"), Some("2024-03-01"))
        .unwrap();
    assert_eq!(closed.requested_end.as_deref(), Some("2024-03-01"));
}

#[test]
fn test_features_keep_source_order_and_unknown_magnitudes() {
    let service = service_with(RecordingTransport::new(200, &small_payload()));

    let collection = service.fetch_default().unwrap();

    let ids: Vec<_> = collection.features.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, ["hv1", "hv2", "ak1"]);
    assert_eq!(collection.features[2].magnitude, None);
    assert_eq!(collection.metadata_title.as_deref(), Some("USGS Earthquakes"));
}

#[test]
fn test_malformed_success_body_is_parse_error() {
    let service = service_with(RecordingTransport::new(200, "<html>maintenance</html>"));

    let err = service.fetch_default().unwrap_err();

    assert!(matches!(err, QuakeError::Parse(_)), "got {:?}", err);
}

// ---------------------------------------------------------------------------
// Error message priority
// ---------------------------------------------------------------------------

#[test]
fn test_query_error_uses_description_field() {
    let service = service_with(RecordingTransport::new(400, r#"{"description": "bad request"}"#));

    let err = service.fetch_by_date_range(Some("2024-03-01"), None).unwrap_err();

    assert_eq!(err, QuakeError::Query { status: 400, message: "bad request".to_string() });
}

#[test]
fn test_query_error_uses_raw_text_when_not_json() {
    let service = service_with(RecordingTransport::new(400, "oops"));

    let err = service.fetch_by_date_range(Some("2024-03-01"), None).unwrap_err();

    assert_eq!(err.message(), "oops");
}

#[test]
fn test_default_feed_transport_failure_is_network_error() {
    let transport = RecordingTransport::unreachable("dns error: usgs.test not found");
    let service = service_with(transport.clone());

    let err = service.fetch_default().unwrap_err();

    assert!(matches!(err, QuakeError::Network { status: None, .. }), "got {:?}", err);
    assert_eq!(err.message(), "dns error: usgs.test not found");
    assert_eq!(transport.calls(), [FEED_URL], "exactly one request, not retried");
}

#[test]
fn test_range_transport_failure_is_network_error() {
    let transport = RecordingTransport::unreachable("connection reset");
    let service = service_with(transport.clone());

    let err = service.fetch_by_date_range(Some("2024-03-01"), None).unwrap_err();

    assert!(matches!(err, QuakeError::Network { status: None, .. }), "got {:?}", err);
    assert_eq!(transport.calls().len(), 1);
}

#[test]
fn test_query_error_generic_for_empty_body() {
    let transport = RecordingTransport::new(503, "");
    let service = service_with(transport.clone());

    let err = service.fetch_by_date_range(Some("2024-03-01"), None).unwrap_err();

    assert_eq!(err, QuakeError::Query { status: 503, message: "HTTP error: 503".to_string() });
    assert_eq!(transport.calls().len(), 1, "failures are not retried");
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

#[test]
fn test_extremes_over_fetched_collection() {
    let body = payload_json(
        5,
        None,
        &[
            feature_json("a", Some(5.0), "Japan"),
            feature_json("b", Some(7.2), "Chile"),
            feature_json("c", Some(3.1), "Greece"),
            feature_json("d", None, "Unknown"),
            feature_json("e", Some(7.2), "Peru"),
        ],
    );
    let service = service_with(RecordingTransport::new(200, &body));
    let collection = service.fetch_by_date_range(Some("2024-01-01"), None).unwrap();

    let extremes = compute_extremes(&collection.features);

    assert_eq!(extremes.highest.map(|f| f.id), Some("b".to_string()));
    assert_eq!(extremes.lowest.map(|f| f.id), Some("c".to_string()));
}

#[test]
fn test_extremes_of_empty_collection_are_none() {
    let service = service_with(RecordingTransport::new(200, &payload_json(0, None, &[])));
    let collection = service.fetch_default().unwrap();

    let extremes = compute_extremes(&collection.features);

    assert!(extremes.highest.is_none());
    assert!(extremes.lowest.is_none());
}

#[test]
fn test_place_filter_over_fetched_collection() {
    let service = service_with(RecordingTransport::new(200, &small_payload()));
    let collection = service.fetch_default().unwrap();

    let hawaii = filter_by_place(&collection.features, "hawaii");

    assert_eq!(hawaii.len(), 2);
}

// ---------------------------------------------------------------------------
// Independence of calls
// ---------------------------------------------------------------------------

#[test]
fn test_repeated_default_fetches_are_identical() {
    let transport = RecordingTransport::new(200, &small_payload());
    let service = service_with(transport.clone());

    let first = service.fetch_default().unwrap();
    let second = service.fetch_default().unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.calls().len(), 2, "each call issues its own request");
}

#[test]
fn test_out_of_order_completion_keeps_latest_search() {
    let service = service_with(RecordingTransport::new(200, &small_payload()));
    let latest = LatestResult::new();

    let older = latest.begin();
    let newer = latest.begin();
    let newer_result = service.fetch_by_date_range(Some("2024-03-01"), None).unwrap();
    let older_result = service.fetch_by_date_range(Some("2024-01-01"), None).unwrap();

    assert!(!latest.is_current(&older));
    assert!(latest.is_current(&newer));
    assert!(latest.offer(newer, newer_result));
    assert!(!latest.offer(older, older_result));
    assert_eq!(
        latest.get().and_then(|c| c.requested_start),
        Some("2024-03-01".to_string())
    );
}
