/// Earthquake query facade.
///
/// Wires the USGS client, the normalizer and logging together behind the two
/// operations the presentation layer calls: the default "recent activity"
/// feed and a date-range search. The service holds no mutable state; every
/// call builds its own request and returns a self-contained collection.

use std::sync::Arc;

use crate::analysis::compute_extremes;
use crate::config::ServiceConfig;
use crate::ingest::transport::{ReqwestTransport, Transport, TransportError};
use crate::ingest::usgs::{self, RangeQuery};
use crate::logging::{self, DataSource};
use crate::model::{EarthquakeCollection, MagnitudeExtremes, QuakeError, END_PRESENT};
use crate::normalize::normalize;

pub struct EarthquakeService {
    config: ServiceConfig,
    transport: Arc<dyn Transport>,
}

impl EarthquakeService {
    /// Service backed by a blocking `reqwest` client built from `config`.
    pub fn new(config: ServiceConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.request_timeout(), &config.user_agent)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ServiceConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Fetches the fixed recent-activity feed.
    ///
    /// The result is never truncated and carries no echoed date bounds.
    pub fn fetch_default(&self) -> Result<EarthquakeCollection, QuakeError> {
        logging::debug(
            DataSource::Feed,
            None,
            &format!("Fetching default feed from {}", self.config.default_feed_url),
        );

        let payload = usgs::fetch_feed(self.transport.as_ref(), &self.config.default_feed_url)
            .inspect_err(|e| logging::log_query_failure(DataSource::Feed, None, "Default feed", e))?;

        let collection = normalize(payload, None, None, None);
        logging::log_collection_summary(DataSource::Feed, None, &collection);
        Ok(collection)
    }

    /// Date-range search with the configured default limit.
    pub fn fetch_by_date_range(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<EarthquakeCollection, QuakeError> {
        self.fetch_by_date_range_with_limit(start, end, self.config.default_limit)
    }

    /// Date-range search.
    ///
    /// Input is validated before any network call; `limit` is clamped into
    /// [1, 20000]. Exactly one request is issued on the happy path and on
    /// server-side failure, none on validation failure.
    pub fn fetch_by_date_range_with_limit(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        limit: i64,
    ) -> Result<EarthquakeCollection, QuakeError> {
        let query = RangeQuery::build(start, end, limit)
            .inspect_err(|e| logging::log_query_failure(DataSource::Query, None, "Date-range search", e))?;

        let window = format!(
            "{}..{}",
            query.starttime,
            query.endtime.as_deref().unwrap_or(END_PRESENT)
        );
        logging::debug(
            DataSource::Query,
            Some(&window),
            &format!("Fetching {}", query.to_url(&self.config.range_query_url)),
        );

        let payload = usgs::fetch_range(self.transport.as_ref(), &self.config.range_query_url, &query)
            .inspect_err(|e| {
                logging::log_query_failure(DataSource::Query, Some(&window), "Date-range search", e)
            })?;

        let collection = normalize(
            payload,
            Some(query.limit),
            Some(&query.starttime),
            query.endtime.as_deref(),
        );
        logging::log_collection_summary(DataSource::Query, Some(&window), &collection);
        Ok(collection)
    }

    /// Magnitude extremes of a collection. Pure; provided here for callers
    /// that only hold the service.
    pub fn extremes(&self, collection: &EarthquakeCollection) -> MagnitudeExtremes {
        compute_extremes(&collection.features)
    }
}
