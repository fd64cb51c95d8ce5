/// Console front end for the earthquake service.
///
/// Usage:
///   quakeview                      # recent activity feed
///   quakeview START [END]          # date-range search, dates as YYYY-MM-DD
///
/// Configuration is read from `quakeview.toml` (if present) and `QUAKEVIEW_*`
/// environment variables.

use std::process::ExitCode;

use quakeview_service::analysis::compute_extremes;
use quakeview_service::config::ServiceConfig;
use quakeview_service::logging::{self, DataSource};
use quakeview_service::report::render_summary;
use quakeview_service::service::EarthquakeService;

const CONFIG_PATH: &str = "quakeview.toml";

fn main() -> ExitCode {
    let config = match ServiceConfig::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logger(config.log_level, config.log_file.as_deref(), false);

    let service = match EarthquakeService::new(config) {
        Ok(service) => service,
        Err(e) => {
            logging::error(DataSource::System, None, &format!("Failed to create HTTP client: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let endpoint = if args.is_empty() {
        &service.config().default_feed_url
    } else {
        &service.config().range_query_url
    };
    logging::debug(DataSource::System, None, &format!("Using endpoint {}", endpoint));
    let result = match args.first() {
        None => service.fetch_default(),
        Some(start) => service.fetch_by_date_range(Some(start.as_str()), args.get(1).map(String::as_str)),
    };

    match result {
        Ok(collection) => {
            let extremes = compute_extremes(&collection.features);
            println!("{}", render_summary(&collection, &extremes));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Search failed: {}", e.message());
            ExitCode::FAILURE
        }
    }
}
