//! Earthquake visualizer service.
//!
//! Fetches seismic events from the USGS earthquake API, normalizes them into
//! an `EarthquakeCollection`, and derives the views a map/table front end
//! needs (magnitude extremes, place search, magnitude classes).
//!
//! ```no_run
//! use quakeview_service::config::ServiceConfig;
//! use quakeview_service::service::EarthquakeService;
//!
//! let service = EarthquakeService::new(ServiceConfig::default()).expect("http client");
//! let recent = service.fetch_default().expect("feed");
//! let extremes = service.extremes(&recent);
//! println!("{} events, highest {:?}", recent.display_count(), extremes.highest.map(|f| f.magnitude));
//! ```

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod report;
pub mod service;
pub mod session;
