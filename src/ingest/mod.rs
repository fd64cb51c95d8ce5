/// Upstream data access.
///
/// Submodules:
/// - `transport` — the HTTP seam (`Transport` trait and the `reqwest` client).
/// - `usgs` — USGS earthquake endpoints: URL building and GeoJSON decoding.

pub mod transport;
pub mod usgs;
