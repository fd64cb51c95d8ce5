/// Derived views over a normalized earthquake collection.
///
/// Everything here is pure: no I/O, no clock, no mutation of the input.
///
/// Submodules:
/// - `extremes` — highest and lowest magnitude events for the summary panel.
/// - `filter` — place search for the tabular list.
/// - `severity` — magnitude classes shared by the legend and summaries.

pub mod extremes;
pub mod filter;
pub mod severity;

pub use extremes::compute_extremes;
pub use filter::filter_by_place;
pub use severity::{class_histogram, classify, ClassHistogram, MagnitudeClass};
