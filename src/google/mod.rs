//! Google published IP ranges.
//!
//! - [`ranges`] - Fetching and parsing `goog.json`

mod ranges;

pub use ranges::{fetch_ip_ranges, parse_ip_ranges};
