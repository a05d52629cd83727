//! Domain models for the IP sync job.
//!
//! - [`IpRangeDocument`] and [`PrefixEntry`] - the published Google IP ranges
//! - [`AccessGroupUpdate`] - the body sent to the Cloudflare Access API

mod access_group;
mod ip_ranges;

pub use access_group::{AccessGroupUpdate, IncludeRule, IpRule, GROUP_NAME};
pub use ip_ranges::{IpRangeDocument, PrefixEntry};
