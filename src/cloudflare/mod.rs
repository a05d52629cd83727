//! Cloudflare Zero Trust Access API.
//!
//! - [`access`] - Access group updates

mod access;

pub use access::AccessGroupClient;
