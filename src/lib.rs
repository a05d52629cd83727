//! Keep a Cloudflare Access group in step with Google's published IP ranges.
//!
//! One run fetches `goog.json`, flattens it into a CIDR list (IPv4 first, then
//! IPv6) and overwrites the "Google" Access group with it.

pub mod cloudflare;
pub mod config;
pub mod google;
pub mod models;
pub mod scheduler;
pub mod sync;

/// Error type shared by every fallible step; `Send` so runs can be spawned.
pub type SyncError = Box<dyn std::error::Error + Send + Sync>;

pub use config::Config;
pub use scheduler::{run_every, run_once};
pub use sync::{build_update, run, run_with_client, SyncOutcome};
