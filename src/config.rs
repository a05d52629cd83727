//! Runtime configuration.
//!
//! Everything comes from the process environment (optionally seeded from a
//! `.env` file by `main`). The three secrets mirror what the hosting platform
//! injects; the remaining variables are overrides for testing and scheduling.

use crate::SyncError;
use std::fmt;
use std::time::Duration;

/// Published Google IP ranges.
pub const GOOGLE_IP_LIST_URL: &str = "https://www.gstatic.com/ipranges/goog.json";
/// Cloudflare v4 API root.
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
pub const ENV_ACCOUNT_ID: &str = "CLOUDFLARE_ACCOUNT_ID";
pub const ENV_ACCESS_GROUP_ID: &str = "ACCESS_GROUP_ID";
pub const ENV_IP_LIST_URL: &str = "GOOGLE_IP_LIST_URL";
pub const ENV_API_BASE: &str = "CLOUDFLARE_API_BASE";
pub const ENV_INTERVAL_SECS: &str = "SYNC_INTERVAL_SECS";

/// Configuration handed to every sync run.
#[derive(Clone, Default)]
pub struct Config {
    /// Cloudflare API token. `None` or empty disables the job.
    pub api_token: Option<String>,
    pub account_id: String,
    pub access_group_id: String,
    pub ip_list_url: String,
    pub api_base: String,
    /// Repeat interval. `None` means run once and exit.
    pub interval: Option<Duration>,
}

impl Config {
    /// Build a config pointing at the public endpoints.
    pub fn new(api_token: Option<&str>, account_id: &str, access_group_id: &str) -> Config {
        Config {
            api_token: api_token.map(str::to_string),
            account_id: account_id.to_string(),
            access_group_id: access_group_id.to_string(),
            ip_list_url: GOOGLE_IP_LIST_URL.to_string(),
            api_base: CLOUDFLARE_API_BASE.to_string(),
            interval: None,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Config, SyncError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, treating empty values as unset.
    ///
    /// # Returns
    /// * `Ok(Config)` - Config with defaults applied for unset overrides
    /// * `Err` - If `SYNC_INTERVAL_SECS` is not a positive whole number
    pub fn from_lookup<F>(lookup: F) -> Result<Config, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let interval = match get(ENV_INTERVAL_SECS) {
            Some(secs) => {
                let secs: u64 = secs
                    .trim()
                    .parse()
                    .map_err(|e| format!("Invalid {ENV_INTERVAL_SECS}={secs}: {e}"))?;
                if secs == 0 {
                    return Err(format!("{ENV_INTERVAL_SECS} must be greater than 0").into());
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Config {
            api_token: get(ENV_API_TOKEN),
            account_id: get(ENV_ACCOUNT_ID).unwrap_or_default(),
            access_group_id: get(ENV_ACCESS_GROUP_ID).unwrap_or_default(),
            ip_list_url: get(ENV_IP_LIST_URL).unwrap_or_else(|| GOOGLE_IP_LIST_URL.to_string()),
            api_base: get(ENV_API_BASE).unwrap_or_else(|| CLOUDFLARE_API_BASE.to_string()),
            interval,
        })
    }

    /// The API token, if one is set and non-empty.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref().filter(|t| !t.is_empty())
    }
}

// Hand written so the token never lands in a log line.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.api_token().map(|_| "***"))
            .field("account_id", &self.account_id)
            .field("access_group_id", &self.access_group_id)
            .field("ip_list_url", &self.ip_list_url)
            .field("api_base", &self.api_base)
            .field("interval", &self.interval)
            .finish()
    }
}
