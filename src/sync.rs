//! The sync job: fetch Google IP ranges and overwrite the Access group.

use crate::cloudflare::AccessGroupClient;
use crate::config::{Config, ENV_ACCESS_GROUP_ID, ENV_ACCOUNT_ID, ENV_API_TOKEN};
use crate::google::fetch_ip_ranges;
use crate::models::{AccessGroupUpdate, IpRangeDocument};
use crate::SyncError;
use colored::Colorize;
use std::fmt;

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No API token configured; nothing was called.
    Skipped,
    /// The IP list could not be fetched; the group was left alone.
    FetchFailed,
    /// The group was overwritten with `included` entries.
    Updated { included: usize },
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Skipped => write!(f, "skipped (no API token)"),
            SyncOutcome::FetchFailed => write!(f, "fetch failed"),
            SyncOutcome::Updated { included } => write!(f, "updated ({included} ranges)"),
        }
    }
}

/// Build the Access group body from the published document.
pub fn build_update(account_id: &str, doc: &IpRangeDocument) -> AccessGroupUpdate {
    AccessGroupUpdate::new(account_id, doc.inclusion_list())
}

// The log pattern already prints the level, so only the group id is highlighted.
fn empty_list_warning(group_id: &str) -> String {
    format!(
        "Google IP list is empty, access group {group} will be cleared",
        group = group_id.on_red()
    )
}

/// Run one sync.
///
/// # Returns
/// * `Ok(SyncOutcome)` - Completed, or short-circuited on a missing token or a failed fetch
/// * `Err` - Bad payload, missing account/group id or a failed API update
pub async fn run(config: &Config) -> Result<SyncOutcome, SyncError> {
    run_with_client(config, &reqwest::Client::new()).await
}

/// Same as [`run`] with a caller supplied HTTP client.
pub async fn run_with_client(
    config: &Config,
    client: &reqwest::Client,
) -> Result<SyncOutcome, SyncError> {
    let Some(api_token) = config.api_token() else {
        log::debug!("{ENV_API_TOKEN} not set, skipping sync");
        return Ok(SyncOutcome::Skipped);
    };
    if config.account_id.is_empty() {
        return Err(format!("{ENV_ACCOUNT_ID} is not set").into());
    }
    if config.access_group_id.is_empty() {
        return Err(format!("{ENV_ACCESS_GROUP_ID} is not set").into());
    }

    log::info!("#Start sync for access group {}", config.access_group_id);

    let Some(doc) = fetch_ip_ranges(client, &config.ip_list_url).await? else {
        return Ok(SyncOutcome::FetchFailed);
    };

    let update = build_update(&config.account_id, &doc);
    if update.include.is_empty() {
        // Still sent: the group is replaced with an empty include list.
        log::warn!("{}", empty_list_warning(&config.access_group_id));
    }
    log::info!(
        "Built include list: {} ipv4 + {} ipv6 = {}",
        doc.ipv4_count(),
        doc.ipv6_count(),
        update.include.len()
    );

    let cloudflare = AccessGroupClient::new(client.clone(), &config.api_base, api_token);
    cloudflare
        .update_access_group(&config.access_group_id, &update)
        .await?;

    log::info!(
        "#End sync: access group {} now holds {} ranges",
        config.access_group_id,
        update.include.len()
    );
    Ok(SyncOutcome::Updated {
        included: update.include.len(),
    })
}
