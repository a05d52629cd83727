//! Access group client.
//!
//! Only the one call the sync job needs: replacing an Access group.

use crate::models::AccessGroupUpdate;
use crate::SyncError;
use colored::Colorize;

/// Thin client for `/accounts/{account_id}/access/groups/{group_id}`.
pub struct AccessGroupClient {
    client: reqwest::Client,
    api_base: String,
    api_token: String,
}

impl AccessGroupClient {
    pub fn new(client: reqwest::Client, api_base: &str, api_token: &str) -> AccessGroupClient {
        AccessGroupClient {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    /// URL of a single Access group.
    pub fn group_url(&self, account_id: &str, group_id: &str) -> String {
        format!(
            "{base}/accounts/{account_id}/access/groups/{group_id}",
            base = self.api_base
        )
    }

    /// Overwrite an Access group with `update`.
    ///
    /// The account is taken from `update.account_id`. The response body is
    /// not read; only the status decides success.
    ///
    /// # Returns
    /// * `Ok(())` - The API answered with a success status
    /// * `Err` - Transport failure or a non-success status
    pub async fn update_access_group(
        &self,
        group_id: &str,
        update: &AccessGroupUpdate,
    ) -> Result<(), SyncError> {
        let url = self.group_url(&update.account_id, group_id);
        log::debug!(
            "PUT {url} include={count}",
            url = url.on_blue(),
            count = update.include.len()
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(update)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!(
                "{failed} to update access group {group_id}: {status}",
                failed = "failed".on_red(),
                status = status.as_u16()
            );
            return Err(format!("Access group update returned {status} for {url}").into());
        }

        Ok(())
    }
}
