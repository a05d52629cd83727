//! Fetch the Google IP range document.

use crate::models::IpRangeDocument;
use crate::SyncError;
use colored::Colorize;

/// Download and parse the published IP range document.
///
/// The request is unauthenticated and is attempted once.
///
/// # Arguments
/// * `client` - HTTP client to send the request with
/// * `url` - Location of `goog.json`
///
/// # Returns
/// * `Ok(Some(IpRangeDocument))` - The parsed document
/// * `Ok(None)` - The server answered with a non-success status (logged)
/// * `Err` - Transport failure or a body that is not an IP range document
pub async fn fetch_ip_ranges(
    client: &reqwest::Client,
    url: &str,
) -> Result<Option<IpRangeDocument>, SyncError> {
    log::debug!("GET {url}", url = url.on_blue());

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        log::error!(
            "{failed} to fetch Google IPs: {status}",
            failed = "Failed".on_red(),
            status = status.as_u16()
        );
        return Ok(None);
    }

    let body = response.text().await?;
    log::debug!("Got {} bytes from {url}", body.len());

    let doc = parse_ip_ranges(&body)?;
    log::info!(
        "Google IP ranges syncToken={} creationTime={} prefixes={}",
        doc.sync_token,
        doc.creation_time,
        doc.prefixes.len()
    );
    Ok(Some(doc))
}

/// Parse a `goog.json` body, reporting the JSON path of any failure.
pub fn parse_ip_ranges(body: &str) -> Result<IpRangeDocument, SyncError> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    let doc = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing IP range document: path={} error={}",
            e.path(),
            e
        )
    })?;
    Ok(doc)
}
