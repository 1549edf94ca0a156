//! Gallery listing fetch.

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::asset::AssetRecord;
use crate::download::{DownloadError, HttpClient};
use crate::publisher::Publisher;

/// Errors that abort a run before any download starts.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The listing request failed.
    #[error("failed to fetch {publisher} listing: {source}")]
    Fetch {
        publisher: &'static str,
        #[source]
        source: DownloadError,
    },

    /// The listing body did not match the publisher's envelope.
    #[error("failed to decode {publisher} listing from {url}: {source}")]
    Decode {
        publisher: &'static str,
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fetches and decodes the full listing of `publisher`.
///
/// # Errors
///
/// Returns [`ListingError::Fetch`] on network failure, timeout or non-success
/// status, and [`ListingError::Decode`] when the body is not the expected JSON.
#[instrument(skip(client, publisher), fields(publisher = publisher.tag(), url = %publisher.listing_url()))]
pub async fn fetch_listing(
    client: &HttpClient,
    publisher: &dyn Publisher,
) -> Result<Vec<AssetRecord>, ListingError> {
    let url = publisher.listing_url();
    let body = client
        .get_bytes(url)
        .await
        .map_err(|source| ListingError::Fetch {
            publisher: publisher.tag(),
            source,
        })?;

    let listing = publisher
        .decode_listing(&body)
        .map_err(|source| ListingError::Decode {
            publisher: publisher.tag(),
            url: url.to_string(),
            source,
        })?;

    debug!(
        status_code = listing.status_code,
        reported_count = listing.reported_count,
        "listing envelope decoded"
    );
    info!(records = listing.records.len(), "fetched gallery listing");

    Ok(listing.records)
}
