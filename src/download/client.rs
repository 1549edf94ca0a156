//! HTTP client wrapper for listing fetches and image downloads.
//!
//! One `HttpClient` is built per run and shared (cloned) by the listing
//! fetch and every pool worker, so connections are pooled across items.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::resolve_filename;
use crate::user_agent;

/// Result of a successful image download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Final output path, including the inferred extension.
    pub path: PathBuf,
    /// Number of body bytes written.
    pub bytes: u64,
}

/// HTTP client with bounded connect and request timeouts.
///
/// # Example
///
/// ```no_run
/// use gallery_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new()?;
/// let saved = client
///     .download_to_file("https://example.com/wall.png", Path::new("./walls"), "wall")
///     .await?;
/// println!("Saved {} bytes to {}", saved.bytes, saved.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with the default 30 second timeouts.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::ClientBuild` if reqwest rejects the configuration.
    pub fn new() -> Result<Self, DownloadError> {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS)
    }

    /// Creates a client with explicit connect and whole-request timeouts.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::ClientBuild` if reqwest rejects the configuration.
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        request_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(request_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(DownloadError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Fetches `url` and returns the full response body.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` on an invalid URL, network failure, timeout or
    /// non-success status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.send_request(url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        debug!(bytes = body.len(), "response body read");
        Ok(body.to_vec())
    }

    /// Downloads `url` into `dest_dir` as `stem` plus an inferred extension.
    ///
    /// An existing file with the same name is overwritten. A partially
    /// written file is removed when the body stream fails.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Writing to disk fails
    #[must_use = "download result contains the path to the saved file"]
    #[instrument(skip(self, dest_dir), fields(url = %url, stem = %stem))]
    pub async fn download_to_file(
        &self,
        url: &str,
        dest_dir: &Path,
        stem: &str,
    ) -> Result<SavedFile, DownloadError> {
        let response = self.send_request(url).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let file_name = resolve_filename(stem, url, content_type.as_deref());
        let file_path = dest_dir.join(&file_name);
        debug!(path = %file_path.display(), content_type = ?content_type, "resolved output path");

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(file_path.clone(), e))?;

        let stream_result = stream_to_file(&mut file, response, url, &file_path).await;
        if stream_result.is_err() {
            debug!(path = %file_path.display(), "cleaning up partial file after error");
            drop(file);
            let _ = tokio::fs::remove_file(&file_path).await;
        }
        let bytes = stream_result?;

        Ok(SavedFile {
            path: file_path,
            bytes,
        })
    }

    async fn send_request(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }
        Ok(response)
    }
}

/// Streams the response body to `file`, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}
