//! Completion-recorder seam between the download pool and storage.

use async_trait::async_trait;

use super::{GalleryStore, NewDownloadedAsset, StoreError};
use crate::asset::PendingDownload;

/// Records a finished download.
///
/// Called concurrently by every pool worker, once per written file.
#[async_trait]
pub trait CompletionRecorder: Send + Sync {
    /// Appends the record for `item`, saved on disk as `file_name`.
    async fn record(&self, item: &PendingDownload, file_name: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl CompletionRecorder for GalleryStore {
    async fn record(&self, item: &PendingDownload, file_name: &str) -> Result<(), StoreError> {
        self.insert(&NewDownloadedAsset::from_pending(item, file_name))
            .await
            .map(|_| ())
    }
}
