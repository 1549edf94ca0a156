//! Persisted download rows.

use sqlx::FromRow;

use crate::asset::{AssetKind, PendingDownload};

/// One row of `yostar_gallery`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DownloadedAssetRow {
    /// Row id.
    pub id: i64,
    /// Listing identifier in text form.
    pub id_gallery: String,
    /// Publisher tag.
    pub game: String,
    /// Asset kind as stored (`wallpaper`, `desktop`, `mobile`).
    #[sqlx(rename = "type")]
    pub kind: String,
    /// Filename the image was saved under.
    pub file_name: String,
    /// Source URL.
    pub url: String,
    /// Insertion timestamp (`SQLite` `datetime('now')`).
    pub created_at: String,
}

impl DownloadedAssetRow {
    /// Parses the stored kind back into an [`AssetKind`].
    #[must_use]
    pub fn asset_kind(&self) -> Option<AssetKind> {
        self.kind.parse().ok()
    }
}

/// Insert payload for a completed download.
#[derive(Debug, Clone, Copy)]
pub struct NewDownloadedAsset<'a> {
    pub id_gallery: &'a str,
    pub game: &'a str,
    pub kind: AssetKind,
    pub file_name: &'a str,
    pub url: &'a str,
}

impl<'a> NewDownloadedAsset<'a> {
    /// Builds the row payload for `item` saved as `file_name`.
    #[must_use]
    pub fn from_pending(item: &'a PendingDownload, file_name: &'a str) -> Self {
        Self {
            id_gallery: item.asset_id.as_str(),
            game: item.source,
            kind: item.kind,
            file_name,
            url: &item.url,
        }
    }
}
