//! `SQLite`-backed record of downloaded gallery assets.
//!
//! The store is read once per run for the dedup set and appended to by pool
//! workers as files land on disk. Rows are never updated or deleted.
//!
//! # Example
//!
//! ```ignore
//! use gallery_core::store::GalleryStore;
//! use gallery_core::Database;
//! use std::path::Path;
//!
//! let db = Database::new(Path::new("yostar-gallery.db")).await?;
//! let store = GalleryStore::new(db);
//! let seen = store.recorded_variants("azur_lane").await?;
//! ```

mod error;
mod recorder;
mod row;

use std::collections::HashSet;

pub use error::{StoreDbErrorKind, StoreError};
pub use recorder::CompletionRecorder;
pub use row::{DownloadedAssetRow, NewDownloadedAsset};

use sqlx::Row;
use tracing::{debug, instrument};

use crate::asset::{AssetId, AssetKind};
use crate::db::Database;
use crate::dedup::DedupSet;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Gallery download history backed by the shared `yostar_gallery` table.
#[derive(Debug, Clone)]
pub struct GalleryStore {
    db: Database,
}

impl GalleryStore {
    /// Creates a store over an opened database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns the underlying database handle.
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Returns every gallery identifier already recorded for `game`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn existing_ids(&self, game: &str) -> Result<HashSet<AssetId>> {
        let rows = sqlx::query(r"SELECT DISTINCT id_gallery FROM yostar_gallery WHERE game = ?")
            .bind(game)
            .fetch_all(self.db.pool())
            .await?;

        let ids: HashSet<AssetId> = rows
            .iter()
            .map(|row| AssetId::new(row.get::<String, _>("id_gallery")))
            .collect();
        debug!(count = ids.len(), "loaded recorded gallery ids");
        Ok(ids)
    }

    /// Returns the `(id, kind)` pairs already recorded for `game`.
    ///
    /// This is the dedup set: a record with several images stays pending for
    /// every kind that has no row yet. Rows with an unknown `type` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn recorded_variants(&self, game: &str) -> Result<DedupSet> {
        let rows = sqlx::query(r"SELECT id_gallery, type FROM yostar_gallery WHERE game = ?")
            .bind(game)
            .fetch_all(self.db.pool())
            .await?;

        let mut recorded = DedupSet::with_capacity(rows.len());
        for row in &rows {
            let kind: String = row.get("type");
            let Ok(kind) = kind.parse::<AssetKind>() else {
                debug!(kind = %kind, "ignoring row with unknown asset kind");
                continue;
            };
            recorded.insert((AssetId::new(row.get::<String, _>("id_gallery")), kind));
        }
        debug!(count = recorded.len(), "loaded recorded gallery variants");
        Ok(recorded)
    }

    /// Appends one downloaded asset and returns its row id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the insert fails; a duplicate
    /// (id, game, type) triple is classified as
    /// [`StoreDbErrorKind::ConstraintViolation`].
    #[instrument(skip(self, asset), fields(id_gallery = %asset.id_gallery, game = %asset.game, kind = %asset.kind))]
    pub async fn insert(&self, asset: &NewDownloadedAsset<'_>) -> Result<i64> {
        let result = sqlx::query(
            r"INSERT INTO yostar_gallery (id_gallery, game, type, file_name, url)
              VALUES (?, ?, ?, ?, ?)",
        )
        .bind(asset.id_gallery)
        .bind(asset.game)
        .bind(asset.kind.as_str())
        .bind(asset.file_name)
        .bind(asset.url)
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Lists the rows recorded for `game`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_by_source(&self, game: &str) -> Result<Vec<DownloadedAssetRow>> {
        let rows = sqlx::query_as::<_, DownloadedAssetRow>(
            r"SELECT id, id_gallery, game, type, file_name, url, created_at
              FROM yostar_gallery WHERE game = ? ORDER BY id",
        )
        .bind(game)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// Counts the rows recorded for `game`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn count_by_source(&self, game: &str) -> Result<i64> {
        let result = sqlx::query(r"SELECT COUNT(*) as count FROM yostar_gallery WHERE game = ?")
            .bind(game)
            .fetch_one(self.db.pool())
            .await?;

        Ok(result.get("count"))
    }
}
