//! One incremental mirror run: list, dedup, download, record.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::db::{Database, DatabaseOptions, DbError};
use crate::dedup::filter_new;
use crate::download::{
    CONNECT_TIMEOUT_SECS, DownloadError, DownloadPool, HttpClient, PoolConfig, PoolError,
    PoolStats, REQUEST_TIMEOUT_SECS,
};
use crate::listing::{ListingError, fetch_listing};
use crate::publisher::Publisher;
use crate::store::{GalleryStore, StoreError};

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "yostar-gallery.db";

/// Errors that abort a run before downloading starts.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid pool configuration: {0}")]
    Pool(#[from] PoolError),

    #[error("could not determine the home directory")]
    HomeDirUnavailable,

    #[error("failed to create folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("failed to read recorded downloads: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    HttpClient(#[from] DownloadError),

    #[error(transparent)]
    Listing(#[from] ListingError),
}

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Destination override; relative paths are taken from the home directory.
    pub dest_path: Option<PathBuf>,
    /// `SQLite` file holding the download record.
    pub database_path: PathBuf,
    /// Connection pool tunables.
    pub database: DatabaseOptions,
    /// Worker pool sizing.
    pub pool: PoolConfig,
    /// HTTP connect timeout.
    pub connect_timeout_secs: u64,
    /// HTTP whole-request timeout.
    pub request_timeout_secs: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dest_path: None,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            database: DatabaseOptions::default(),
            pool: PoolConfig::default(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Destination root the files were written under.
    pub root: PathBuf,
    /// Records in the listing.
    pub listed: usize,
    /// Downloads that were not yet recorded.
    pub pending: usize,
    /// Pool counters.
    pub stats: PoolStats,
}

/// Resolves the destination root.
///
/// An absolute `requested` path is used as-is; otherwise the requested (or
/// default) path is joined onto `home`.
///
/// # Errors
///
/// Returns [`PipelineError::HomeDirUnavailable`] when a home-relative path is
/// needed and `home` is `None`.
pub fn resolve_destination(
    home: Option<&Path>,
    requested: Option<&Path>,
    default_path: &str,
) -> Result<PathBuf, PipelineError> {
    let relative = match requested {
        Some(path) if path.is_absolute() => return Ok(path.to_path_buf()),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_path),
    };
    let home = home.ok_or(PipelineError::HomeDirUnavailable)?;
    Ok(home.join(relative))
}

/// Creates `root` and each publisher subfolder.
///
/// # Errors
///
/// Returns [`PipelineError::CreateFolder`] for the first folder that cannot
/// be created.
pub async fn create_folders(root: &Path, subfolders: &[&str]) -> Result<(), PipelineError> {
    let folders =
        std::iter::once(root.to_path_buf()).chain(subfolders.iter().map(|sub| root.join(sub)));

    for folder in folders {
        if tokio::fs::metadata(&folder).await.is_ok_and(|m| m.is_dir()) {
            continue;
        }
        tokio::fs::create_dir_all(&folder)
            .await
            .map_err(|source| PipelineError::CreateFolder {
                path: folder.clone(),
                source,
            })?;
        info!(path = %folder.display(), "new folder created");
    }
    Ok(())
}

/// Mirrors every not-yet-recorded asset of `publisher`.
///
/// Item-level download and record failures are logged and counted in the
/// returned stats; only setup failures are errors.
///
/// # Errors
///
/// Returns [`PipelineError`] for invalid pool sizing, an unresolvable or
/// uncreatable destination, database open/migration failures, or a listing
/// that cannot be fetched or decoded.
#[instrument(skip(publisher, options), fields(publisher = publisher.tag()))]
pub async fn run(
    publisher: &dyn Publisher,
    options: &RunOptions,
) -> Result<RunSummary, PipelineError> {
    options.pool.validate()?;

    let root = resolve_destination(
        dirs::home_dir().as_deref(),
        options.dest_path.as_deref(),
        publisher.default_path(),
    )?;
    create_folders(&root, publisher.subfolders()).await?;

    let db = Database::new_with_options(&options.database_path, &options.database).await?;
    let store = GalleryStore::new(db.clone());
    let existing = store.recorded_variants(publisher.tag()).await?;

    let client =
        HttpClient::with_timeouts(options.connect_timeout_secs, options.request_timeout_secs)?;
    let records = fetch_listing(&client, publisher).await?;
    let pending = filter_new(&records, &existing, publisher.tag(), &root);
    info!(
        listed = records.len(),
        already_recorded = existing.len(),
        pending = pending.len(),
        "dedup complete"
    );

    let pending_count = pending.len();
    let pool = DownloadPool::new(options.pool, client, Arc::new(store))?;
    let stats = pool.run(pending).await;
    drop(pool);
    db.close().await;

    info!(
        enqueued = stats.enqueued,
        downloaded = stats.downloaded,
        failed = stats.failed,
        record_failed = stats.record_failed,
        "run finished"
    );

    Ok(RunSummary {
        root,
        listed: records.len(),
        pending: pending_count,
        stats,
    })
}
