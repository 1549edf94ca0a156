//! Gallery Downloader Core Library
//!
//! Incrementally mirrors publisher wallpaper galleries: fetch a listing,
//! drop everything already recorded, download the rest through a bounded
//! worker pool and record each completed file in `SQLite`.
//!
//! # Architecture
//!
//! - [`publisher`] - Per-publisher listing endpoints and envelope decoding
//! - [`listing`] - Listing fetch
//! - [`dedup`] - Projection of a listing onto missing downloads
//! - [`download`] - HTTP client and bounded download pool
//! - [`store`] - Download record persistence
//! - [`db`] - Database connection and schema management
//! - [`pipeline`] - One end-to-end run
//! - [`app`] - Shared binary entry point (CLI, config file, logging)

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod asset;
pub mod db;
pub mod dedup;
pub mod download;
pub mod listing;
pub mod pipeline;
pub mod publisher;
pub mod store;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use asset::{AssetId, AssetImage, AssetKind, AssetRecord, PendingDownload};
pub use db::{Database, DatabaseOptions, DbError};
pub use dedup::{DedupSet, filter_new};
pub use download::{
    DownloadError, DownloadPool, HttpClient, PoolConfig, PoolError, PoolStats, SavedFile,
};
pub use listing::{ListingError, fetch_listing};
pub use pipeline::{PipelineError, RunOptions, RunSummary};
pub use publisher::{AetherGazer, Arknights, AzurLane, Listing, MahjongSoul, Publisher};
pub use store::{
    CompletionRecorder, DownloadedAssetRow, GalleryStore, NewDownloadedAsset, StoreDbErrorKind,
    StoreError,
};
