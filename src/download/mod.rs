//! HTTP downloads and the bounded worker pool.
//!
//! # Features
//!
//! - Streaming downloads straight to disk
//! - Extension inference from the stem, URL or `Content-Type`
//! - Bounded timeouts (30s connect, 30s request by default)
//! - Structured error types with full context
//! - Fixed-size worker pool over a bounded queue
//!
//! # Example
//!
//! ```no_run
//! use gallery_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let saved = client
//!     .download_to_file("https://example.com/wall.jpg", Path::new("./walls"), "wall")
//!     .await?;
//! println!("Downloaded: {}", saved.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;
mod pool;

pub use client::{HttpClient, SavedFile};
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT, MAX_QUEUE_CAPACITY,
    MAX_WORKER_COUNT, MIN_QUEUE_CAPACITY, MIN_WORKER_COUNT, REQUEST_TIMEOUT_SECS,
};
pub use error::DownloadError;
pub use filename::{extension_of, resolve_filename, sanitize_filename};
pub use pool::{DownloadPool, PoolConfig, PoolError, PoolStats};
