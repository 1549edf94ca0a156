//! Gallery asset types shared by the listing, dedup and download stages.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Publisher-specific asset identifier in its text form.
///
/// Numeric listing ids are stored as their decimal string so every
/// publisher dedups on the same column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Wraps an identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as stored in `id_gallery`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for AssetId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image variant of a gallery asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// The only image of a single-variant publisher.
    Wallpaper,
    /// Landscape/desktop variant.
    Desktop,
    /// Portrait/mobile variant.
    Mobile,
}

impl AssetKind {
    /// Returns the database string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wallpaper => "wallpaper",
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wallpaper" => Ok(Self::Wallpaper),
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            _ => Err(format!("invalid asset kind: {s}")),
        }
    }
}

/// One candidate image of a listed asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetImage {
    /// Which variant this image is.
    pub kind: AssetKind,
    /// Absolute download URL; empty when the listing had no path for this variant.
    pub url: String,
    /// Filename stem before sanitization.
    pub file_stem: String,
    /// Destination subfolder relative to the run's root, if any.
    pub subfolder: Option<&'static str>,
}

/// One entry of a publisher gallery listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Listing identifier.
    pub id: AssetId,
    /// Display title.
    pub title: String,
    /// Credited artist or creator when the listing has one.
    pub artist: Option<String>,
    /// Candidate images in variant order.
    pub images: Vec<AssetImage>,
}

/// A download derived from an [`AssetRecord`] that is not yet recorded.
///
/// Consumed exactly once by a pool worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDownload {
    /// Identifier of the listing entry this image belongs to.
    pub asset_id: AssetId,
    /// Publisher tag stored in the `game` column.
    pub source: &'static str,
    /// Variant of the image.
    pub kind: AssetKind,
    /// Absolute download URL.
    pub url: String,
    /// Sanitized filename without the inferred extension.
    pub file_name: String,
    /// Folder the file is written into.
    pub dest_dir: PathBuf,
}
