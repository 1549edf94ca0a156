//! Publisher gallery definitions.
//!
//! Each publisher knows its listing endpoint, decodes its own JSON envelope
//! into [`AssetRecord`]s and names the source tag its rows are stored under.
//! The pipeline is generic over [`Publisher`]; nothing here performs I/O.

mod aethergazer;
mod arknights;
mod azurlane;
mod mahjongsoul;

pub use aethergazer::AetherGazer;
pub use arknights::Arknights;
pub use azurlane::AzurLane;
pub use mahjongsoul::MahjongSoul;

use serde::{Deserialize, Deserializer};
use url::Url;

use crate::asset::AssetRecord;

/// Static asset host shared by the Azur Lane and Arknights galleries.
pub const YOSTAR_STATIC_BASE: &str = "https://webusstatic.yo-star.com/";

/// A decoded gallery listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Envelope status code as reported by the publisher.
    pub status_code: i64,
    /// Row count as reported by the publisher.
    pub reported_count: i64,
    /// Decoded records, in listing order.
    pub records: Vec<AssetRecord>,
}

/// A publisher gallery the pipeline can mirror.
pub trait Publisher: Send + Sync {
    /// Source tag stored in the `game` column.
    fn tag(&self) -> &'static str;

    /// Human readable name used in logs and CLI help.
    fn display_name(&self) -> &'static str;

    /// Listing endpoint.
    fn listing_url(&self) -> &str;

    /// Destination folder, relative to the home directory, when `--path` is absent.
    fn default_path(&self) -> &'static str;

    /// Subfolders of the destination root that images are written into.
    fn subfolders(&self) -> &'static [&'static str] {
        &[]
    }

    /// Decodes a listing response body.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the body is not the expected envelope.
    fn decode_listing(&self, body: &[u8]) -> Result<Listing, serde_json::Error>;
}

/// Resolves an asset path from a listing against `base`.
///
/// Absolute URLs pass through. An empty path stays empty so callers can
/// skip the variant.
pub(crate) fn resolve_asset_url(base: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return String::new();
    }
    if let Ok(absolute) = Url::parse(path) {
        return absolute.into();
    }

    let relative = path.trim_start_matches('/');
    let joined = if base.ends_with('/') {
        Url::parse(base).and_then(|b| b.join(relative))
    } else {
        Url::parse(&format!("{base}/")).and_then(|b| b.join(relative))
    };
    match joined {
        Ok(url) => url.into(),
        Err(_) => format!("{}/{relative}", base.trim_end_matches('/')),
    }
}

/// Formats the `"<title> (<artist>)"` stem, dropping empty credits.
pub(crate) fn credited_stem(title: &str, artist: &str) -> String {
    let artist = artist.trim();
    if artist.is_empty() {
        title.to_string()
    } else {
        format!("{title} ({artist})")
    }
}

/// Deserializes `null` as the type's default.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Trims `value`, returning `None` when nothing is left.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
