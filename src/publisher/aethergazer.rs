//! Aether Gazer gallery listing with desktop and mobile renditions.

use serde::Deserialize;

use super::{Listing, Publisher, YOSTAR_STATIC_BASE, non_empty, nullable, resolve_asset_url};
use crate::asset::{AssetId, AssetImage, AssetKind, AssetRecord};

const LISTING_URL: &str =
    "https://aethergazer.com/api/gallery/list?pageIndex=1&pageNum=1200&type=wallpaper";

/// Subfolder for landscape images.
pub const CONTENT_SUBFOLDER: &str = "contentImg";
/// Subfolder for portrait images.
pub const MOBILE_SUBFOLDER: &str = "mobileContentImg";

/// Aether Gazer gallery. Every entry has a desktop and a mobile image,
/// stored in separate subfolders.
#[derive(Debug, Clone)]
pub struct AetherGazer {
    listing_url: String,
    static_base: String,
}

impl Default for AetherGazer {
    fn default() -> Self {
        Self::new()
    }
}

impl AetherGazer {
    /// Creates the publisher with its production endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::with_urls(LISTING_URL, YOSTAR_STATIC_BASE)
    }

    /// Creates the publisher against alternate listing and asset hosts.
    #[must_use]
    pub fn with_urls(listing_url: impl Into<String>, static_base: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
            static_base: static_base.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    code: i64,
    data: Data,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(default)]
    count: i64,
    #[serde(default, deserialize_with = "nullable")]
    rows: Vec<Row>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Row {
    id: i64,
    #[serde(default, deserialize_with = "nullable")]
    title: String,
    #[serde(default, deserialize_with = "nullable")]
    content_img: String,
    #[serde(default, deserialize_with = "nullable")]
    mobile_content_img1: String,
    #[serde(default, deserialize_with = "nullable")]
    creator: String,
}

impl Publisher for AetherGazer {
    fn tag(&self) -> &'static str {
        "aether_gazer"
    }

    fn display_name(&self) -> &'static str {
        "Aether Gazer"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn default_path(&self) -> &'static str {
        "AetherGazer_Wallpaper"
    }

    fn subfolders(&self) -> &'static [&'static str] {
        &[CONTENT_SUBFOLDER, MOBILE_SUBFOLDER]
    }

    fn decode_listing(&self, body: &[u8]) -> Result<Listing, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        let records = envelope
            .data
            .rows
            .into_iter()
            .map(|row| AssetRecord {
                id: AssetId::from(row.id),
                images: vec![
                    AssetImage {
                        kind: AssetKind::Desktop,
                        url: resolve_asset_url(&self.static_base, &row.content_img),
                        file_stem: format!("{}_{}_content", row.title, row.id),
                        subfolder: Some(CONTENT_SUBFOLDER),
                    },
                    AssetImage {
                        kind: AssetKind::Mobile,
                        url: resolve_asset_url(&self.static_base, &row.mobile_content_img1),
                        file_stem: format!("{}_{}_mobile", row.title, row.id),
                        subfolder: Some(MOBILE_SUBFOLDER),
                    },
                ],
                artist: non_empty(&row.creator),
                title: row.title,
            })
            .collect();

        Ok(Listing {
            status_code: envelope.code,
            reported_count: envelope.data.count,
            records,
        })
    }
}
