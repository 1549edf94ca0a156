//! Arknights fan-kit listing.
//!
//! Records are keyed by the string `_id`; images live on the shared Yostar
//! static host.

use serde::Deserialize;

use super::{
    Listing, Publisher, YOSTAR_STATIC_BASE, credited_stem, non_empty, nullable, resolve_asset_url,
};
use crate::asset::{AssetId, AssetImage, AssetKind, AssetRecord};

const LISTING_URL: &str =
    "https://arknights.global/api/cms/fankit/queryFankit?pageIndex=1&pageNum=1200&type=1";

/// Arknights fan-kit wallpapers. Only the large (`l`) rendition is fetched.
#[derive(Debug, Clone)]
pub struct Arknights {
    listing_url: String,
    static_base: String,
}

impl Default for Arknights {
    fn default() -> Self {
        Self::new()
    }
}

impl Arknights {
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
    retcode: i64,
    data: Data,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    #[serde(default)]
    page_count_num: i64,
    #[serde(default, deserialize_with = "nullable")]
    fankit_list: Vec<Fankit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fankit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default, deserialize_with = "nullable")]
    title: String,
    #[serde(default, deserialize_with = "nullable")]
    artist_name: String,
    #[serde(default, deserialize_with = "nullable")]
    wallpaper: Renditions,
}

#[derive(Debug, Default, Deserialize)]
struct Renditions {
    #[serde(default, deserialize_with = "nullable")]
    l: String,
}

impl Publisher for Arknights {
    fn tag(&self) -> &'static str {
        "arknights"
    }

    fn display_name(&self) -> &'static str {
        "Arknights"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn default_path(&self) -> &'static str {
        "Arknight_Wallpaper"
    }

    fn decode_listing(&self, body: &[u8]) -> Result<Listing, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        let records = envelope
            .data
            .fankit_list
            .into_iter()
            .map(|kit| AssetRecord {
                id: AssetId::from(kit.id),
                images: vec![AssetImage {
                    kind: AssetKind::Wallpaper,
                    url: resolve_asset_url(&self.static_base, &kit.wallpaper.l),
                    file_stem: credited_stem(&kit.title, &kit.artist_name),
                    subfolder: None,
                }],
                artist: non_empty(&kit.artist_name),
                title: kit.title,
            })
            .collect();

        Ok(Listing {
            status_code: envelope.retcode,
            reported_count: envelope.data.page_count_num,
            records,
        })
    }
}
