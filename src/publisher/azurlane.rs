//! Azur Lane special gallery listing.

use serde::Deserialize;

use super::{
    Listing, Publisher, YOSTAR_STATIC_BASE, credited_stem, non_empty, nullable, resolve_asset_url,
};
use crate::asset::{AssetId, AssetImage, AssetKind, AssetRecord};

const LISTING_URL: &str =
    "https://azurlane.yo-star.com/api/admin/special/public-list?page_index=1&page_num=1200&type=1";

/// Azur Lane special-gallery wallpapers.
#[derive(Debug, Clone)]
pub struct AzurLane {
    listing_url: String,
    static_base: String,
}

impl Default for AzurLane {
    fn default() -> Self {
        Self::new()
    }
}

impl AzurLane {
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
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    status_code: i64,
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
struct Row {
    id: i64,
    #[serde(default, deserialize_with = "nullable")]
    title: String,
    #[serde(default, deserialize_with = "nullable")]
    artist: String,
    #[serde(default, deserialize_with = "nullable")]
    works: String,
}

impl Publisher for AzurLane {
    fn tag(&self) -> &'static str {
        "azur_lane"
    }

    fn display_name(&self) -> &'static str {
        "Azur Lane"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn default_path(&self) -> &'static str {
        "AzurLane_Wallpaper"
    }

    fn decode_listing(&self, body: &[u8]) -> Result<Listing, serde_json::Error> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        let records = envelope
            .data
            .rows
            .into_iter()
            .map(|row| AssetRecord {
                id: AssetId::from(row.id),
                images: vec![AssetImage {
                    kind: AssetKind::Wallpaper,
                    url: resolve_asset_url(&self.static_base, &row.works),
                    file_stem: credited_stem(&row.title, &row.artist),
                    subfolder: None,
                }],
                artist: non_empty(&row.artist),
                title: row.title,
            })
            .collect();

        Ok(Listing {
            status_code: envelope.status_code,
            reported_count: envelope.data.count,
            records,
        })
    }
}
