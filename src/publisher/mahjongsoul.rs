//! Mahjong Soul wallpaper listing.

use serde::Deserialize;

use super::{Listing, Publisher, nullable};
use crate::asset::{AssetId, AssetImage, AssetKind, AssetRecord};

const LISTING_URL: &str =
    "https://mahjongsoul.yo-star.com/api/assets/wallpaper?pageIndex=1&pageNum=12000";

/// Mahjong Soul wallpapers. The listing carries absolute URLs; only the PC
/// rendition is downloaded.
#[derive(Debug, Clone)]
pub struct MahjongSoul {
    listing_url: String,
}

impl Default for MahjongSoul {
    fn default() -> Self {
        Self::new()
    }
}

impl MahjongSoul {
    /// Creates the publisher with its production listing endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::with_listing_url(LISTING_URL)
    }

    /// Creates the publisher against an alternate listing endpoint. Image URLs
    /// come from the listing itself.
    #[must_use]
    pub fn with_listing_url(listing_url: impl Into<String>) -> Self {
        Self {
            listing_url: listing_url.into(),
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
struct Row {
    id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pc: String,
    #[serde(default, deserialize_with = "nullable")]
    title: String,
}

impl Publisher for MahjongSoul {
    fn tag(&self) -> &'static str {
        "mahjong_soul"
    }

    fn display_name(&self) -> &'static str {
        "Mahjong Soul"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn default_path(&self) -> &'static str {
        "MahjongSoul_Wallpaper"
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
                    url: row.pc.trim().to_string(),
                    file_stem: row.title.clone(),
                    subfolder: None,
                }],
                artist: None,
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
