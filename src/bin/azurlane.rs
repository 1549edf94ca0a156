//! Azur Lane wallpaper mirror.

use anyhow::Result;
use gallery_core::app;
use gallery_core::publisher::AzurLane;

#[tokio::main]
async fn main() -> Result<()> {
    app::run_cli(&AzurLane::new(), "azurlane-wallpaper").await
}
