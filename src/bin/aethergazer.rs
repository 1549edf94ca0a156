//! Aether Gazer wallpaper mirror.

use anyhow::Result;
use gallery_core::app;
use gallery_core::publisher::AetherGazer;

#[tokio::main]
async fn main() -> Result<()> {
    app::run_cli(&AetherGazer::new(), "aethergazer-wallpaper").await
}
