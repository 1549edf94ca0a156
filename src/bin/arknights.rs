//! Arknights wallpaper mirror.

use anyhow::Result;
use gallery_core::app;
use gallery_core::publisher::Arknights;

#[tokio::main]
async fn main() -> Result<()> {
    app::run_cli(&Arknights::new(), "arknights-wallpaper").await
}
