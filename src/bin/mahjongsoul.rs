//! Mahjong Soul wallpaper mirror.

use anyhow::Result;
use gallery_core::app;
use gallery_core::publisher::MahjongSoul;

#[tokio::main]
async fn main() -> Result<()> {
    app::run_cli(&MahjongSoul::new(), "mahjongsoul-wallpaper").await
}
