//! Command-line arguments shared by the publisher binaries.

use std::path::PathBuf;

use clap::Parser;

/// Mirror a publisher wallpaper gallery into a local folder.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version)]
pub struct Args {
    /// Destination folder; relative paths are resolved from the home directory
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,
}
