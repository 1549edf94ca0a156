//! Shared entry point of the per-publisher binaries.

mod cli;
pub mod config;
mod terminal;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches};
use tracing::{debug, error, info};

pub use cli::Args;

use crate::pipeline;
use crate::publisher::Publisher;

/// Parses arguments, loads config, sets up logging and mirrors `publisher`.
///
/// Item failures are logged by the pool and do not fail the run.
///
/// # Errors
///
/// Returns an error for an invalid config file or any fatal pipeline setup
/// failure (destination, database, listing).
pub async fn run_cli(publisher: &dyn Publisher, bin_name: &'static str) -> Result<()> {
    let about = format!(
        "Download new {} wallpapers into a local folder",
        publisher.display_name()
    );
    let matches = Args::command().name(bin_name).about(about).get_matches();
    let args = Args::from_arg_matches(&matches)?;

    let loaded = config::load_default_file_config();
    let no_color = terminal::should_disable_color(
        terminal::no_color_env_requested(),
        terminal::is_dumb_terminal(),
    );
    let default_level = loaded
        .as_ref()
        .ok()
        .and_then(|loaded| loaded.config.verbosity)
        .map_or("info", config::VerbositySetting::level);
    terminal::init_tracing(default_level, no_color);

    let loaded =
        loaded.inspect_err(|e| error!(error = %format!("{e:#}"), "invalid configuration"))?;
    if loaded.loaded_from_file {
        debug!(path = ?loaded.path, "loaded config file");
    }

    let options = loaded.config.to_run_options(args.path);
    info!(publisher = publisher.display_name(), "starting gallery mirror");

    let summary = pipeline::run(publisher, &options)
        .await
        .inspect_err(|e| error!(error = %e, "run aborted"))
        .with_context(|| format!("{} mirror failed", publisher.display_name()))?;

    info!(
        root = %summary.root.display(),
        listed = summary.listed,
        downloaded = summary.stats.downloaded,
        failed = summary.stats.failed,
        "done"
    );
    Ok(())
}
