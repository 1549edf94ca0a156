//! Optional file configuration shared by all publisher binaries.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::db::DatabaseOptions;
use crate::download::PoolConfig;
use crate::pipeline::RunOptions;

const CONFIG_DIR_NAME: &str = "gallery-downloader";

/// Values read from `config.toml`; unset keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Concurrent download workers (1..=100).
    pub worker_count: Option<usize>,
    /// Bounded queue capacity (1..=10000).
    pub queue_capacity: Option<usize>,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// `SQLite` database path.
    pub database_path: Option<PathBuf>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
    /// Database pool max connections (1..=20).
    pub db_max_connections: Option<u32>,
    /// Database busy timeout in milliseconds.
    pub db_busy_timeout_ms: Option<u32>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        validate_range("worker_count", self.worker_count, 1, 100)?;
        validate_range("queue_capacity", self.queue_capacity, 1, 10_000)?;
        validate_range("request_timeout_secs", self.request_timeout_secs, 1, 3600)?;
        validate_range("connect_timeout_secs", self.connect_timeout_secs, 1, 3600)?;
        validate_range("db_max_connections", self.db_max_connections, 1, 20)?;
        validate_range("db_busy_timeout_ms", self.db_busy_timeout_ms, 0, 120_000)?;
        Ok(())
    }

    /// Builds run options, overlaying this config on the defaults.
    #[must_use]
    pub fn to_run_options(&self, dest_path: Option<PathBuf>) -> RunOptions {
        let defaults = RunOptions::default();
        let db_defaults = DatabaseOptions::default();
        let pool_defaults = PoolConfig::default();

        RunOptions {
            dest_path,
            database_path: self
                .database_path
                .clone()
                .unwrap_or(defaults.database_path),
            database: DatabaseOptions {
                max_connections: self
                    .db_max_connections
                    .unwrap_or(db_defaults.max_connections),
                busy_timeout_ms: self
                    .db_busy_timeout_ms
                    .unwrap_or(db_defaults.busy_timeout_ms),
            },
            pool: PoolConfig {
                worker_count: self.worker_count.unwrap_or(pool_defaults.worker_count),
                queue_capacity: self.queue_capacity.unwrap_or(pool_defaults.queue_capacity),
            },
            connect_timeout_secs: self
                .connect_timeout_secs
                .unwrap_or(defaults.connect_timeout_secs),
            request_timeout_secs: self
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
        }
    }
}

fn validate_range<T>(field: &str, value: Option<T>, min: T, max: T) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    let Some(value) = value else {
        return Ok(());
    };
    if value < min || value > max {
        bail!("Invalid config value for `{field}`: {value}. Expected range: {min}..={max}");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the tracing filter level for this setting.
    #[must_use]
    pub fn level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed config, or defaults when no file exists.
    pub config: FileConfig,
    /// Whether a file was read.
    pub loaded_from_file: bool,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/gallery-downloader/config.toml`
/// 2. `$HOME/.config/gallery-downloader/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(CONFIG_DIR_NAME)
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR_NAME)
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    match path.as_deref() {
        Some(path_ref) if path_ref.exists() => {
            let config = load_file_config(path_ref)?;
            Ok(LoadedConfig {
                path,
                config,
                loaded_from_file: true,
            })
        }
        _ => Ok(LoadedConfig {
            path,
            config: FileConfig::default(),
            loaded_from_file: false,
        }),
    }
}

/// Reads and parses one config file.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "worker_count" => {
                cfg.worker_count = Some(parse_integer(value).with_context(invalid)?);
            }
            "queue_capacity" => {
                cfg.queue_capacity = Some(parse_integer(value).with_context(invalid)?);
            }
            "request_timeout_secs" => {
                cfg.request_timeout_secs = Some(parse_integer(value).with_context(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer(value).with_context(invalid)?);
            }
            "database_path" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                if parsed.trim().is_empty() {
                    bail!("Invalid `database_path` value on line {line_no}: must not be empty");
                }
                cfg.database_path = Some(PathBuf::from(parsed));
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            "db_max_connections" => {
                cfg.db_max_connections = Some(parse_integer(value).with_context(invalid)?);
            }
            "db_busy_timeout_ms" => {
                cfg.db_busy_timeout_ms = Some(parse_integer(value).with_context(invalid)?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer<T>(raw_value: &str) -> Result<T>
where
    T: TryFrom<u64>,
{
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    let wide = u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range"))?;
    T::try_from(wide).map_err(|_| anyhow::anyhow!("Integer value out of range"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
            # gallery downloader
            worker_count = 8
            queue_capacity = 250   # bigger buffer
            request_timeout_secs = 45
            connect_timeout_secs = 10
            database_path = "/var/lib/gallery/#main.db"
            verbosity = "verbose"
            db_max_connections = 4
            db_busy_timeout_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.worker_count, Some(8));
        assert_eq!(cfg.queue_capacity, Some(250));
        assert_eq!(cfg.request_timeout_secs, Some(45));
        assert_eq!(cfg.connect_timeout_secs, Some(10));
        assert_eq!(
            cfg.database_path,
            Some(PathBuf::from("/var/lib/gallery/#main.db"))
        );
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert_eq!(cfg.db_max_connections, Some(4));
        assert_eq!(cfg.db_busy_timeout_ms, Some(0));
    }

    #[test]
    fn test_parse_config_empty_is_default() {
        assert_eq!(parse_config_str("\n# nothing\n").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_parse_config_rejects_unknown_key() {
        let error = parse_config_str("concurrency = 3").unwrap_err();
        assert!(error.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let error = parse_config_str("worker_count 3").unwrap_err();
        assert!(error.to_string().contains("line 1"));
    }

    #[test]
    fn test_parse_config_rejects_out_of_range_values() {
        for raw in [
            "worker_count = 0",
            "worker_count = 101",
            "queue_capacity = 10001",
            "request_timeout_secs = 0",
            "connect_timeout_secs = 3601",
            "db_max_connections = 21",
            "db_busy_timeout_ms = 120001",
        ] {
            let error = parse_config_str(raw).unwrap_err();
            assert!(
                error.to_string().contains("Expected range"),
                "{raw}: {error:#}"
            );
        }
    }

    #[test]
    fn test_parse_config_rejects_malformed_values() {
        assert!(parse_config_str("worker_count = -1").is_err());
        assert!(parse_config_str("worker_count = five").is_err());
        assert!(parse_config_str("database_path = unquoted.db").is_err());
        assert!(parse_config_str(r#"database_path = """#).is_err());
        assert!(parse_config_str(r#"verbosity = "loud""#).is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(VerbositySetting::Default.level(), "info");
        assert_eq!(VerbositySetting::Verbose.level(), "debug");
        assert_eq!(VerbositySetting::Quiet.level(), "error");
        assert_eq!(VerbositySetting::Debug.level(), "trace");
    }

    #[test]
    fn test_to_run_options_overlays_defaults() {
        let cfg = FileConfig {
            worker_count: Some(2),
            db_busy_timeout_ms: Some(100),
            ..FileConfig::default()
        };

        let options = cfg.to_run_options(Some(PathBuf::from("/walls")));

        assert_eq!(options.dest_path, Some(PathBuf::from("/walls")));
        assert_eq!(options.pool.worker_count, 2);
        assert_eq!(options.pool.queue_capacity, 100);
        assert_eq!(options.database.busy_timeout_ms, 100);
        assert_eq!(options.database.max_connections, 5);
        assert_eq!(options.database_path, PathBuf::from("yostar-gallery.db"));
        assert_eq!(options.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_file_config_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "worker_count = 500\n").unwrap();

        let error = load_file_config(&path).unwrap_err();
        assert!(format!("{error:#}").contains("config.toml"));
    }
}
