//! Configuration file loading for kraise.
//!
//! Discovers and loads `kraise.toml` from the working directory, or from an explicit
//! `--config-file`. Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use kraise_core::DEFAULT_MAX_PASSES;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "kraise.toml";

/// Top-level configuration from kraise.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KraiseConfig {
    /// Run settings (pass limit, output path, symbol prefix).
    pub run: RunConfig,

    /// Output formatting.
    pub output: OutputConfig,
}

/// Run section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Pass limit before giving up on a fixed point.
    pub max_passes: Option<u64>,

    /// Run without a pass limit.
    pub unbounded: bool,

    /// Where to write the resulting `.config`.
    pub out: Option<Utf8PathBuf>,

    /// Symbol prefix used in `.config` files.
    pub prefix: Option<String>,
}

/// Output section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Extra comment lines written below the generated-file banner.
    pub header: Option<String>,
}

/// Discover the kraise.toml config file.
///
/// Returns `None` if no config file is found in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a kraise.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<KraiseConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<KraiseConfig> {
    let config: KraiseConfig = toml::from_str(contents).context("invalid TOML")?;
    if config.run.max_passes == Some(0) {
        anyhow::bail!("run.max_passes must be at least 1");
    }
    Ok(config)
}

/// Load the explicit config file if given, else discover one in `dir`, else use defaults.
///
/// An explicit path that does not exist is an error; a missing discovered file is not.
pub fn load_or_default(dir: &Utf8Path, explicit: Option<&Utf8Path>) -> anyhow::Result<KraiseConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(KraiseConfig::default()),
    }
}

/// CLI values that can override the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub max_passes: Option<u64>,
    pub unbounded: bool,
    pub out: Option<Utf8PathBuf>,
    pub prefix: Option<String>,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    /// `None` means no pass limit.
    pub max_passes: Option<u64>,
    pub out: Utf8PathBuf,
    pub prefix: String,
    pub header: Option<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: KraiseConfig,
}

impl ConfigMerger {
    pub fn new(config: KraiseConfig) -> Self {
        Self { config }
    }

    /// Merge with run command CLI arguments.
    ///
    /// `--unbounded` wins over any limit. Otherwise an explicit `--max-passes` wins over the
    /// file, and the file's `unbounded = true` wins over the built-in default.
    pub fn merge_run_args(self, cli: &RunOverrides) -> MergedConfig {
        let run = self.config.run;
        let max_passes = if cli.unbounded {
            None
        } else if let Some(n) = cli.max_passes {
            Some(n)
        } else if run.unbounded {
            None
        } else {
            Some(run.max_passes.unwrap_or(DEFAULT_MAX_PASSES))
        };

        MergedConfig {
            max_passes,
            out: cli
                .out
                .clone()
                .or(run.out)
                .unwrap_or_else(|| Utf8PathBuf::from(".config")),
            prefix: cli
                .prefix
                .clone()
                .or(run.prefix)
                .unwrap_or_else(|| "CONFIG_".to_string()),
            header: self.config.output.header,
        }
    }

    /// Prefix for `check`, which takes nothing else from the file.
    pub fn merge_prefix(self, cli_prefix: Option<&str>) -> String {
        cli_prefix
            .map(str::to_string)
            .or(self.config.run.prefix)
            .unwrap_or_else(|| "CONFIG_".to_string())
    }
}
