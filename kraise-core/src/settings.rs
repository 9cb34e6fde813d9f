//! Clap-free settings for the run and check pipelines.

use camino::Utf8PathBuf;
use kraise_domain::DEFAULT_MAX_PASSES;
use kraise_model::DEFAULT_PREFIX;
use kraise_types::Policy;

/// Settings for [`run_policy`](crate::pipeline::run_policy).
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub db_path: Utf8PathBuf,
    pub base_config: Option<Utf8PathBuf>,
    pub out_path: Utf8PathBuf,
    pub report_path: Option<Utf8PathBuf>,

    pub policy: Policy,
    /// `None` disables the pass limit.
    pub max_passes: Option<u64>,

    // Output
    pub prefix: String,
    pub header: Option<String>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            db_path: Utf8PathBuf::from("kconfig.toml"),
            base_config: None,
            out_path: Utf8PathBuf::from(".config"),
            report_path: None,
            policy: Policy::AllYes,
            max_passes: Some(DEFAULT_MAX_PASSES),
            prefix: DEFAULT_PREFIX.to_string(),
            header: None,
        }
    }
}

/// Settings for [`check_fixed_point`](crate::pipeline::check_fixed_point).
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub db_path: Utf8PathBuf,
    pub config_path: Utf8PathBuf,
    pub policy: Policy,
    pub prefix: String,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            db_path: Utf8PathBuf::from("kconfig.toml"),
            config_path: Utf8PathBuf::from(".config"),
            policy: Policy::AllYes,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}
