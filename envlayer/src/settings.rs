//! Source settings: where a fill looks for its YAML file, env files and prefix
//!
//! Settings are captured once at startup, usually from the three command-line
//! flags, and either passed to a [`ConfigFiller`](crate::ConfigFiller)
//! explicitly or installed as process-wide state for [`fill`](crate::fill).

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Default env file name, looked up in the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

static SETTINGS: OnceLock<ProcessSettings> = OnceLock::new();

/// The three knobs controlling where configuration comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct ProcessSettings {
    /// YAML config file path
    #[cfg_attr(
        feature = "cli",
        arg(long = "yaml-config", value_name = "PATH", default_value_t, hide_default_value = true)
    )]
    pub yaml_path: String,

    /// .env config file path, or a comma-separated list of paths
    #[cfg_attr(
        feature = "cli",
        arg(long = "env-config", value_name = "PATH[,PATH...]", default_value_t, hide_default_value = true)
    )]
    pub env_path: String,

    /// Environment settings prefix
    #[cfg_attr(
        feature = "cli",
        arg(long = "env-prefix", value_name = "PREFIX", default_value_t, hide_default_value = true)
    )]
    pub env_prefix: String,
}

impl ProcessSettings {
    /// Empty settings: no YAML file, default env file, no prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the YAML config file path
    pub fn with_yaml_path(mut self, path: impl Into<String>) -> Self {
        self.yaml_path = path.into();
        self
    }

    /// Set the env file path (comma-separated for several files)
    pub fn with_env_path(mut self, path: impl Into<String>) -> Self {
        self.env_path = path.into();
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// YAML file to decode, if one was configured
    pub fn yaml_file(&self) -> Option<&Path> {
        if self.yaml_path.is_empty() {
            None
        } else {
            Some(Path::new(&self.yaml_path))
        }
    }

    /// Explicitly listed env files; empty means "use [`DEFAULT_ENV_FILE`]"
    pub fn env_files(&self) -> Vec<PathBuf> {
        self.env_path
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// Parse the settings from the process arguments, exiting on bad input
    #[cfg(feature = "cli")]
    pub fn parse() -> Self {
        use clap::Parser;
        CliArgs::parse().settings
    }

    /// Parse the settings from an explicit argument list
    #[cfg(feature = "cli")]
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        use clap::Parser;
        Ok(CliArgs::try_parse_from(args)?.settings)
    }
}

/// Standalone parser accepting only the three settings flags
#[cfg(feature = "cli")]
#[derive(Debug, clap::Parser)]
#[command(about = "Configuration sources")]
pub struct CliArgs {
    #[command(flatten)]
    pub settings: ProcessSettings,
}

/// Install process-wide settings.
///
/// Only the first install takes effect; later calls return `false`.
pub fn install(settings: ProcessSettings) -> bool {
    match SETTINGS.set(settings) {
        Ok(()) => {
            debug!("Process-wide config settings installed");
            true
        }
        Err(rejected) => {
            if SETTINGS.get() != Some(&rejected) {
                warn!(
                    yaml_path = %rejected.yaml_path,
                    env_path = %rejected.env_path,
                    env_prefix = %rejected.env_prefix,
                    "Config settings already installed, ignoring different values"
                );
            }
            false
        }
    }
}

/// Read the three flags from the command line and install them
#[cfg(feature = "cli")]
pub fn initialize() {
    install(ProcessSettings::parse());
}

/// Installed process-wide settings, if any
pub fn settings() -> Option<&'static ProcessSettings> {
    SETTINGS.get()
}
