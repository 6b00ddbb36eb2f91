//! Config filler: runs the file, env file, overlay and validation stages in order

use crate::dotenv::{load_env_files, EnvFileStatus};
use crate::env::{self, AppliedVar, EnvContext, EnvNaming, EnvSource, Fillable, ProcessEnv, UpperSnake};
use crate::error::ConfigResult;
use crate::settings::ProcessSettings;
use crate::validation::validate_config;
use crate::yaml::fill_from_file;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Diagnostics from a successful fill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    /// YAML file that was decoded, if one was configured
    pub yaml_file: Option<PathBuf>,
    /// Load status of every env file attempted
    pub env_files: Vec<EnvFileStatus>,
    /// Environment variables assigned onto the config
    pub applied: Vec<AppliedVar>,
    /// Fields that fell back to their declared default
    pub defaulted: Vec<String>,
}

impl FillReport {
    /// Whether at least one env file was loaded
    pub fn env_file_loaded(&self) -> bool {
        self.env_files.iter().any(|status| status.loaded)
    }
}

/// Populates and validates config objects from one set of [`ProcessSettings`]
pub struct ConfigFiller<'a> {
    settings: &'a ProcessSettings,
    naming: Box<dyn EnvNaming>,
    source: Box<dyn EnvSource>,
    load_env_files: bool,
}

impl<'a> ConfigFiller<'a> {
    /// Filler reading the real process environment with [`UpperSnake`] naming.
    ///
    /// With a prefix set only prefixed variables are read. Use
    /// [`with_naming`](Self::with_naming) and [`BareFallback`](crate::BareFallback)
    /// to also accept the unprefixed names.
    pub fn new(settings: &'a ProcessSettings) -> Self {
        Self {
            settings,
            naming: Box::new(UpperSnake),
            source: Box::new(ProcessEnv),
            load_env_files: true,
        }
    }

    /// Use a different environment naming policy
    pub fn with_naming(mut self, naming: impl EnvNaming + 'static) -> Self {
        self.naming = Box::new(naming);
        self
    }

    /// Read environment values from somewhere other than the process environment.
    ///
    /// Env files only ever feed the process environment, so this also turns
    /// off the env file stage.
    pub fn with_env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.source = Box::new(source);
        self.load_env_files = false;
        self
    }

    /// Skip the env file stage entirely
    pub fn without_env_files(mut self) -> Self {
        self.load_env_files = false;
        self
    }

    /// Fill `config` in place.
    ///
    /// YAML values are applied first, environment values override them, and
    /// validation sees the merged result. On error the object may be partially
    /// written.
    pub fn fill<T: Fillable>(&self, config: &mut T) -> ConfigResult<FillReport> {
        let mut report = FillReport::default();

        let file_keys = match self.settings.yaml_file() {
            Some(path) => {
                let keys = fill_from_file(config, path)?;
                debug!(path = %path.display(), keys = keys.len(), "Decoded YAML config");
                report.yaml_file = Some(path.to_path_buf());
                keys
            }
            None => {
                debug!("No YAML config path set, skipping file stage");
                HashSet::new()
            }
        };

        if self.load_env_files {
            report.env_files = load_env_files(&self.settings.env_files());
        }

        let ctx = EnvContext {
            prefix: &self.settings.env_prefix,
            naming: &*self.naming,
            source: &*self.source,
        };
        let overlay = env::overlay(config, &T::schema(), &file_keys, &ctx)?;
        report.applied = overlay.applied;
        report.defaulted = overlay.defaulted;

        validate_config(config)?;

        info!(
            yaml = report.yaml_file.is_some(),
            env_files_loaded = report.env_files.iter().filter(|s| s.loaded).count(),
            overrides = report.applied.len(),
            "Configuration filled"
        );
        Ok(report)
    }
}
