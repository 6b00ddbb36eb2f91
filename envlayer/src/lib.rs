//! Layered configuration filling
//!
//! Populates an application config struct from, in increasing precedence:
//! its current values, an optional YAML file, and environment variables
//! (optionally seeded from `.env` files). The merged result is then validated.
//!
//! ```no_run
//! use envlayer::{FieldOptions, Fillable, Schema};
//! use serde::{Deserialize, Serialize};
//! use validator::Validate;
//!
//! #[derive(Debug, Default, Serialize, Deserialize, Validate)]
//! #[serde(default)]
//! struct AppConfig {
//!     #[validate(range(min = 1))]
//!     port: u16,
//!     debug: bool,
//! }
//!
//! impl Fillable for AppConfig {
//!     fn schema() -> Schema<Self> {
//!         Schema::<Self>::builder()
//!             .field_with("port", |c: &mut AppConfig| &mut c.port, FieldOptions::new().required())
//!             .field("debug", |c: &mut AppConfig| &mut c.debug)
//!             .build()
//!     }
//! }
//!
//! envlayer::initialize();
//! let mut config = AppConfig::default();
//! envlayer::fill(&mut config).expect("invalid configuration");
//! ```

pub mod dotenv;
pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;
pub mod yaml;

// Re-export main types
pub use dotenv::EnvFileStatus;
pub use env::{
    AppliedVar, BareFallback, EnvNaming, EnvSource, FieldOptions, Fillable, FromEnv, ProcessEnv,
    Schema, SchemaBuilder, UpperSnake,
};
pub use error::{ConfigError, ConfigResult, ErrorKind, ProcessError, ValidationReport, Violation};
pub use loader::{ConfigFiller, FillReport};
pub use settings::{install, settings, ProcessSettings};

#[cfg(feature = "cli")]
pub use settings::{initialize, CliArgs};

/// Fill `config` using the process-wide settings.
///
/// Without a prior [`initialize`] or [`install`] this behaves as if all three
/// settings were empty.
pub fn fill<T: Fillable>(config: &mut T) -> ConfigResult<FillReport> {
    match settings::settings() {
        Some(installed) => ConfigFiller::new(installed).fill(config),
        None => ConfigFiller::new(&ProcessSettings::default()).fill(config),
    }
}
