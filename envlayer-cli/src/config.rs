//! Application configuration loaded at startup

use envlayer::{FieldOptions, Fillable, Schema};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    #[validate(custom(function = "envlayer::validation::not_blank"))]
    pub host: String,

    /// Bind port
    #[validate(custom(function = "envlayer::validation::port"))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    /// Enable debug mode
    pub debug: bool,
}

impl Fillable for AppConfig {
    fn schema() -> Schema<Self> {
        Schema::<Self>::builder()
            .field_with(
                "server.host",
                |c: &mut AppConfig| &mut c.server.host,
                FieldOptions::new().describe("Address the server binds to"),
            )
            .field_with(
                "server.port",
                |c: &mut AppConfig| &mut c.server.port,
                FieldOptions::new().describe("Port the server listens on"),
            )
            .field_with(
                "debug",
                |c: &mut AppConfig| &mut c.debug,
                FieldOptions::new().describe("Enable debug mode"),
            )
            .build()
    }
}
