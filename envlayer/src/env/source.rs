//! Where environment values are read from

use std::collections::HashMap;
use std::env::VarError;

/// Lookup of environment values by name
pub trait EnvSource: Send + Sync {
    /// `None` if unset, `Some(Err(_))` if set but unreadable
    fn var(&self, key: &str) -> Option<Result<String, String>>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<Result<String, String>> {
        match std::env::var(key) {
            Ok(value) => Some(Ok(value)),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => Some(Err("value is not valid unicode".to_string())),
        }
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<Result<String, String>> {
        self.get(key).cloned().map(Ok)
    }
}
