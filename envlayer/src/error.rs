//! Configuration error types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that abort a fill
#[derive(Error, Debug)]
pub enum ConfigError {
    /// YAML file could not be opened or read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML content is malformed or does not match the config shape
    #[error("Failed to decode config file {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    /// Environment overlay failed
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Merged configuration violates declared rules
    #[error(transparent)]
    Validation(#[from] ValidationReport),
}

/// Coarse error class, for callers that only care which stage failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Decode,
    Process,
    Validation,
}

impl ConfigError {
    /// Which stage produced this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Io { .. } => ErrorKind::Io,
            ConfigError::Decode { .. } => ErrorKind::Decode,
            ConfigError::Process(_) => ErrorKind::Process,
            ConfigError::Validation(_) => ErrorKind::Validation,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        ConfigError::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Environment overlay errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// A value was found but could not be converted to the field's type
    #[error("Invalid value for {field} from {key}: expected {type_label}, {reason}")]
    Convert {
        field: String,
        key: String,
        type_label: String,
        reason: String,
    },

    /// A required field got no value from the file or the environment
    #[error("Required field {field} is not set (looked up {})", .keys.join(", "))]
    Missing { field: String, keys: Vec<String> },
}

impl ProcessError {
    /// Dotted path of the field involved
    pub fn field(&self) -> &str {
        match self {
            ProcessError::Convert { field, .. } | ProcessError::Missing { field, .. } => field,
        }
    }
}

/// A single violated validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted field path, with list indices as `[n]`
    pub field: String,
    /// Rule code reported by the validator (`range`, `length`, ...)
    pub rule: String,
    pub message: Option<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} ({}): {}", self.field, self.rule, message),
            None => write!(f, "{} ({})", self.field, self.rule),
        }
    }
}

/// All rules violated by a merged configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Whether any violation concerns the given dotted field path
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Distinct field paths involved, in report order
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for violation in &self.violations {
            if !fields.contains(&violation.field.as_str()) {
                fields.push(&violation.field);
            }
        }
        fields
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid configuration: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}
