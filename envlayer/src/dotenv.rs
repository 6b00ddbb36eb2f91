//! Env file stage: best-effort loading of `.env` files into the process environment
//!
//! Failures never abort a fill. They are reported through [`EnvFileStatus`]
//! so callers can still tell a missing file from a loaded one.

use crate::settings::DEFAULT_ENV_FILE;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome of loading one env file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFileStatus {
    pub path: PathBuf,
    pub loaded: bool,
    /// Why loading failed, if it did
    pub error: Option<String>,
}

/// Load each listed file, or [`DEFAULT_ENV_FILE`] when the list is empty.
///
/// Variables already present in the process environment are kept.
pub fn load_env_files(files: &[PathBuf]) -> Vec<EnvFileStatus> {
    if files.is_empty() {
        return vec![load_env_file(Path::new(DEFAULT_ENV_FILE))];
    }
    files.iter().map(|path| load_env_file(path)).collect()
}

fn load_env_file(path: &Path) -> EnvFileStatus {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Loaded env file");
            EnvFileStatus {
                path: path.to_path_buf(),
                loaded: true,
                error: None,
            }
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Env file not loaded");
            EnvFileStatus {
                path: path.to_path_buf(),
                loaded: false,
                error: Some(e.to_string()),
            }
        }
    }
}
