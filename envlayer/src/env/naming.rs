//! Environment variable naming policy

/// Maps dotted field paths to environment variable names
pub trait EnvNaming: Send + Sync {
    /// Unprefixed key for a dotted field path (`server.port`)
    fn key(&self, path: &str) -> String;

    /// Names to try for `key`, in lookup order
    fn candidates(&self, prefix: &str, key: &str) -> Vec<String>;
}

fn prefixed(prefix: &str, key: &str) -> String {
    format!("{}_{}", prefix.to_uppercase(), key)
}

/// `server.bind_address` becomes `SERVER_BIND_ADDRESS`.
///
/// With a prefix `APP` only `APP_SERVER_BIND_ADDRESS` is read; the bare key
/// is ignored so unrelated host variables cannot leak into the config.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpperSnake;

impl EnvNaming for UpperSnake {
    fn key(&self, path: &str) -> String {
        path.split('.')
            .map(|segment| segment.replace('-', "_").to_uppercase())
            .collect::<Vec<_>>()
            .join("_")
    }

    fn candidates(&self, prefix: &str, key: &str) -> Vec<String> {
        if prefix.is_empty() {
            vec![key.to_string()]
        } else {
            vec![prefixed(prefix, key)]
        }
    }
}

/// Same keys as [`UpperSnake`], but falls back to the bare key when the
/// prefixed one is unset
#[derive(Debug, Clone, Copy, Default)]
pub struct BareFallback;

impl EnvNaming for BareFallback {
    fn key(&self, path: &str) -> String {
        UpperSnake.key(path)
    }

    fn candidates(&self, prefix: &str, key: &str) -> Vec<String> {
        if prefix.is_empty() {
            vec![key.to_string()]
        } else {
            vec![prefixed(prefix, key), key.to_string()]
        }
    }
}
