//! YAML file stage: decode a document over the current config value

use crate::error::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Decode the YAML file at `path` into `config`.
///
/// Keys missing from the document keep their current values. Returns the
/// dotted paths of every key the document contains.
pub fn fill_from_file<T>(config: &mut T, path: &Path) -> ConfigResult<HashSet<String>>
where
    T: Serialize + DeserializeOwned,
{
    let document = read_document(path)?;
    let keys = key_paths(&document);

    let current = serde_yaml::to_value(&*config).map_err(|e| ConfigError::decode(path, e))?;
    let merged = merge(current, document);
    *config = serde_yaml::from_value(merged).map_err(|e| ConfigError::decode(path, e))?;

    Ok(keys)
}

fn read_document(path: &Path) -> ConfigResult<Value> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // The handle is dropped when the reader goes out of scope, on every path
    let document: Value = serde_yaml::from_reader(BufReader::new(file))
        .map_err(|e| ConfigError::decode(path, e))?;

    if document.is_null() {
        return Err(ConfigError::decode(path, "file contains no YAML document"));
    }
    Ok(document)
}

/// Deep-merge `overlay` onto `base`; mappings merge key by key, anything else replaces
fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Mapping(base)
        }
        (_, overlay) => overlay,
    }
}

fn key_paths(document: &Value) -> HashSet<String> {
    let mut keys = HashSet::new();
    collect_keys(document, "", &mut keys);
    keys
}

fn collect_keys(value: &Value, prefix: &str, keys: &mut HashSet<String>) {
    let Value::Mapping(map) = value else {
        return;
    };

    for (key, child) in map {
        let name = match key {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{}.{}", prefix, name)
        };
        collect_keys(child, &path, keys);
        keys.insert(path);
    }
}
