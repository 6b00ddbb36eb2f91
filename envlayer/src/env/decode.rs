//! Conversion of raw environment strings into typed field values

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// A type that can be assigned from an environment variable
pub trait FromEnv: Sized {
    /// Convert the raw variable value
    fn from_env(raw: &str) -> Result<Self, String>;

    /// Human-readable type name used in errors and usage output
    fn type_label() -> String;
}

macro_rules! from_str_env {
    ($label:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl FromEnv for $ty {
                fn from_env(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }

                fn type_label() -> String {
                    $label.to_string()
                }
            }
        )+
    };
}

from_str_env!("Integer" => i8, i16, i32, i64, i128, isize);
from_str_env!("Unsigned Integer" => u8, u16, u32, u64, u128, usize);
from_str_env!("Float" => f32, f64);
from_str_env!("IP Address" => IpAddr, Ipv4Addr, Ipv6Addr);
from_str_env!("Socket Address" => SocketAddr);
from_str_env!("URL" => url::Url);

impl FromEnv for String {
    fn from_env(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn type_label() -> String {
        "String".to_string()
    }
}

impl FromEnv for PathBuf {
    fn from_env(raw: &str) -> Result<Self, String> {
        Ok(PathBuf::from(raw))
    }

    fn type_label() -> String {
        "Path".to_string()
    }
}

impl FromEnv for char {
    fn from_env(raw: &str) -> Result<Self, String> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(format!("'{}' is not a single character", raw)),
        }
    }

    fn type_label() -> String {
        "Character".to_string()
    }
}

impl FromEnv for bool {
    fn from_env(raw: &str) -> Result<Self, String> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(format!("'{}' is not a boolean", raw)),
        }
    }

    fn type_label() -> String {
        "True or False".to_string()
    }
}

impl FromEnv for Duration {
    fn from_env(raw: &str) -> Result<Self, String> {
        humantime::parse_duration(raw).map_err(|e| e.to_string())
    }

    fn type_label() -> String {
        "Duration".to_string()
    }
}

impl<T: FromEnv> FromEnv for Option<T> {
    fn from_env(raw: &str) -> Result<Self, String> {
        T::from_env(raw).map(Some)
    }

    fn type_label() -> String {
        T::type_label()
    }
}

impl<T: FromEnv> FromEnv for Vec<T> {
    fn from_env(raw: &str) -> Result<Self, String> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        raw.split(',').map(T::from_env).collect()
    }

    fn type_label() -> String {
        format!("Comma-separated list of {}", T::type_label())
    }
}

impl<V: FromEnv> FromEnv for HashMap<String, V> {
    fn from_env(raw: &str) -> Result<Self, String> {
        let mut map = HashMap::new();
        if raw.trim().is_empty() {
            return Ok(map);
        }

        for pair in raw.split(',') {
            let (key, value) = pair
                .split_once(':')
                .ok_or_else(|| format!("invalid map item '{}', expected key:value", pair))?;
            map.insert(key.to_string(), V::from_env(value)?);
        }
        Ok(map)
    }

    fn type_label() -> String {
        format!("Comma-separated list of String:{} pairs", V::type_label())
    }
}
