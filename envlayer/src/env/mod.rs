//! Environment overlay: assigns environment values onto registered fields

pub mod decode;
pub mod naming;
pub mod schema;
pub mod source;

pub use decode::FromEnv;
pub use naming::{BareFallback, EnvNaming, UpperSnake};
pub use schema::{Field, FieldOptions, Fillable, Schema, SchemaBuilder};
pub use source::{EnvSource, ProcessEnv};

use crate::error::ProcessError;
use std::collections::HashSet;
use tracing::debug;

/// An environment variable that was assigned to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedVar {
    pub field: String,
    pub key: String,
}

/// What the overlay stage changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    pub applied: Vec<AppliedVar>,
    /// Fields that fell back to their declared default
    pub defaulted: Vec<String>,
}

/// Lookup context for one overlay pass
pub struct EnvContext<'a> {
    pub prefix: &'a str,
    pub naming: &'a dyn EnvNaming,
    pub source: &'a dyn EnvSource,
}

/// Apply environment values to `config`, in schema order.
///
/// `file_keys` holds the dotted paths the YAML document set; those count as
/// resolved for the required and default checks.
pub fn overlay<T: 'static>(
    config: &mut T,
    schema: &Schema<T>,
    file_keys: &HashSet<String>,
    ctx: &EnvContext<'_>,
) -> Result<Overlay, ProcessError> {
    let mut result = Overlay::default();

    for field in schema.fields() {
        let key = field.env_key(ctx.naming);
        let candidates = ctx.naming.candidates(ctx.prefix, &key);
        let found = candidates
            .iter()
            .find_map(|name| ctx.source.var(name).map(|value| (name, value)));

        match found {
            Some((name, value)) => {
                let raw = value.map_err(|reason| convert_error(field, name, reason))?;
                field
                    .assign(config, &raw)
                    .map_err(|reason| convert_error(field, name, reason))?;

                debug!(field = field.path(), key = %name, "Applied environment override");
                result.applied.push(AppliedVar {
                    field: field.path().to_string(),
                    key: name.clone(),
                });
            }
            None if file_keys.contains(field.path()) => {}
            None => {
                if let Some(default) = field.default_value() {
                    field
                        .assign(config, default)
                        .map_err(|reason| convert_error(field, "default", reason))?;
                    result.defaulted.push(field.path().to_string());
                } else if field.is_required() {
                    return Err(ProcessError::Missing {
                        field: field.path().to_string(),
                        keys: candidates,
                    });
                }
            }
        }
    }

    Ok(result)
}

fn convert_error<T>(field: &Field<T>, key: &str, reason: String) -> ProcessError {
    ProcessError::Convert {
        field: field.path().to_string(),
        key: key.to_string(),
        type_label: field.type_label().to_string(),
        reason,
    }
}
