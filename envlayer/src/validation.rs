//! Validation stage and reusable rule functions

use crate::error::{ValidationReport, Violation};
use std::borrow::Cow;
use tracing::warn;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Run the declared rules of `config`, flattening violations into dotted paths
pub fn validate_config<T: Validate>(config: &T) -> Result<(), ValidationReport> {
    match config.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(to_report(&errors)),
    }
}

/// Flatten nested validator errors into a [`ValidationReport`]
pub fn to_report(errors: &ValidationErrors) -> ValidationReport {
    let mut violations = Vec::new();
    flatten(errors, "", &mut violations);
    ValidationReport { violations }
}

fn flatten(errors: &ValidationErrors, prefix: &str, out: &mut Vec<Violation>) {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by_key(|(field, _)| field.to_string());

    for (field, kind) in entries {
        let field = field.to_string();
        // Struct-level rules are reported under the struct itself
        let path = match (prefix.is_empty(), field == "__all__") {
            (_, true) => prefix.to_string(),
            (true, false) => field,
            (false, false) => format!("{}.{}", prefix, field),
        };

        match kind {
            ValidationErrorsKind::Field(errors) => {
                for error in errors {
                    out.push(Violation {
                        field: path.clone(),
                        rule: error.code.to_string(),
                        message: error.message.as_ref().map(|m| m.to_string()),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// Rule: string must contain something other than whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("not_blank", "cannot be empty"));
    }
    Ok(())
}

/// Rule: usable TCP/UDP port
pub fn port(value: u16) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(rule_error("port", "port cannot be 0"));
    }

    // Port 1-1023 are typically reserved for system services
    if value <= 1023 {
        warn!("Port {} is in the reserved range (1-1023)", value);
    }

    Ok(())
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
