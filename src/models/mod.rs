//! Diesel row models and their conversions into domain types.

use serde_json::Value;

use crate::domain::types::TypeConstraintError;

#[cfg(feature = "cli")]
pub mod config;
pub mod media;
pub mod post;
pub mod taxonomy;
pub mod workspace;

/// Decodes a JSON document column; blank columns read as an empty object.
pub(crate) fn parse_document(raw: &str, field: &'static str) -> Result<Value, TypeConstraintError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("{field}: {e}")))
}
