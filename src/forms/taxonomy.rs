use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{TermName, TypeConstraintError};

/// Explicit create/update form for a category or tag.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TermForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 32))]
    pub accent_color: Option<String>,
    #[validate(url)]
    pub hero_image_url: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermFormPayload {
    pub name: TermName,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub hero_image_url: Option<String>,
    pub metadata: Value,
}

impl TermFormPayload {
    /// Text the slug is derived from.
    pub fn slug_source(&self) -> &str {
        self.slug.as_deref().unwrap_or(self.name.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TermFormError {
    #[error("Term form validation failed: {0}")]
    Validation(String),
    #[error("Term form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for TermFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for TermFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<TermForm> for TermFormPayload {
    type Error = TermFormError;

    fn try_from(value: TermForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: TermName::new(value.name)?,
            slug: value.slug.filter(|s| !s.trim().is_empty()),
            description: value.description,
            accent_color: value.accent_color,
            hero_image_url: value.hero_image_url,
            metadata: value
                .metadata
                .unwrap_or_else(|| Value::Object(Default::default())),
        })
    }
}

/// Query-string filters for listing categories or tags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermListFilters {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub workspace_id: Option<i32>,
    #[serde(default)]
    pub include_global: bool,
    pub search: Option<String>,
}
