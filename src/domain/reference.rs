//! Polymorphic references accepted by the publishing payloads.
//!
//! Callers may point at a taxonomy term or a media asset by id, by free text,
//! or by an inline object describing it. The resolvers in
//! [`crate::services`] turn these into persisted records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference to a category or tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TermReference {
    /// Primary key of an existing term.
    ById(i64),
    /// Name or slug; digit-only strings are treated as ids.
    ByNameOrSlug(String),
    /// Inline description, found or created by slug within the scope.
    Inline(InlineTerm),
}

impl From<&str> for TermReference {
    fn from(value: &str) -> Self {
        Self::ByNameOrSlug(value.to_string())
    }
}

impl From<i64> for TermReference {
    fn from(value: i64) -> Self {
        Self::ById(value)
    }
}

impl From<InlineTerm> for TermReference {
    fn from(value: InlineTerm) -> Self {
        Self::Inline(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineTerm {
    pub id: Option<i64>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub hero_image_url: Option<String>,
    pub metadata: Option<Value>,
}

/// Reference to a media asset, optionally carrying gallery link attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MediaReference {
    ById(i64),
    Inline(InlineMedia),
}

impl From<i64> for MediaReference {
    fn from(value: i64) -> Self {
        Self::ById(value)
    }
}

impl From<InlineMedia> for MediaReference {
    fn from(value: InlineMedia) -> Self {
        Self::Inline(value)
    }
}

impl MediaReference {
    /// Explicit gallery position, if the caller supplied one.
    pub fn position(&self) -> Option<i32> {
        match self {
            Self::ById(_) => None,
            Self::Inline(inline) => inline.position,
        }
    }

    pub fn role(&self) -> Option<&str> {
        match self {
            Self::ById(_) => None,
            Self::Inline(inline) => inline.role.as_deref(),
        }
    }

    /// Caption for the gallery link; overrides the media's own caption when rendered.
    pub fn caption(&self) -> Option<&str> {
        match self {
            Self::ById(_) => None,
            Self::Inline(inline) => inline.caption.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineMedia {
    pub id: Option<i64>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub metadata: Option<Value>,
    pub position: Option<i32>,
    pub role: Option<String>,
}

impl InlineMedia {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}
