use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::reference::{MediaReference, TermReference};
use crate::domain::types::{PostContent, PostStatus, PostTitle, ReadingTime, TypeConstraintError};

/// Raw create/edit payload for a post.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    #[validate(required(message = "title is required"), length(min = 1))]
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[validate(required(message = "content is required"), length(min = 1))]
    pub content: Option<String>,
    pub status: Option<String>,
    pub published_at: Option<String>,
    #[validate(range(min = 0))]
    pub reading_time_minutes: Option<i32>,
    pub featured: Option<bool>,
    pub category: Option<TermReference>,
    pub tags: Option<Vec<TermReference>>,
    pub media: Option<Vec<MediaReference>>,
    pub cover_image: Option<MediaReference>,
    pub meta: Option<Value>,
}

impl PostPayload {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Post payload after validation, ready for the upsert orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: PostTitle,
    /// Caller-supplied slug source; blank values are dropped.
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: PostContent,
    pub status: Option<PostStatus>,
    pub published_at: Option<NaiveDateTime>,
    pub reading_time_minutes: Option<ReadingTime>,
    pub featured: Option<bool>,
    pub category: Option<TermReference>,
    /// Absent and empty both mean "no tags".
    pub tags: Vec<TermReference>,
    /// Empty leaves the stored gallery untouched.
    pub media: Vec<MediaReference>,
    pub cover_image: Option<MediaReference>,
    pub meta: Option<Value>,
}

#[derive(Debug, Error)]
pub enum PostFormError {
    #[error("Post payload validation failed: {0}")]
    Validation(String),
    #[error("Post payload contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for PostFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD`.
///
/// Offsets are normalized to UTC.
pub fn parse_published_at(raw: &str) -> Result<NaiveDateTime, TypeConstraintError> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TypeConstraintError::InvalidValue(format!("publishedAt: `{raw}`")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<PostPayload> for PostDraft {
    type Error = PostFormError;

    fn try_from(value: PostPayload) -> Result<Self, Self::Error> {
        value.validate()?;

        let status = non_blank(value.status)
            .map(PostStatus::try_from)
            .transpose()?;
        let published_at = non_blank(value.published_at)
            .map(|raw| parse_published_at(&raw))
            .transpose()?;
        let reading_time_minutes = value
            .reading_time_minutes
            .map(ReadingTime::new)
            .transpose()?;

        Ok(Self {
            title: PostTitle::new(value.title.unwrap_or_default())?,
            slug: non_blank(value.slug),
            excerpt: value.excerpt,
            content: PostContent::new(value.content.unwrap_or_default())?,
            status,
            published_at,
            reading_time_minutes,
            featured: value.featured,
            category: value.category,
            tags: value.tags.unwrap_or_default(),
            media: value.media.unwrap_or_default(),
            cover_image: value.cover_image,
            meta: value.meta,
        })
    }
}

/// Query-string filters for listing and fetching posts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListFilters {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Honored only together with `include_unpublished`.
    pub status: Option<String>,
    #[serde(default)]
    pub include_unpublished: bool,
    pub workspace_id: Option<i32>,
    /// With a workspace id, also return global rows.
    #[serde(default)]
    pub include_global: bool,
    pub search: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Tag slug.
    pub tag: Option<String>,
}
