use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::domain::taxonomy::{Term, TermUsage};
use crate::pagination::PageInfo;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicTerm {
    pub id: i32,
    pub workspace_id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub hero_image_url: Option<String>,
    pub metadata: Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Present on administrative listings only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<usize>,
}

impl From<Term> for PublicTerm {
    fn from(value: Term) -> Self {
        Self {
            id: value.id.get(),
            workspace_id: value.workspace_id.map(|id| id.get()),
            name: value.name.into_inner(),
            slug: value.slug.into_inner(),
            description: value.description,
            accent_color: value.accent_color,
            hero_image_url: value.hero_image_url,
            metadata: value.metadata,
            created_at: value.created_at,
            updated_at: value.updated_at,
            post_count: None,
        }
    }
}

impl From<TermUsage> for PublicTerm {
    fn from(value: TermUsage) -> Self {
        Self {
            post_count: Some(value.post_count),
            ..Self::from(value.term)
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TermPage {
    pub results: Vec<PublicTerm>,
    pub pagination: PageInfo,
}
