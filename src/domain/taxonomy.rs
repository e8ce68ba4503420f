use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{Slug, TermId, TermKind, TermName, WorkspaceId};

/// Category or tag record scoped to a workspace (`None` = global marketplace).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Term {
    pub id: TermId,
    pub kind: TermKind,
    pub workspace_id: Option<WorkspaceId>,
    pub name: TermName,
    pub slug: Slug,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub hero_image_url: Option<String>,
    pub metadata: Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Term {
    /// Whether a post living in `workspace_id` may link to this term.
    pub fn visible_in(&self, workspace_id: Option<WorkspaceId>) -> bool {
        self.workspace_id.is_none() || self.workspace_id == workspace_id
    }
}

/// Data required to insert a new [`Term`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTerm {
    pub kind: TermKind,
    pub workspace_id: Option<WorkspaceId>,
    pub name: TermName,
    pub slug: Slug,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub hero_image_url: Option<String>,
    pub metadata: Value,
}

/// Decorative fields that may be merged onto an existing term.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TermCosmetics {
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub hero_image_url: Option<String>,
    pub metadata: Option<Value>,
}

impl TermCosmetics {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.accent_color.is_none()
            && self.hero_image_url.is_none()
            && self.metadata.is_none()
    }
}

/// Full replacement of a term's editable fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermChanges {
    pub name: TermName,
    pub slug: Slug,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub hero_image_url: Option<String>,
    pub metadata: Value,
}

/// A term together with the number of posts referencing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermUsage {
    pub term: Term,
    pub post_count: usize,
}
