use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::taxonomy::Term as DomainTerm;
use crate::domain::types::{Slug, TermKind, TermName, TypeConstraintError};
use crate::models::parse_document;

/// Diesel model for a row of either `categories` or `tags`.
///
/// Both tables share the same column layout, so one positional `Queryable`
/// serves both; the caller supplies the [`TermKind`] when converting.
#[derive(Debug, Clone, Queryable)]
pub struct Term {
    pub id: i32,
    pub workspace_id: Option<i32>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub accent_color: Option<String>,
    pub hero_image_url: Option<String>,
    pub metadata: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Term {
    pub fn into_domain(self, kind: TermKind) -> Result<DomainTerm, TypeConstraintError> {
        Ok(DomainTerm {
            id: self.id.try_into()?,
            kind,
            workspace_id: self.workspace_id.map(TryInto::try_into).transpose()?,
            name: TermName::new(self.name)?,
            slug: Slug::new(self.slug)?,
            description: self.description,
            accent_color: self.accent_color,
            hero_image_url: self.hero_image_url,
            metadata: parse_document(&self.metadata, "term metadata")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
