use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::media::{Media as DomainMedia, NewMedia as DomainNewMedia};
use crate::domain::types::{MediaType, MediaUrl, TypeConstraintError};
use crate::models::parse_document;

/// Diesel model representing the `media` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::media)]
pub struct Media {
    pub id: i32,
    pub url: String,
    pub media_type: String,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub metadata: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Media`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::media)]
pub struct NewMedia {
    pub url: String,
    pub media_type: String,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub metadata: String,
    pub created_at: NaiveDateTime,
}

/// Diesel model representing the `post_media` gallery link table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::post_media)]
pub struct PostMedia {
    pub id: i32,
    pub post_id: i32,
    pub media_id: i32,
    pub position: i32,
    pub role: Option<String>,
    pub caption: Option<String>,
}

/// Insertable form of [`PostMedia`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::post_media)]
pub struct NewPostMedia {
    pub post_id: i32,
    pub media_id: i32,
    pub position: i32,
    pub role: Option<String>,
    pub caption: Option<String>,
}

impl TryFrom<Media> for DomainMedia {
    type Error = TypeConstraintError;

    fn try_from(media: Media) -> Result<Self, Self::Error> {
        Ok(Self {
            id: media.id.try_into()?,
            url: MediaUrl::new(media.url)?,
            media_type: MediaType::new(media.media_type)?,
            alt_text: media.alt_text,
            caption: media.caption,
            metadata: parse_document(&media.metadata, "media metadata")?,
            created_at: media.created_at,
        })
    }
}

impl NewMedia {
    pub fn from_domain(media: &DomainNewMedia, created_at: NaiveDateTime) -> Self {
        Self {
            url: media.url.as_str().to_string(),
            media_type: media.media_type.as_str().to_string(),
            alt_text: media.alt_text.clone(),
            caption: media.caption.clone(),
            metadata: media.metadata.to_string(),
            created_at,
        }
    }
}
