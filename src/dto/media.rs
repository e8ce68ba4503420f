use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::domain::media::{GalleryEntry, Media};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicMedia {
    pub id: i32,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub metadata: Value,
    pub created_at: NaiveDateTime,
}

impl From<Media> for PublicMedia {
    fn from(value: Media) -> Self {
        Self {
            id: value.id.get(),
            url: value.url.into_inner(),
            media_type: value.media_type.into_inner(),
            alt_text: value.alt_text,
            caption: value.caption,
            metadata: value.metadata,
            created_at: value.created_at,
        }
    }
}

/// Gallery item: the media plus its link attributes.
///
/// `caption` is the link caption when one was set, else the media's own.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryMedia {
    pub id: i32,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub metadata: Value,
    pub position: i32,
    pub role: Option<String>,
}

impl From<GalleryEntry> for GalleryMedia {
    fn from(value: GalleryEntry) -> Self {
        let media = value.media;
        Self {
            id: media.id.get(),
            url: media.url.into_inner(),
            media_type: media.media_type.into_inner(),
            alt_text: media.alt_text,
            caption: value.caption.or(media.caption),
            metadata: media.metadata,
            position: value.position,
            role: value.role,
        }
    }
}
