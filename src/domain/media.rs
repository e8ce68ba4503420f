use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::types::{MediaId, MediaType, MediaUrl};

/// A stored media asset. Media is workspace-independent and shared by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Media {
    pub id: MediaId,
    pub url: MediaUrl,
    pub media_type: MediaType,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub metadata: Value,
    pub created_at: NaiveDateTime,
}

/// Information required to create a new [`Media`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMedia {
    pub url: MediaUrl,
    pub media_type: MediaType,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub metadata: Value,
}

/// One gallery slot of a post: the media plus its per-link attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryEntry {
    pub media: Media,
    pub position: i32,
    pub role: Option<String>,
    pub caption: Option<String>,
}

/// Link row to insert when a gallery is replaced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGalleryItem {
    pub media_id: MediaId,
    pub position: i32,
    pub role: Option<String>,
    pub caption: Option<String>,
}
