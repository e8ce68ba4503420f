use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::media::{GalleryEntry, Media};
use crate::domain::taxonomy::Term;
use crate::domain::types::{
    MediaId, PostContent, PostId, PostStatus, PostTitle, ReadingTime, Slug, TermId, UserId,
    WorkspaceId,
};
use crate::domain::workspace::{Author, Workspace};

/// A blog post, either global (`workspace_id = None`) or owned by a workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub workspace_id: Option<WorkspaceId>,
    pub author_id: UserId,
    pub category_id: Option<TermId>,
    pub cover_image_id: Option<MediaId>,
    pub title: PostTitle,
    pub slug: Slug,
    pub excerpt: Option<String>,
    pub content: PostContent,
    pub status: PostStatus,
    /// Set the first time the post is saved as published.
    pub published_at: Option<NaiveDateTime>,
    pub reading_time_minutes: ReadingTime,
    pub featured: bool,
    pub meta: Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field set written on insert and on update of a [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    pub workspace_id: Option<WorkspaceId>,
    pub author_id: UserId,
    pub category_id: Option<TermId>,
    pub cover_image_id: Option<MediaId>,
    pub title: PostTitle,
    pub slug: Slug,
    pub excerpt: Option<String>,
    pub content: PostContent,
    pub status: PostStatus,
    pub published_at: Option<NaiveDateTime>,
    pub reading_time_minutes: ReadingTime,
    pub featured: bool,
    pub meta: Value,
}

/// A post with every association it renders with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostAggregate {
    pub post: Post,
    pub category: Option<Term>,
    /// Tags in the order the caller supplied them.
    pub tags: Vec<Term>,
    pub cover_image: Option<Media>,
    /// Gallery sorted by position.
    pub gallery: Vec<GalleryEntry>,
    pub workspace: Option<Workspace>,
    pub author: Option<Author>,
}
