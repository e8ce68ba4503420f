use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::domain::post::PostAggregate;
use crate::domain::workspace::{Author, Workspace};
use crate::dto::media::{GalleryMedia, PublicMedia};
use crate::dto::taxonomy::PublicTerm;
use crate::pagination::PageInfo;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WorkspaceRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<Workspace> for WorkspaceRef {
    fn from(value: Workspace) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            slug: value.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthorRef {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<Author> for AuthorRef {
    fn from(value: Author) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            email: value.email,
        }
    }
}

/// Association-populated read view of a post.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicPost {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub status: String,
    pub published_at: Option<NaiveDateTime>,
    pub reading_time_minutes: i32,
    pub featured: bool,
    pub meta: Value,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub cover_image_id: Option<i32>,
    pub workspace_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub category: Option<PublicTerm>,
    pub tags: Vec<PublicTerm>,
    pub cover_image: Option<PublicMedia>,
    pub media: Vec<GalleryMedia>,
    pub workspace: Option<WorkspaceRef>,
    pub author: Option<AuthorRef>,
}

impl From<PostAggregate> for PublicPost {
    fn from(value: PostAggregate) -> Self {
        let post = value.post;
        Self {
            id: post.id.get(),
            title: post.title.into_inner(),
            slug: post.slug.into_inner(),
            excerpt: post.excerpt,
            content: post.content.into_inner(),
            status: post.status.as_str().to_string(),
            published_at: post.published_at,
            reading_time_minutes: post.reading_time_minutes.get(),
            featured: post.featured,
            meta: post.meta,
            author_id: post.author_id.get(),
            category_id: post.category_id.map(|id| id.get()),
            cover_image_id: post.cover_image_id.map(|id| id.get()),
            workspace_id: post.workspace_id.map(|id| id.get()),
            created_at: post.created_at,
            updated_at: post.updated_at,
            category: value.category.map(PublicTerm::from),
            tags: value.tags.into_iter().map(PublicTerm::from).collect(),
            cover_image: value.cover_image.map(PublicMedia::from),
            media: value.gallery.into_iter().map(GalleryMedia::from).collect(),
            workspace: value.workspace.map(WorkspaceRef::from),
            author: value.author.map(AuthorRef::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostPage {
    pub results: Vec<PublicPost>,
    pub pagination: PageInfo,
}
