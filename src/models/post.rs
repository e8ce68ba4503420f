use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{NewPost as DomainNewPost, Post as DomainPost};
use crate::domain::types::{
    PostContent, PostStatus, PostTitle, ReadingTime, Slug, TypeConstraintError,
};
use crate::models::parse_document;

/// Diesel model representing the `posts` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub workspace_id: Option<i32>,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub cover_image_id: Option<i32>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub status: String,
    pub published_at: Option<NaiveDateTime>,
    pub reading_time_minutes: i32,
    pub featured: bool,
    pub meta: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Post`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub workspace_id: Option<i32>,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub cover_image_id: Option<i32>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub status: String,
    pub published_at: Option<NaiveDateTime>,
    pub reading_time_minutes: i32,
    pub featured: bool,
    pub meta: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field-by-field overwrite of an existing post; `created_at` is never touched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(treat_none_as_null = true)]
pub struct PostChanges {
    pub workspace_id: Option<i32>,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub cover_image_id: Option<i32>,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub status: String,
    pub published_at: Option<NaiveDateTime>,
    pub reading_time_minutes: i32,
    pub featured: bool,
    pub meta: String,
    pub updated_at: NaiveDateTime,
}

/// Insertable row of the `post_tags` join table.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::post_tags)]
pub struct NewPostTag {
    pub post_id: i32,
    pub tag_id: i32,
    pub position: i32,
}

impl TryFrom<Post> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from(post: Post) -> Result<Self, Self::Error> {
        Ok(Self {
            id: post.id.try_into()?,
            workspace_id: post.workspace_id.map(TryInto::try_into).transpose()?,
            author_id: post.author_id.try_into()?,
            category_id: post.category_id.map(TryInto::try_into).transpose()?,
            cover_image_id: post.cover_image_id.map(TryInto::try_into).transpose()?,
            title: PostTitle::new(post.title)?,
            slug: Slug::new(post.slug)?,
            excerpt: post.excerpt,
            content: PostContent::new(post.content)?,
            status: PostStatus::try_from(post.status)?,
            published_at: post.published_at,
            reading_time_minutes: ReadingTime::new(post.reading_time_minutes)?,
            featured: post.featured,
            meta: parse_document(&post.meta, "post meta")?,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
    }
}

impl NewPost {
    pub fn from_domain(post: &DomainNewPost, now: NaiveDateTime) -> Self {
        Self {
            workspace_id: post.workspace_id.map(|id| id.get()),
            author_id: post.author_id.get(),
            category_id: post.category_id.map(|id| id.get()),
            cover_image_id: post.cover_image_id.map(|id| id.get()),
            title: post.title.as_str().to_string(),
            slug: post.slug.as_str().to_string(),
            excerpt: post.excerpt.clone(),
            content: post.content.as_str().to_string(),
            status: post.status.as_str().to_string(),
            published_at: post.published_at,
            reading_time_minutes: post.reading_time_minutes.get(),
            featured: post.featured,
            meta: post.meta.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl PostChanges {
    pub fn from_domain(post: &DomainNewPost, now: NaiveDateTime) -> Self {
        Self {
            workspace_id: post.workspace_id.map(|id| id.get()),
            author_id: post.author_id.get(),
            category_id: post.category_id.map(|id| id.get()),
            cover_image_id: post.cover_image_id.map(|id| id.get()),
            title: post.title.as_str().to_string(),
            slug: post.slug.as_str().to_string(),
            excerpt: post.excerpt.clone(),
            content: post.content.as_str().to_string(),
            status: post.status.as_str().to_string(),
            published_at: post.published_at,
            reading_time_minutes: post.reading_time_minutes.get(),
            featured: post.featured,
            meta: post.meta.to_string(),
            updated_at: now,
        }
    }
}
