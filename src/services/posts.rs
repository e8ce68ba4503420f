//! Transactional create/update of posts.
//!
//! One upsert resolves the category, tags, gallery and cover image, allocates
//! the slug, writes the post row and reconciles its associations inside a
//! single unit of work. Any failure rolls every write back, including terms
//! and media created along the way.

use std::collections::HashSet;

use chrono::{NaiveDateTime, Utc};
use serde_json::Value;

use crate::domain::media::NewGalleryItem;
use crate::domain::post::{NewPost, Post, PostAggregate};
use crate::domain::types::{
    PostId, PostStatus, ReadingTime, SlugTarget, TermId, TermKind, UserId, WorkspaceId,
};
use crate::dto::posts::PublicPost;
use crate::forms::posts::{PostDraft, PostPayload};
use crate::repository::{PostStore, PublishingStore, RepositoryError, TermStore, UnitOfWork};
use crate::services::media::{ResolvedMedia, resolve_media, resolve_media_reference};
use crate::services::slug::allocate_slug;
use crate::services::taxonomy::{resolve_term, resolve_terms};

use super::{ServiceError, ServiceResult};

const WORDS_PER_MINUTE: usize = 200;

/// Who is writing and which post, if any, is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertContext {
    pub actor_id: UserId,
    pub existing_post: Option<PostId>,
    /// Overrides the edited post's workspace when set.
    pub workspace_id: Option<WorkspaceId>,
}

impl UpsertContext {
    pub fn create(actor_id: UserId, workspace_id: Option<WorkspaceId>) -> Self {
        Self {
            actor_id,
            existing_post: None,
            workspace_id,
        }
    }

    pub fn edit(actor_id: UserId, post_id: PostId) -> Self {
        Self {
            actor_id,
            existing_post: Some(post_id),
            workspace_id: None,
        }
    }
}

/// `ceil(words / 200)`, never below one minute.
pub fn estimate_reading_time(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as i32
}

/// Gallery link rows; positions default to the array index and must be unique.
fn gallery_items(resolved: &[ResolvedMedia]) -> ServiceResult<Vec<NewGalleryItem>> {
    let mut seen = HashSet::new();

    resolved
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let position = item.payload.position().unwrap_or(index as i32);
            if !seen.insert(position) {
                return Err(ServiceError::validation(format!(
                    "duplicate gallery position {position}"
                )));
            }
            Ok(NewGalleryItem {
                media_id: item.record.id,
                position,
                role: item.payload.role().map(str::to_string),
                caption: item.payload.caption().map(str::to_string),
            })
        })
        .collect()
}

fn effective_published_at(
    draft: &PostDraft,
    status: PostStatus,
    existing: Option<&Post>,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let stored = existing.and_then(|post| post.published_at);
    match draft.published_at {
        Some(explicit) => Some(explicit),
        None if status == PostStatus::Published => stored.or(Some(now)),
        None => stored,
    }
}

/// Category kept from the stored post when the payload names none.
///
/// A post moved to another workspace cannot keep a category scoped to the old one.
fn inherited_category(
    store: &mut dyn PublishingStore,
    existing: Option<&Post>,
    workspace_id: Option<WorkspaceId>,
) -> ServiceResult<Option<TermId>> {
    let Some(post) = existing else {
        return Ok(None);
    };
    let Some(category_id) = post.category_id else {
        return Ok(None);
    };
    if post.workspace_id == workspace_id {
        return Ok(Some(category_id));
    }

    match store.find_term_by_id(TermKind::Category, category_id)? {
        Some(term) if !term.visible_in(workspace_id) => Err(ServiceError::validation(format!(
            "category `{}` is not available in the post's new workspace; supply a category",
            term.slug
        ))),
        _ => Ok(Some(category_id)),
    }
}

fn write_row(
    store: &mut dyn PublishingStore,
    existing: Option<&Post>,
    row: &NewPost,
) -> Result<Post, RepositoryError> {
    match existing {
        Some(post) => store.update_post(post.id, row),
        None => store.insert_post(row),
    }
}

fn write_post(
    store: &mut dyn PublishingStore,
    draft: &PostDraft,
    ctx: &UpsertContext,
) -> ServiceResult<PostAggregate> {
    let existing = match ctx.existing_post {
        Some(id) => Some(
            store
                .find_post_by_id(id)?
                .ok_or_else(|| ServiceError::not_found(format!("post #{id}")))?,
        ),
        None => None,
    };
    let existing = existing.as_ref();
    let workspace_id = ctx
        .workspace_id
        .or_else(|| existing.and_then(|post| post.workspace_id));

    let category = resolve_term(
        store,
        TermKind::Category,
        draft.category.as_ref(),
        workspace_id,
        true,
    )?;
    let tags = resolve_terms(store, TermKind::Tag, &draft.tags, workspace_id, true)?;
    let gallery = resolve_media(store, &draft.media)?;
    let category_id = match category {
        Some(term) => Some(term.id),
        None => inherited_category(store, existing, workspace_id)?,
    };
    let cover_image = draft
        .cover_image
        .as_ref()
        .map(|reference| resolve_media_reference(store, reference))
        .transpose()?;
    let gallery = gallery_items(&gallery)?;

    let exclude_id = existing.map(|post| post.id.get());
    let slug_source = draft.slug.as_deref().unwrap_or(draft.title.as_str());
    let slug = allocate_slug(store, SlugTarget::Post, slug_source, workspace_id, exclude_id)?;

    let status = draft
        .status
        .or(existing.map(|post| post.status))
        .unwrap_or(PostStatus::Draft);
    let now = Utc::now().naive_utc();

    let reading_time_minutes = match draft.reading_time_minutes {
        Some(minutes) => minutes,
        None => ReadingTime::new(estimate_reading_time(draft.content.as_str()))?,
    };

    let mut row = NewPost {
        workspace_id,
        author_id: existing.map_or(ctx.actor_id, |post| post.author_id),
        category_id,
        cover_image_id: cover_image
            .map(|media| media.id)
            .or(existing.and_then(|post| post.cover_image_id)),
        title: draft.title.clone(),
        slug,
        excerpt: draft
            .excerpt
            .clone()
            .or_else(|| existing.and_then(|post| post.excerpt.clone())),
        content: draft.content.clone(),
        status,
        published_at: effective_published_at(draft, status, existing, now),
        reading_time_minutes,
        featured: draft
            .featured
            .or(existing.map(|post| post.featured))
            .unwrap_or(false),
        meta: draft
            .meta
            .clone()
            .or_else(|| existing.map(|post| post.meta.clone()))
            .unwrap_or_else(|| Value::Object(Default::default())),
    };

    let post = match write_row(store, existing, &row) {
        Ok(post) => post,
        Err(RepositoryError::Conflict(message)) => {
            log::warn!("Slug `{}` lost a race ({message}); reallocating once", row.slug);
            row.slug =
                allocate_slug(store, SlugTarget::Post, slug_source, workspace_id, exclude_id)?;
            write_row(store, existing, &row)?
        }
        Err(e) => return Err(e.into()),
    };

    let tag_ids: Vec<_> = tags.iter().map(|tag| tag.id).collect();
    store.replace_post_tags(post.id, &tag_ids)?;

    if !gallery.is_empty() {
        store.replace_post_gallery(post.id, &gallery)?;
    }

    store.load_post_aggregate(post.id)?.ok_or_else(|| {
        log::error!("Post #{} vanished inside its own transaction", post.id);
        ServiceError::Internal
    })
}

/// Creates a post, or updates `ctx.existing_post`, and returns its public projection.
pub fn upsert_post<R>(repo: &R, payload: PostPayload, ctx: &UpsertContext) -> ServiceResult<PublicPost>
where
    R: UnitOfWork,
{
    let draft = PostDraft::try_from(payload)?;

    let aggregate = repo.transaction(|store| write_post(store, &draft, ctx))?;

    log::info!(
        "Saved post #{} `{}` ({}) by user {}",
        aggregate.post.id,
        aggregate.post.slug,
        aggregate.post.status,
        ctx.actor_id
    );
    Ok(PublicPost::from(aggregate))
}

/// Hard-deletes a post with its tag and gallery links.
pub fn delete_post<R>(repo: &R, id: PostId) -> ServiceResult<()>
where
    R: UnitOfWork,
{
    repo.transaction(|store| {
        if store.find_post_by_id(id)?.is_none() {
            return Err(ServiceError::not_found(format!("post #{id}")));
        }
        store.delete_post(id)?;
        Ok(())
    })?;

    log::info!("Deleted post #{id}");
    Ok(())
}
