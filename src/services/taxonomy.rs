//! Category and tag resolution plus their administrative operations.
//!
//! Both taxonomies share one shape, so every function takes a [`TermKind`]
//! instead of being duplicated per table.

use serde_json::Value;

use crate::domain::reference::{InlineTerm, TermReference};
use crate::domain::taxonomy::{NewTerm, Term, TermChanges, TermCosmetics};
use crate::domain::types::{SlugTarget, TermId, TermKind, TermName, WorkspaceId};
use crate::dto::taxonomy::{PublicTerm, TermPage};
use crate::forms::taxonomy::{TermFormPayload, TermListFilters};
use crate::pagination::{PageInfo, Pagination};
use crate::repository::{
    RepositoryError, SlugProbe, TermListQuery, TermReader, TermStore, UnitOfWork, WorkspaceFilter,
};
use crate::services::slug::{allocate_slug, slugify};

use super::{ServiceError, ServiceResult};

fn not_found(kind: TermKind, what: impl std::fmt::Display) -> ServiceError {
    ServiceError::NotFound(format!("{kind} {what}"))
}

fn empty_document() -> Value {
    Value::Object(Default::default())
}

/// Primary-key lookup that treats terms of another workspace as missing.
fn find_visible_by_id<S>(
    store: &mut S,
    kind: TermKind,
    raw_id: i64,
    workspace_id: Option<WorkspaceId>,
) -> ServiceResult<Term>
where
    S: TermStore + ?Sized,
{
    let id = i32::try_from(raw_id)
        .ok()
        .and_then(|id| TermId::new(id).ok())
        .ok_or_else(|| not_found(kind, format!("#{raw_id}")))?;

    match store.find_term_by_id(kind, id)? {
        Some(term) if term.visible_in(workspace_id) => Ok(term),
        Some(term) => {
            log::debug!(
                "{kind} #{id} belongs to workspace {:?}, not visible from {:?}",
                term.workspace_id,
                workspace_id
            );
            Err(not_found(kind, format!("#{id}")))
        }
        None => Err(not_found(kind, format!("#{id}"))),
    }
}

/// Inserts `new_term`; on a lost create race returns the winning row instead.
///
/// The flag is `true` when this call created the row.
fn insert_or_reread<S>(store: &mut S, new_term: NewTerm) -> ServiceResult<(Term, bool)>
where
    S: TermStore + ?Sized,
{
    match store.insert_term(&new_term) {
        Ok(term) => {
            log::info!(
                "Created {} `{}` in workspace {:?}",
                term.kind,
                term.slug,
                term.workspace_id
            );
            Ok((term, true))
        }
        Err(RepositoryError::Conflict(message)) => {
            log::warn!("Concurrent {} create for `{}`: {message}", new_term.kind, new_term.slug);
            let winner = store
                .find_term_by_slug(new_term.kind, new_term.slug.as_str(), new_term.workspace_id)?
                .ok_or(ServiceError::Conflict(message))?;
            Ok((winner, false))
        }
        Err(e) => Err(e.into()),
    }
}

fn resolve_text<S>(
    store: &mut S,
    kind: TermKind,
    text: &str,
    workspace_id: Option<WorkspaceId>,
    allow_create: bool,
) -> ServiceResult<Term>
where
    S: SlugProbe + TermStore + ?Sized,
{
    let slug = slugify(text);

    if !slug.is_empty() {
        if let Some(term) = store.find_term_by_slug(kind, &slug, workspace_id)? {
            return Ok(term);
        }
        if workspace_id.is_some() {
            if let Some(term) = store.find_term_by_slug(kind, &slug, None)? {
                log::debug!("{kind} `{slug}` resolved to the global term");
                return Ok(term);
            }
        }
    }

    if !allow_create {
        return Err(not_found(kind, format!("`{text}`")));
    }

    let slug = allocate_slug(store, SlugTarget::Term(kind), text, workspace_id, None)?;
    let (term, _) = insert_or_reread(
        store,
        NewTerm {
            kind,
            workspace_id,
            name: TermName::new(text)?,
            slug,
            description: None,
            accent_color: None,
            hero_image_url: None,
            metadata: empty_document(),
        },
    )?;
    Ok(term)
}

fn resolve_inline<S>(
    store: &mut S,
    kind: TermKind,
    inline: &InlineTerm,
    workspace_id: Option<WorkspaceId>,
    allow_create: bool,
) -> ServiceResult<Term>
where
    S: SlugProbe + TermStore + ?Sized,
{
    let name = inline
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ServiceError::validation(format!("inline {kind} requires a name")))?;

    let key_source = inline
        .slug
        .as_deref()
        .filter(|slug| !slug.trim().is_empty())
        .unwrap_or(name);
    let key = slugify(key_source);

    let cosmetics = TermCosmetics {
        description: inline.description.clone(),
        accent_color: inline.accent_color.clone(),
        hero_image_url: inline.hero_image_url.clone(),
        metadata: inline.metadata.clone(),
    };

    let existing = if key.is_empty() {
        None
    } else {
        store.find_term_by_slug(kind, &key, workspace_id)?
    };

    let term = match existing {
        Some(term) => term,
        None if !allow_create => return Err(not_found(kind, format!("`{name}`"))),
        None => {
            let slug = allocate_slug(store, SlugTarget::Term(kind), &key, workspace_id, None)?;
            let (term, created) = insert_or_reread(
                store,
                NewTerm {
                    kind,
                    workspace_id,
                    name: TermName::new(name)?,
                    slug,
                    description: cosmetics.description.clone(),
                    accent_color: cosmetics.accent_color.clone(),
                    hero_image_url: cosmetics.hero_image_url.clone(),
                    metadata: cosmetics.metadata.clone().unwrap_or_else(empty_document),
                },
            )?;
            if created {
                return Ok(term);
            }
            // Lost the race: the winner still gets the backfill.
            term
        }
    };

    if cosmetics.is_empty() {
        return Ok(term);
    }

    log::debug!("Backfilling cosmetics on {kind} `{}`", term.slug);
    Ok(store.patch_term_cosmetics(kind, term.id, &cosmetics)?)
}

/// Resolves one category or tag reference to a persisted row.
///
/// `None` resolves to `None`. Name/slug strings fall back from the workspace
/// to the global scope before creating a workspace term; inline objects are
/// matched strictly in the workspace and have their decorative fields
/// backfilled when the row already exists.
pub fn resolve_term<S>(
    store: &mut S,
    kind: TermKind,
    reference: Option<&TermReference>,
    workspace_id: Option<WorkspaceId>,
    allow_create: bool,
) -> ServiceResult<Option<Term>>
where
    S: SlugProbe + TermStore + ?Sized,
{
    let Some(reference) = reference else {
        return Ok(None);
    };

    let term = match reference {
        TermReference::ById(id) => find_visible_by_id(store, kind, *id, workspace_id)?,
        TermReference::ByNameOrSlug(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(ServiceError::validation(format!("blank {kind} reference")));
            }
            if text.bytes().all(|b| b.is_ascii_digit()) {
                let id = text
                    .parse::<i64>()
                    .map_err(|_| not_found(kind, format!("#{text}")))?;
                find_visible_by_id(store, kind, id, workspace_id)?
            } else {
                resolve_text(store, kind, text, workspace_id, allow_create)?
            }
        }
        TermReference::Inline(inline) => match inline.id {
            Some(id) => find_visible_by_id(store, kind, id, workspace_id)?,
            None => resolve_inline(store, kind, inline, workspace_id, allow_create)?,
        },
    };

    Ok(Some(term))
}

/// Resolves every reference independently, preserving order.
pub fn resolve_terms<S>(
    store: &mut S,
    kind: TermKind,
    references: &[TermReference],
    workspace_id: Option<WorkspaceId>,
    allow_create: bool,
) -> ServiceResult<Vec<Term>>
where
    S: SlugProbe + TermStore + ?Sized,
{
    references
        .iter()
        .filter_map(|reference| {
            resolve_term(store, kind, Some(reference), workspace_id, allow_create).transpose()
        })
        .collect()
}

pub fn list_terms<R>(repo: &R, kind: TermKind, filters: &TermListFilters) -> ServiceResult<TermPage>
where
    R: TermReader,
{
    let workspace_id = filters.workspace_id.map(WorkspaceId::new).transpose()?;
    let pagination = Pagination::clamped(filters.page, filters.page_size);

    let mut query = TermListQuery::new(kind)
        .workspace(WorkspaceFilter::new(workspace_id, filters.include_global))
        .paginate(pagination.page, pagination.per_page);
    if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.search(search);
    }

    let (total, items) = repo.list_terms(&query)?;

    Ok(TermPage {
        results: items.into_iter().map(PublicTerm::from).collect(),
        pagination: PageInfo::new(pagination, total),
    })
}

pub fn create_term<R>(
    repo: &R,
    kind: TermKind,
    payload: TermFormPayload,
    workspace_id: Option<WorkspaceId>,
) -> ServiceResult<PublicTerm>
where
    R: UnitOfWork,
{
    let term = repo.transaction(|store| {
        let slug = allocate_slug(
            store,
            SlugTarget::Term(kind),
            payload.slug_source(),
            workspace_id,
            None,
        )?;

        Ok::<_, ServiceError>(store.insert_term(&NewTerm {
            kind,
            workspace_id,
            name: payload.name.clone(),
            slug,
            description: payload.description.clone(),
            accent_color: payload.accent_color.clone(),
            hero_image_url: payload.hero_image_url.clone(),
            metadata: payload.metadata.clone(),
        })?)
    })?;

    log::info!("Created {kind} #{} `{}`", term.id, term.slug);
    Ok(PublicTerm::from(term))
}

pub fn update_term<R>(
    repo: &R,
    kind: TermKind,
    id: TermId,
    payload: TermFormPayload,
) -> ServiceResult<PublicTerm>
where
    R: UnitOfWork,
{
    let term = repo.transaction(|store| {
        let existing = store
            .find_term_by_id(kind, id)?
            .ok_or_else(|| not_found(kind, format!("#{id}")))?;

        let slug = allocate_slug(
            store,
            SlugTarget::Term(kind),
            payload.slug_source(),
            existing.workspace_id,
            Some(id.get()),
        )?;

        Ok::<_, ServiceError>(store.update_term(
            kind,
            id,
            &TermChanges {
                name: payload.name.clone(),
                slug,
                description: payload.description.clone(),
                accent_color: payload.accent_color.clone(),
                hero_image_url: payload.hero_image_url.clone(),
                metadata: payload.metadata.clone(),
            },
        )?)
    })?;

    log::info!("Updated {kind} #{id} `{}`", term.slug);
    Ok(PublicTerm::from(term))
}

/// Deletes an unused term. Terms still referenced by a post are kept.
pub fn delete_term<R>(repo: &R, kind: TermKind, id: TermId) -> ServiceResult<()>
where
    R: UnitOfWork,
{
    repo.transaction(|store| {
        if store.find_term_by_id(kind, id)?.is_none() {
            return Err(not_found(kind, format!("#{id}")));
        }

        let usage = store.count_term_usage(kind, id)?;
        if usage > 0 {
            return Err(ServiceError::Conflict(format!(
                "{kind} #{id} is used by {usage} post(s)"
            )));
        }

        store.delete_term(kind, id)?;
        Ok(())
    })?;

    log::info!("Deleted {kind} #{id}");
    Ok(())
}
