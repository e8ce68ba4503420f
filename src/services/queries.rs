use crate::domain::types::{PostId, PostStatus, WorkspaceId};
use crate::dto::posts::{PostPage, PublicPost};
use crate::forms::posts::PostListFilters;
use crate::pagination::{PageInfo, Pagination};
use crate::repository::{PostKey, PostListQuery, PostReader, WorkspaceFilter};

use super::{ServiceError, ServiceResult};

/// Published posts only, unless the caller opted into unpublished ones.
fn effective_status(filters: &PostListFilters) -> Option<PostStatus> {
    if !filters.include_unpublished {
        return Some(PostStatus::Published);
    }
    filters
        .status
        .as_deref()
        .and_then(|status| PostStatus::try_from(status).ok())
}

fn base_query(filters: &PostListFilters) -> ServiceResult<PostListQuery> {
    let workspace_id = filters.workspace_id.map(WorkspaceId::new).transpose()?;

    let mut query = PostListQuery::default()
        .workspace(WorkspaceFilter::new(workspace_id, filters.include_global));
    if let Some(status) = effective_status(filters) {
        query = query.status(status);
    }

    if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.search(search.trim());
    }
    if let Some(category) = filters.category.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.category(category.trim());
    }
    if let Some(tag) = filters.tag.as_deref().filter(|s| !s.trim().is_empty()) {
        query = query.tag(tag.trim());
    }

    Ok(query)
}

pub fn list_posts<R>(repo: &R, filters: &PostListFilters) -> ServiceResult<PostPage>
where
    R: PostReader,
{
    let pagination = Pagination::clamped(filters.page, filters.page_size);
    let query = base_query(filters)?.paginate(pagination.page, pagination.per_page);

    let (total, posts) = repo.list_posts(&query)?;

    Ok(PostPage {
        results: posts.into_iter().map(PublicPost::from).collect(),
        pagination: PageInfo::new(pagination, total),
    })
}

/// Digit-only identifiers address ids, anything else a slug.
fn post_key(identifier: &str) -> ServiceResult<PostKey> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ServiceError::validation("post identifier is empty"));
    }

    if identifier.bytes().all(|b| b.is_ascii_digit()) {
        return identifier
            .parse::<i32>()
            .ok()
            .and_then(|id| PostId::new(id).ok())
            .map(PostKey::Id)
            .ok_or_else(|| ServiceError::not_found(format!("post {identifier}")));
    }

    Ok(PostKey::Slug(identifier.to_string()))
}

pub fn get_post<R>(repo: &R, identifier: &str, filters: &PostListFilters) -> ServiceResult<PublicPost>
where
    R: PostReader,
{
    let key = post_key(identifier)?;
    let query = base_query(filters)?;

    repo.find_post(&key, &query)?
        .map(PublicPost::from)
        .ok_or_else(|| ServiceError::not_found(format!("post {}", identifier.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_published() {
        let filters = PostListFilters {
            status: Some("draft".into()),
            ..PostListFilters::default()
        };
        assert_eq!(effective_status(&filters), Some(PostStatus::Published));
    }

    #[test]
    fn unpublished_honors_valid_status_and_ignores_invalid() {
        let valid = PostListFilters {
            include_unpublished: true,
            status: Some("Draft".into()),
            ..PostListFilters::default()
        };
        let invalid = PostListFilters {
            include_unpublished: true,
            status: Some("live".into()),
            ..PostListFilters::default()
        };
        assert_eq!(effective_status(&valid), Some(PostStatus::Draft));
        assert_eq!(effective_status(&invalid), None);
    }

    #[test]
    fn numeric_identifiers_are_ids() {
        assert_eq!(
            post_key("42").unwrap(),
            PostKey::Id(PostId::new(42).unwrap())
        );
        assert_eq!(post_key("hello-2").unwrap(), PostKey::Slug("hello-2".into()));
        assert!(matches!(post_key("0"), Err(ServiceError::NotFound(_))));
        assert!(matches!(post_key(" "), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn rejects_non_positive_workspace_filter() {
        let filters = PostListFilters {
            workspace_id: Some(0),
            ..PostListFilters::default()
        };
        assert!(matches!(base_query(&filters), Err(ServiceError::Validation(_))));
    }
}
