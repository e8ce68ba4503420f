use crate::db::{DbConnection, DbPool};
use crate::domain::media::{Media, NewGalleryItem, NewMedia};
use crate::domain::post::{NewPost, Post, PostAggregate};
use crate::domain::taxonomy::{NewTerm, Term, TermChanges, TermCosmetics, TermUsage};
use crate::domain::types::{MediaId, PostId, PostStatus, SlugTarget, TermId, TermKind, WorkspaceId};
use crate::pagination::Pagination;

/// Expands `$body` once per taxonomy table with `$t` aliased to its schema module.
///
/// `categories` and `tags` have identical columns, so every query is written
/// once against `$t::table` / `$t::column`.
macro_rules! with_term_table {
    ($kind:expr, |$t:ident| $body:block) => {
        match $kind {
            $crate::domain::types::TermKind::Category => {
                use $crate::schema::categories as $t;
                $body
            }
            $crate::domain::types::TermKind::Tag => {
                use $crate::schema::tags as $t;
                $body
            }
        }
    };
}

pub mod errors;
pub mod media;
pub mod post;
pub mod store;
pub mod taxonomy;

pub use errors::{RepositoryError, RepositoryResult};
pub use store::DieselStore;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Which workspaces a read is allowed to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkspaceFilter {
    /// No workspace filtering at all.
    #[default]
    Any,
    /// Rows of exactly this workspace.
    Only(WorkspaceId),
    /// Rows of this workspace plus global (`workspace_id IS NULL`) rows.
    WithGlobal(WorkspaceId),
}

impl WorkspaceFilter {
    pub fn new(workspace_id: Option<WorkspaceId>, include_global: bool) -> Self {
        match (workspace_id, include_global) {
            (None, _) => Self::Any,
            (Some(id), false) => Self::Only(id),
            (Some(id), true) => Self::WithGlobal(id),
        }
    }
}

/// Query parameters used when listing posts.
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    /// `None` lists every status.
    pub status: Option<PostStatus>,
    pub workspace: WorkspaceFilter,
    /// Substring over title, excerpt and content. SQLite `LIKE` folds case
    /// for ASCII letters only, so `café` does not match `CAFÉ`.
    pub search: Option<String>,
    /// Only posts whose category has this slug.
    pub category_slug: Option<String>,
    /// Only posts carrying a tag with this slug.
    pub tag_slug: Option<String>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }
    pub fn workspace(mut self, workspace: WorkspaceFilter) -> Self {
        self.workspace = workspace;
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn category(mut self, slug: impl Into<String>) -> Self {
        self.category_slug = Some(slug.into());
        self
    }
    pub fn tag(mut self, slug: impl Into<String>) -> Self {
        self.tag_slug = Some(slug.into());
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// How a single post is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostKey {
    Id(PostId),
    Slug(String),
}

/// Query parameters for listing categories or tags.
#[derive(Debug, Clone)]
pub struct TermListQuery {
    pub kind: TermKind,
    pub workspace: WorkspaceFilter,
    /// Substring over the name, case-insensitive for ASCII letters only.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl TermListQuery {
    pub fn new(kind: TermKind) -> Self {
        Self {
            kind,
            workspace: WorkspaceFilter::Any,
            search: None,
            pagination: None,
        }
    }
    pub fn workspace(mut self, workspace: WorkspaceFilter) -> Self {
        self.workspace = workspace;
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for posts.
pub trait PostReader {
    /// List posts matching the query, returning the total before pagination.
    fn list_posts(&self, query: &PostListQuery) -> RepositoryResult<(usize, Vec<PostAggregate>)>;
    /// Find one post by id or slug, honoring the status/workspace filters of `query`.
    fn find_post(
        &self,
        key: &PostKey,
        query: &PostListQuery,
    ) -> RepositoryResult<Option<PostAggregate>>;
}

/// Read-only operations for categories and tags.
pub trait TermReader {
    /// List terms with their post usage counts.
    fn list_terms(&self, query: &TermListQuery) -> RepositoryResult<(usize, Vec<TermUsage>)>;
    /// Retrieve a term by its identifier.
    fn get_term_by_id(&self, kind: TermKind, id: TermId) -> RepositoryResult<Option<Term>>;
}

/// Slug uniqueness probe used by the allocator.
pub trait SlugProbe {
    /// Whether `slug` is already used by another `target` row in the scope.
    fn slug_taken(
        &mut self,
        target: SlugTarget,
        slug: &str,
        workspace_id: Option<WorkspaceId>,
        exclude_id: Option<i32>,
    ) -> RepositoryResult<bool>;
}

/// Transaction-scoped category/tag operations.
pub trait TermStore {
    fn find_term_by_id(&mut self, kind: TermKind, id: TermId) -> RepositoryResult<Option<Term>>;
    /// Exact scope lookup: `None` matches only global terms.
    fn find_term_by_slug(
        &mut self,
        kind: TermKind,
        slug: &str,
        workspace_id: Option<WorkspaceId>,
    ) -> RepositoryResult<Option<Term>>;
    /// Insert a term; a slug already present in the scope yields [`RepositoryError::Conflict`].
    fn insert_term(&mut self, term: &NewTerm) -> RepositoryResult<Term>;
    /// Merge the provided decorative fields onto an existing term.
    fn patch_term_cosmetics(
        &mut self,
        kind: TermKind,
        id: TermId,
        cosmetics: &TermCosmetics,
    ) -> RepositoryResult<Term>;
    fn update_term(
        &mut self,
        kind: TermKind,
        id: TermId,
        changes: &TermChanges,
    ) -> RepositoryResult<Term>;
    /// Number of posts referencing the term.
    fn count_term_usage(&mut self, kind: TermKind, id: TermId) -> RepositoryResult<usize>;
    fn delete_term(&mut self, kind: TermKind, id: TermId) -> RepositoryResult<usize>;
}

/// Transaction-scoped media operations.
pub trait MediaStore {
    fn find_media_by_id(&mut self, id: MediaId) -> RepositoryResult<Option<Media>>;
    fn insert_media(&mut self, media: &NewMedia) -> RepositoryResult<Media>;
}

/// Transaction-scoped post operations.
pub trait PostStore {
    fn find_post_by_id(&mut self, id: PostId) -> RepositoryResult<Option<Post>>;
    /// Insert a post; a slug collision yields [`RepositoryError::Conflict`] and
    /// leaves the surrounding transaction usable.
    fn insert_post(&mut self, post: &NewPost) -> RepositoryResult<Post>;
    /// Overwrite every field of an existing post, with the same conflict contract as insert.
    fn update_post(&mut self, id: PostId, post: &NewPost) -> RepositoryResult<Post>;
    /// Replace the tag set wholesale, keeping the given order.
    fn replace_post_tags(&mut self, id: PostId, tag_ids: &[TermId]) -> RepositoryResult<()>;
    /// Delete every gallery link of the post, then insert `items`.
    fn replace_post_gallery(&mut self, id: PostId, items: &[NewGalleryItem])
    -> RepositoryResult<()>;
    fn load_post_aggregate(&mut self, id: PostId) -> RepositoryResult<Option<PostAggregate>>;
    /// Delete a post and its link rows. Media and terms are kept.
    fn delete_post(&mut self, id: PostId) -> RepositoryResult<usize>;
}

/// Everything a mutating service needs inside one transaction.
pub trait PublishingStore: SlugProbe + TermStore + MediaStore + PostStore {}

impl<T> PublishingStore for T where T: SlugProbe + TermStore + MediaStore + PostStore + ?Sized {}

/// Runs a closure inside one all-or-nothing transaction.
pub trait UnitOfWork {
    /// Commits when `f` returns `Ok`, rolls every write back when it returns `Err`.
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&mut dyn PublishingStore) -> Result<T, E>;
}
