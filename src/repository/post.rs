use std::collections::{HashMap, HashSet};

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::media::{GalleryEntry, Media, NewGalleryItem};
use crate::domain::post::{NewPost, Post, PostAggregate};
use crate::domain::taxonomy::Term;
use crate::domain::types::{PostId, TermId, TermKind};
use crate::domain::workspace::{Author, Workspace};
use crate::models::media::{Media as DbMedia, NewPostMedia, PostMedia};
use crate::models::post::{NewPost as DbNewPost, NewPostTag, Post as DbPost, PostChanges};
use crate::models::taxonomy::Term as DbTerm;
use crate::models::workspace::{User as DbUser, Workspace as DbWorkspace};
use crate::repository::{
    DieselRepository, DieselStore, PostKey, PostListQuery, PostReader, PostStore,
    RepositoryResult, WorkspaceFilter,
};
use crate::schema::{categories, media, post_media, post_tags, posts, tags, users, workspaces};

/// `%term%` with LIKE wildcards in `term` escaped by a backslash.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn filtered_posts(query: &PostListQuery) -> posts::BoxedQuery<'static, Sqlite> {
    let mut items = posts::table.into_boxed::<Sqlite>();

    if let Some(status) = query.status {
        items = items.filter(posts::status.eq(status.as_str()));
    }

    items = match query.workspace {
        WorkspaceFilter::Any => items,
        WorkspaceFilter::Only(id) => items.filter(posts::workspace_id.eq(id.get())),
        WorkspaceFilter::WithGlobal(id) => items.filter(
            posts::workspace_id
                .eq(id.get())
                .or(posts::workspace_id.is_null()),
        ),
    };

    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = like_pattern(search);
        items = items.filter(
            posts::title
                .like(pattern.clone())
                .escape('\\')
                .or(posts::excerpt
                    .assume_not_null()
                    .like(pattern.clone())
                    .escape('\\'))
                .or(posts::content.like(pattern).escape('\\')),
        );
    }

    if let Some(slug) = query.category_slug.as_deref() {
        items = items.filter(
            posts::category_id.eq_any(
                categories::table
                    .filter(categories::slug.eq(slug.to_string()))
                    .select(categories::id.nullable()),
            ),
        );
    }

    if let Some(slug) = query.tag_slug.as_deref() {
        items = items.filter(
            posts::id.eq_any(
                post_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq(slug.to_string()))
                    .select(post_tags::post_id),
            ),
        );
    }

    items
}

fn ordered(items: posts::BoxedQuery<'static, Sqlite>) -> posts::BoxedQuery<'static, Sqlite> {
    // SQLite sorts NULL lowest, so undated posts land after dated ones.
    items.order((
        posts::featured.desc(),
        posts::published_at.desc(),
        posts::created_at.desc(),
        posts::id.asc(),
    ))
}

fn load_terms(
    conn: &mut SqliteConnection,
    kind: TermKind,
    ids: Vec<i32>,
) -> RepositoryResult<HashMap<i32, Term>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = with_term_table!(kind, |t| {
        t::table.filter(t::id.eq_any(ids)).load::<DbTerm>(conn)?
    });

    rows.into_iter()
        .map(|row| Ok((row.id, row.into_domain(kind)?)))
        .collect()
}

fn load_media(conn: &mut SqliteConnection, ids: Vec<i32>) -> RepositoryResult<HashMap<i32, Media>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    media::table
        .filter(media::id.eq_any(ids))
        .load::<DbMedia>(conn)?
        .into_iter()
        .map(|row| Ok((row.id, Media::try_from(row)?)))
        .collect()
}

fn distinct<I: IntoIterator<Item = i32>>(ids: I) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Attach every association to `rows` with one query per association.
pub(crate) fn hydrate(
    conn: &mut SqliteConnection,
    rows: Vec<DbPost>,
) -> RepositoryResult<Vec<PostAggregate>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<i32> = rows.iter().map(|row| row.id).collect();

    let categories = load_terms(
        conn,
        TermKind::Category,
        distinct(rows.iter().filter_map(|row| row.category_id)),
    )?;
    let covers = load_media(conn, distinct(rows.iter().filter_map(|row| row.cover_image_id)))?;

    let workspace_ids = distinct(rows.iter().filter_map(|row| row.workspace_id));
    let workspaces: HashMap<i32, Workspace> = if workspace_ids.is_empty() {
        HashMap::new()
    } else {
        workspaces::table
            .filter(workspaces::id.eq_any(workspace_ids))
            .load::<DbWorkspace>(conn)?
            .into_iter()
            .map(|row| Ok((row.id, Workspace::try_from(row)?)))
            .collect::<RepositoryResult<_>>()?
    };

    let authors: HashMap<i32, Author> = users::table
        .filter(users::id.eq_any(distinct(rows.iter().map(|row| row.author_id))))
        .load::<DbUser>(conn)?
        .into_iter()
        .map(|row| Ok((row.id, Author::try_from(row)?)))
        .collect::<RepositoryResult<_>>()?;

    let mut tags_by_post: HashMap<i32, Vec<Term>> = HashMap::new();
    let tag_rows = post_tags::table
        .inner_join(tags::table)
        .filter(post_tags::post_id.eq_any(post_ids.clone()))
        .order((post_tags::post_id.asc(), post_tags::position.asc()))
        .select((post_tags::post_id, tags::all_columns))
        .load::<(i32, DbTerm)>(conn)?;
    for (post_id, row) in tag_rows {
        tags_by_post
            .entry(post_id)
            .or_default()
            .push(row.into_domain(TermKind::Tag)?);
    }

    let mut gallery_by_post: HashMap<i32, Vec<GalleryEntry>> = HashMap::new();
    let gallery_rows = post_media::table
        .inner_join(media::table)
        .filter(post_media::post_id.eq_any(post_ids))
        .order((post_media::post_id.asc(), post_media::position.asc()))
        .select((post_media::all_columns, media::all_columns))
        .load::<(PostMedia, DbMedia)>(conn)?;
    for (link, row) in gallery_rows {
        gallery_by_post
            .entry(link.post_id)
            .or_default()
            .push(GalleryEntry {
                media: Media::try_from(row)?,
                position: link.position,
                role: link.role,
                caption: link.caption,
            });
    }

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            let category = row.category_id.and_then(|id| categories.get(&id).cloned());
            let cover_image = row.cover_image_id.and_then(|id| covers.get(&id).cloned());
            let workspace = row.workspace_id.and_then(|id| workspaces.get(&id).cloned());
            let author = authors.get(&row.author_id).cloned();

            Ok(PostAggregate {
                post: Post::try_from(row)?,
                category,
                tags: tags_by_post.remove(&id).unwrap_or_default(),
                cover_image,
                gallery: gallery_by_post.remove(&id).unwrap_or_default(),
                workspace,
                author,
            })
        })
        .collect()
}

impl PostStore for DieselStore<'_> {
    fn find_post_by_id(&mut self, id: PostId) -> RepositoryResult<Option<Post>> {
        let conn = &mut *self.conn;

        let row = posts::table
            .filter(posts::id.eq(id.get()))
            .first::<DbPost>(conn)
            .optional()?;

        Ok(row.map(Post::try_from).transpose()?)
    }

    fn insert_post(&mut self, post: &NewPost) -> RepositoryResult<Post> {
        let conn = &mut *self.conn;
        let row = DbNewPost::from_domain(post, Utc::now().naive_utc());

        let created = conn.transaction::<DbPost, diesel::result::Error, _>(|conn| {
            diesel::insert_into(posts::table)
                .values(&row)
                .get_result::<DbPost>(conn)
        })?;

        Ok(Post::try_from(created)?)
    }

    fn update_post(&mut self, id: PostId, post: &NewPost) -> RepositoryResult<Post> {
        let conn = &mut *self.conn;
        let changes = PostChanges::from_domain(post, Utc::now().naive_utc());

        let updated = conn.transaction::<DbPost, diesel::result::Error, _>(|conn| {
            diesel::update(posts::table.filter(posts::id.eq(id.get())))
                .set(&changes)
                .get_result::<DbPost>(conn)
        })?;

        Ok(Post::try_from(updated)?)
    }

    fn replace_post_tags(&mut self, id: PostId, tag_ids: &[TermId]) -> RepositoryResult<()> {
        let conn = &mut *self.conn;

        diesel::delete(post_tags::table.filter(post_tags::post_id.eq(id.get()))).execute(conn)?;

        let links: Vec<NewPostTag> = distinct(tag_ids.iter().map(|tag_id| tag_id.get()))
            .into_iter()
            .enumerate()
            .map(|(position, tag_id)| NewPostTag {
                post_id: id.get(),
                tag_id,
                position: position as i32,
            })
            .collect();

        if !links.is_empty() {
            diesel::insert_into(post_tags::table)
                .values(&links)
                .execute(conn)?;
        }

        Ok(())
    }

    fn replace_post_gallery(
        &mut self,
        id: PostId,
        items: &[NewGalleryItem],
    ) -> RepositoryResult<()> {
        let conn = &mut *self.conn;

        diesel::delete(post_media::table.filter(post_media::post_id.eq(id.get()))).execute(conn)?;

        let links: Vec<NewPostMedia> = items
            .iter()
            .map(|item| NewPostMedia {
                post_id: id.get(),
                media_id: item.media_id.get(),
                position: item.position,
                role: item.role.clone(),
                caption: item.caption.clone(),
            })
            .collect();

        if !links.is_empty() {
            diesel::insert_into(post_media::table)
                .values(&links)
                .execute(conn)?;
        }

        Ok(())
    }

    fn load_post_aggregate(&mut self, id: PostId) -> RepositoryResult<Option<PostAggregate>> {
        let conn = &mut *self.conn;

        let rows = posts::table
            .filter(posts::id.eq(id.get()))
            .load::<DbPost>(conn)?;

        Ok(hydrate(conn, rows)?.into_iter().next())
    }

    fn delete_post(&mut self, id: PostId) -> RepositoryResult<usize> {
        let conn = &mut *self.conn;

        diesel::delete(post_tags::table.filter(post_tags::post_id.eq(id.get()))).execute(conn)?;
        diesel::delete(post_media::table.filter(post_media::post_id.eq(id.get()))).execute(conn)?;
        let affected = diesel::delete(posts::table.filter(posts::id.eq(id.get()))).execute(conn)?;

        Ok(affected)
    }
}

impl PostReader for DieselRepository {
    fn list_posts(&self, query: &PostListQuery) -> RepositoryResult<(usize, Vec<PostAggregate>)> {
        let mut conn = self.conn()?;

        let total = filtered_posts(query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = ordered(filtered_posts(query));
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let rows = items.load::<DbPost>(&mut conn)?;
        let posts = hydrate(&mut conn, rows)?;

        Ok((total, posts))
    }

    fn find_post(
        &self,
        key: &PostKey,
        query: &PostListQuery,
    ) -> RepositoryResult<Option<PostAggregate>> {
        let mut conn = self.conn()?;

        let mut items = filtered_posts(query);
        items = match key {
            PostKey::Id(id) => items.filter(posts::id.eq(id.get())),
            PostKey::Slug(slug) => items.filter(posts::slug.eq(slug.clone())),
        };

        let row = ordered(items).first::<DbPost>(&mut conn).optional()?;

        Ok(hydrate(&mut conn, row.into_iter().collect())?.into_iter().next())
    }
}
