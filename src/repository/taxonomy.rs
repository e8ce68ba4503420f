use std::collections::HashMap;

use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::taxonomy::{NewTerm, Term, TermChanges, TermCosmetics, TermUsage};
use crate::domain::types::{TermId, TermKind, WorkspaceId};
use crate::models::taxonomy::Term as DbTerm;
use crate::repository::post::like_pattern;
use crate::repository::{
    DieselRepository, DieselStore, RepositoryResult, TermListQuery, TermReader, TermStore,
    WorkspaceFilter,
};

fn to_domain(row: DbTerm, kind: TermKind) -> RepositoryResult<Term> {
    Ok(row.into_domain(kind)?)
}

fn find_by_id(conn: &mut SqliteConnection, kind: TermKind, id: TermId) -> RepositoryResult<Option<Term>> {
    let row = with_term_table!(kind, |t| {
        t::table
            .filter(t::id.eq(id.get()))
            .first::<DbTerm>(conn)
            .optional()?
    });
    row.map(|row| to_domain(row, kind)).transpose()
}

/// Number of posts referencing each of `ids`.
pub(crate) fn usage_counts(
    conn: &mut SqliteConnection,
    kind: TermKind,
    ids: &[i32],
) -> RepositoryResult<HashMap<i32, usize>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let counts: Vec<(i32, i64)> = match kind {
        TermKind::Category => {
            use crate::schema::posts;

            posts::table
                .filter(posts::category_id.eq_any(ids.to_vec()))
                .group_by(posts::category_id)
                .select((posts::category_id, count_star()))
                .load::<(Option<i32>, i64)>(conn)?
                .into_iter()
                .filter_map(|(id, count)| id.map(|id| (id, count)))
                .collect()
        }
        TermKind::Tag => {
            use crate::schema::post_tags;

            post_tags::table
                .filter(post_tags::tag_id.eq_any(ids.to_vec()))
                .group_by(post_tags::tag_id)
                .select((post_tags::tag_id, count_star()))
                .load(conn)?
        }
    };

    Ok(counts
        .into_iter()
        .map(|(id, count)| (id, count as usize))
        .collect())
}

impl TermStore for DieselStore<'_> {
    fn find_term_by_id(&mut self, kind: TermKind, id: TermId) -> RepositoryResult<Option<Term>> {
        find_by_id(self.conn, kind, id)
    }

    fn find_term_by_slug(
        &mut self,
        kind: TermKind,
        slug: &str,
        workspace_id: Option<WorkspaceId>,
    ) -> RepositoryResult<Option<Term>> {
        let conn = &mut *self.conn;

        let row = with_term_table!(kind, |t| {
            let mut query = t::table.filter(t::slug.eq(slug)).into_boxed::<Sqlite>();
            query = match workspace_id {
                Some(id) => query.filter(t::workspace_id.eq(id.get())),
                None => query.filter(t::workspace_id.is_null()),
            };
            query.first::<DbTerm>(conn).optional()?
        });

        row.map(|row| to_domain(row, kind)).transpose()
    }

    fn insert_term(&mut self, term: &NewTerm) -> RepositoryResult<Term> {
        let conn = &mut *self.conn;
        let now = Utc::now().naive_utc();

        // Savepoint so a unique violation leaves the outer transaction usable.
        let row = conn.transaction::<DbTerm, diesel::result::Error, _>(|conn| {
            with_term_table!(term.kind, |t| {
                diesel::insert_into(t::table)
                    .values((
                        t::workspace_id.eq(term.workspace_id.map(|id| id.get())),
                        t::name.eq(term.name.as_str()),
                        t::slug.eq(term.slug.as_str()),
                        t::description.eq(term.description.as_deref()),
                        t::accent_color.eq(term.accent_color.as_deref()),
                        t::hero_image_url.eq(term.hero_image_url.as_deref()),
                        t::metadata.eq(term.metadata.to_string()),
                        t::created_at.eq(now),
                        t::updated_at.eq(now),
                    ))
                    .get_result::<DbTerm>(conn)
            })
        })?;

        to_domain(row, term.kind)
    }

    fn patch_term_cosmetics(
        &mut self,
        kind: TermKind,
        id: TermId,
        cosmetics: &TermCosmetics,
    ) -> RepositoryResult<Term> {
        let conn = &mut *self.conn;
        let now = Utc::now().naive_utc();

        let row = with_term_table!(kind, |t| {
            diesel::update(t::table.filter(t::id.eq(id.get())))
                .set((
                    cosmetics
                        .description
                        .as_deref()
                        .map(|value| t::description.eq(value)),
                    cosmetics
                        .accent_color
                        .as_deref()
                        .map(|value| t::accent_color.eq(value)),
                    cosmetics
                        .hero_image_url
                        .as_deref()
                        .map(|value| t::hero_image_url.eq(value)),
                    cosmetics
                        .metadata
                        .as_ref()
                        .map(|value| t::metadata.eq(value.to_string())),
                    t::updated_at.eq(now),
                ))
                .get_result::<DbTerm>(conn)?
        });

        to_domain(row, kind)
    }

    fn update_term(
        &mut self,
        kind: TermKind,
        id: TermId,
        changes: &TermChanges,
    ) -> RepositoryResult<Term> {
        let conn = &mut *self.conn;
        let now = Utc::now().naive_utc();

        let row = conn.transaction::<DbTerm, diesel::result::Error, _>(|conn| {
            with_term_table!(kind, |t| {
                diesel::update(t::table.filter(t::id.eq(id.get())))
                    .set((
                        t::name.eq(changes.name.as_str()),
                        t::slug.eq(changes.slug.as_str()),
                        t::description.eq(changes.description.as_deref()),
                        t::accent_color.eq(changes.accent_color.as_deref()),
                        t::hero_image_url.eq(changes.hero_image_url.as_deref()),
                        t::metadata.eq(changes.metadata.to_string()),
                        t::updated_at.eq(now),
                    ))
                    .get_result::<DbTerm>(conn)
            })
        })?;

        to_domain(row, kind)
    }

    fn count_term_usage(&mut self, kind: TermKind, id: TermId) -> RepositoryResult<usize> {
        let counts = usage_counts(self.conn, kind, &[id.get()])?;
        Ok(counts.get(&id.get()).copied().unwrap_or(0))
    }

    fn delete_term(&mut self, kind: TermKind, id: TermId) -> RepositoryResult<usize> {
        let conn = &mut *self.conn;

        let affected = with_term_table!(kind, |t| {
            diesel::delete(t::table.filter(t::id.eq(id.get()))).execute(conn)?
        });

        Ok(affected)
    }
}

impl TermReader for DieselRepository {
    fn list_terms(&self, query: &TermListQuery) -> RepositoryResult<(usize, Vec<TermUsage>)> {
        let mut conn = self.conn()?;
        let kind = query.kind;

        let (total, rows) = with_term_table!(kind, |t| {
            let query_builder = || {
                let mut items = t::table.into_boxed::<Sqlite>();

                items = match query.workspace {
                    WorkspaceFilter::Any => items,
                    WorkspaceFilter::Only(id) => items.filter(t::workspace_id.eq(id.get())),
                    WorkspaceFilter::WithGlobal(id) => items.filter(
                        t::workspace_id
                            .eq(id.get())
                            .or(t::workspace_id.is_null()),
                    ),
                };

                if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
                    items = items.filter(t::name.like(like_pattern(search)).escape('\\'));
                }

                items
            };

            let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

            let mut items = query_builder();
            if let Some(pagination) = &query.pagination {
                items = items.offset(pagination.offset()).limit(pagination.limit());
            }

            let rows = items
                .order((t::name.asc(), t::id.asc()))
                .load::<DbTerm>(&mut conn)?;

            (total, rows)
        });

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let counts = usage_counts(&mut conn, kind, &ids)?;

        let items = rows
            .into_iter()
            .map(|row| {
                let post_count = counts.get(&row.id).copied().unwrap_or(0);
                to_domain(row, kind).map(|term| TermUsage { term, post_count })
            })
            .collect::<RepositoryResult<Vec<TermUsage>>>()?;

        Ok((total, items))
    }

    fn get_term_by_id(&self, kind: TermKind, id: TermId) -> RepositoryResult<Option<Term>> {
        let mut conn = self.conn()?;
        find_by_id(&mut conn, kind, id)
    }
}
