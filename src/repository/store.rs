use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::types::{SlugTarget, WorkspaceId};
use crate::repository::{
    DieselRepository, PublishingStore, RepositoryError, RepositoryResult, SlugProbe, UnitOfWork,
};

/// Store bound to one open transaction.
///
/// Every method runs on the borrowed connection, so all writes commit or roll
/// back together with the transaction that created the store.
pub struct DieselStore<'c> {
    pub(crate) conn: &'c mut SqliteConnection,
}

impl<'c> DieselStore<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

/// Keeps the caller's error apart from failures of BEGIN/COMMIT themselves.
enum TransactionError<E> {
    Aborted(E),
    Database(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for TransactionError<E> {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value)
    }
}

impl UnitOfWork for DieselRepository {
    fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<RepositoryError>,
        F: FnOnce(&mut dyn PublishingStore) -> Result<T, E>,
    {
        let mut conn = self.conn()?;

        let result = conn.transaction::<T, TransactionError<E>, _>(|conn| {
            let mut store = DieselStore::new(conn);
            f(&mut store).map_err(TransactionError::Aborted)
        });

        result.map_err(|e| match e {
            TransactionError::Aborted(e) => e,
            TransactionError::Database(e) => RepositoryError::from(e).into(),
        })
    }
}

impl SlugProbe for DieselStore<'_> {
    fn slug_taken(
        &mut self,
        target: SlugTarget,
        slug: &str,
        workspace_id: Option<WorkspaceId>,
        exclude_id: Option<i32>,
    ) -> RepositoryResult<bool> {
        let conn = &mut *self.conn;

        let matches = match target {
            SlugTarget::Post => {
                use crate::schema::posts;

                let mut query = posts::table
                    .filter(posts::slug.eq(slug))
                    .into_boxed::<Sqlite>();
                query = match workspace_id {
                    Some(id) => query.filter(posts::workspace_id.eq(id.get())),
                    None => query.filter(posts::workspace_id.is_null()),
                };
                if let Some(exclude_id) = exclude_id {
                    query = query.filter(posts::id.ne(exclude_id));
                }
                query.count().get_result::<i64>(conn)?
            }
            SlugTarget::Term(kind) => with_term_table!(kind, |t| {
                let mut query = t::table.filter(t::slug.eq(slug)).into_boxed::<Sqlite>();
                query = match workspace_id {
                    Some(id) => query.filter(t::workspace_id.eq(id.get())),
                    None => query.filter(t::workspace_id.is_null()),
                };
                if let Some(exclude_id) = exclude_id {
                    query = query.filter(t::id.ne(exclude_id));
                }
                query.count().get_result::<i64>(conn)?
            }),
        };

        Ok(matches > 0)
    }
}
