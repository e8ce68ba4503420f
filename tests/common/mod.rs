//! Helpers for integration tests.
#![allow(dead_code)]

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use marketplace_blog::db::{DbPool, establish_connection_pool};
use marketplace_blog::domain::types::{UserId, WorkspaceId};
use marketplace_blog::repository::DieselRepository;
use marketplace_blog::schema::{users, workspaces};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Author seeded into every test database.
pub const AUTHOR_ID: i32 = 1;
/// Two agency workspaces seeded into every test database.
pub const WORKSPACE_A: i32 = 5;
pub const WORKSPACE_B: i32 = 7;

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");

        diesel::insert_into(users::table)
            .values((
                users::id.eq(AUTHOR_ID),
                users::name.eq("Ada Author"),
                users::email.eq("ada@example.com"),
            ))
            .execute(&mut conn)
            .expect("Failed to seed author");
        for (id, name, slug) in [
            (WORKSPACE_A, "Agency Five", "agency-five"),
            (WORKSPACE_B, "Agency Seven", "agency-seven"),
        ] {
            diesel::insert_into(workspaces::table)
                .values((
                    workspaces::id.eq(id),
                    workspaces::name.eq(name),
                    workspaces::slug.eq(slug),
                ))
                .execute(&mut conn)
                .expect("Failed to seed workspace");
        }

        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    /// Row count of a publishing table, read straight from the database.
    pub fn count_rows(&self, table: &str) -> i64 {
        use diesel::dsl::count_star;
        use marketplace_blog::schema::{categories, media, post_media, post_tags, posts, tags};

        let mut conn = self.pool.get().expect("connection");
        match table {
            "categories" => categories::table.select(count_star()).first::<i64>(&mut conn),
            "tags" => tags::table.select(count_star()).first::<i64>(&mut conn),
            "media" => media::table.select(count_star()).first::<i64>(&mut conn),
            "posts" => posts::table.select(count_star()).first::<i64>(&mut conn),
            "post_tags" => post_tags::table.select(count_star()).first::<i64>(&mut conn),
            "post_media" => post_media::table.select(count_star()).first::<i64>(&mut conn),
            other => panic!("unknown table {other}"),
        }
        .expect("count query")
    }
}

pub fn author() -> UserId {
    UserId::new(AUTHOR_ID).unwrap()
}

pub fn workspace(id: i32) -> Option<WorkspaceId> {
    Some(WorkspaceId::new(id).unwrap())
}
