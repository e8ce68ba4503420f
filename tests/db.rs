use diesel::prelude::*;
use marketplace_blog::schema::workspaces;

mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new();
    let pool = test_db.pool();
    let conn = pool.get();
    assert!(conn.is_ok());
}

#[test]
fn seeds_workspaces_and_author() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("connection");

    let ids: Vec<i32> = workspaces::table
        .select(workspaces::id)
        .order(workspaces::id.asc())
        .load(&mut conn)
        .expect("load workspaces");

    assert_eq!(ids, vec![common::WORKSPACE_A, common::WORKSPACE_B]);
}

#[test]
fn enables_foreign_keys_on_every_connection() {
    #[derive(QueryableByName)]
    struct Pragma {
        #[diesel(sql_type = diesel::sql_types::Integer)]
        foreign_keys: i32,
    }

    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("connection");

    let pragma: Pragma = diesel::sql_query("PRAGMA foreign_keys")
        .get_result(&mut conn)
        .expect("pragma query");

    assert_eq!(pragma.foreign_keys, 1);
}
