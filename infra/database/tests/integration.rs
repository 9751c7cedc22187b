use geopost_database::{Database, DatabaseError, Migration};
use surrealdb::types::SurrealValue;

#[derive(Debug, SurrealValue)]
struct AppliedRow {
    slice: String,
    version: String,
}

const NOTES: Migration = Migration::new(
    "notes",
    "0001",
    "DEFINE TABLE IF NOT EXISTS note SCHEMAFULL; DEFINE FIELD IF NOT EXISTS body ON note TYPE string;",
);

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://");

    db.health().await.expect("health check");
    assert_eq!(db.namespace(), "test_ns");
    assert_eq!(db.database(), "test_db");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));

    let err = Database::builder().url("mem://").init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn registered_migrations_run_at_init() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "migrated")
        .migrations([NOTES])
        .init()
        .await
        .expect("init with migrations");

    let mut response = db
        .query("SELECT slice, version FROM migration")
        .await
        .expect("query migration table");
    let rows: Vec<AppliedRow> = response.take(0).expect("decode rows");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slice, "notes");
    assert_eq!(rows[0].version, "0001");
}

#[tokio::test]
async fn schemafull_table_rejects_wrong_types() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "typed")
        .migration(NOTES)
        .init()
        .await
        .expect("init with migrations");

    let result = db
        .query("CREATE note SET body = 42")
        .await
        .expect("send query")
        .check();
    assert!(result.is_err());
}

#[tokio::test]
async fn sessions_share_the_connection() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "sessions")
        .migration(NOTES)
        .init()
        .await
        .expect("init");

    {
        let session = db.session();
        session
            .query("CREATE note:first SET body = 'hello'")
            .await
            .expect("create")
            .check()
            .expect("create succeeded");
    }

    let session = db.session();
    let mut response = session.query("SELECT VALUE body FROM note").await.expect("select");
    let bodies: Vec<String> = response.take(0).expect("decode");
    assert_eq!(bodies, vec!["hello".to_owned()]);
}
