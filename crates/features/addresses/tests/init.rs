use geopost_addresses::{Addresses, SLICE, init, migrations};
use geopost_database::Database;

#[tokio::test]
async fn init_creates_slice() {
    let db = Database::builder()
        .url("mem://")
        .session("test", "init")
        .migrations(migrations())
        .init()
        .await
        .expect("in-memory database");

    let slice = init(&db).expect("init should succeed");
    assert_eq!(slice.id, std::any::TypeId::of::<Addresses>());
    assert!(slice.downcast_ref::<Addresses>().is_some());
}

#[test]
fn migrations_belong_to_the_slice() {
    let all = migrations();
    assert!(!all.is_empty());
    assert!(all.iter().all(|m| m.slice == SLICE));
    assert!(all[0].script.contains("DEFINE TABLE IF NOT EXISTS address SCHEMAFULL"));
}
