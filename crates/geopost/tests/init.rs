use geopost::features::{addresses, is_enabled};
use geopost_database::Database;

#[tokio::test]
async fn init_registers_every_slice() {
    let db = Database::builder()
        .url("mem://")
        .session("test", "facade")
        .migrations(geopost::migrations())
        .init()
        .await
        .expect("in-memory database");

    let slices = geopost::init(&db).expect("init");
    assert_eq!(slices.len(), 1);
    assert!(slices[0].downcast_ref::<addresses::Addresses>().is_some());
}

#[test]
fn addresses_feature_is_always_enabled() {
    assert!(is_enabled("addresses"));
    assert!(!is_enabled("identity"));
    assert_eq!(geopost::migrations().len(), addresses::migrations().len());
}
