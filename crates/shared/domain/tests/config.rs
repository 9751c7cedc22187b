use geopost_domain::config::{ApiConfig, CorsConfig, DatabaseConfig, LogConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "geopost");
    assert_eq!(db.database, "core");
    assert!(db.credentials.is_none());

    let cors = CorsConfig::default();
    assert!(cors.allows_any_origin());
    assert!(cors.allow_credentials);

    let log = LogConfig::default();
    assert_eq!(log.filter, "info");
    assert!(log.directory.is_none());
    assert!(!log.json);
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": {
            "url": "ws://db:8000",
            "namespace": "n",
            "database": "d",
            "credentials": { "username": "root", "password": "secret" }
        },
        "cors": { "allowed_origins": ["https://maps.example.com"], "allow_credentials": false },
        "log": { "filter": "warn,geopost_addresses=debug", "directory": "/var/log/geopost", "json": true }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.namespace, "n");
    assert_eq!(cfg.database.credentials.as_ref().map(|c| c.password.as_str()), Some("secret"));
    assert!(!cfg.cors.allows_any_origin());
    assert!(!cfg.cors.allow_credentials);
    assert_eq!(cfg.log.filter, "warn,geopost_addresses=debug");
    assert_eq!(cfg.log.directory.as_deref(), Some(std::path::Path::new("/var/log/geopost")));
    assert!(cfg.log.json);
}

#[test]
fn empty_document_falls_back_to_defaults() {
    let cfg: ApiConfig = serde_json::from_value(json!({})).expect("config deserialize");
    assert_eq!(cfg.server.port, 4583);
    assert_eq!(cfg.database.url, "mem://");
    assert_eq!(cfg.cors.allowed_origins, vec!["*".to_owned()]);
}

#[test]
fn deref_mut_copies_on_write() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 9000;

    assert_eq!(original.server.port, 4583);
    assert_eq!(changed.server.port, 9000);
}
