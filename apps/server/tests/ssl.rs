use geopost::domain::config::{ApiConfig, SslConfig};
use geopost_server::Server;
use std::path::Path;

fn config_with_ssl(ssl: SslConfig, database: &str) -> ApiConfig {
    let mut cfg = ApiConfig::default();
    cfg.server.ssl = Some(ssl);
    cfg.database.database = database.to_owned();
    cfg
}

fn pem_pair(dir: &Path, write_cert: bool, write_key: bool) -> SslConfig {
    let ssl = SslConfig { cert: dir.join("cert.pem"), key: dir.join("key.pem") };
    if write_cert {
        std::fs::write(&ssl.cert, "cert").expect("write cert");
    }
    if write_key {
        std::fs::write(&ssl.key, "key").expect("write key");
    }
    ssl
}

#[tokio::test]
async fn missing_certificate_fails_start() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ssl = pem_pair(dir.path(), false, true);

    let err = Server::start(config_with_ssl(ssl, "ssl_missing_cert")).await.unwrap_err();
    assert!(err.to_string().contains("SSL certificate not found"), "{err}");
}

#[tokio::test]
async fn missing_key_fails_start() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ssl = pem_pair(dir.path(), true, false);

    let err = Server::start(config_with_ssl(ssl, "ssl_missing_key")).await.unwrap_err();
    assert!(err.to_string().contains("SSL key not found"), "{err}");
}

#[tokio::test]
async fn present_files_pass_validation() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ssl = pem_pair(dir.path(), true, true);

    let server =
        Server::start(config_with_ssl(ssl, "ssl_present")).await.expect("files exist");
    assert!(server.state().config().server.ssl.is_some());
}
