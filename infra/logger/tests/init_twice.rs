use geopost_logger::{Logger, LoggerError};

#[test]
fn second_install_reports_subscriber_error() {
    let _logger = Logger::builder("geopost-init-twice").init().expect("first init should succeed");

    let err = Logger::builder("geopost-init-twice-second")
        .init()
        .expect_err("second init should fail");

    assert!(matches!(err, LoggerError::Subscriber { .. }), "expected subscriber error");
}
