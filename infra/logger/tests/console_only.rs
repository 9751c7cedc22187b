use geopost_logger::Logger;

#[test]
fn console_logger_does_not_open_a_file() {
    let logger = Logger::builder("geopost-console-only")
        .filter("debug")
        .json(true)
        .init()
        .expect("logger should initialize");

    assert!(!logger.writes_file());
}
