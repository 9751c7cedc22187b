use geopost_logger::Logger;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_receives_address_events() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("nested").join("logs");

    let logger = Logger::builder("geopost-file-logging")
        .filter("info")
        .directory(&log_dir)
        .json(true)
        .init()?;
    assert!(logger.writes_file());

    tracing::info!(address_id = 7, "address created");
    tracing::debug!(address_id = 8, "filtered out");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("geopost-file-logging") && name.ends_with(".log"))
        })
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let records = contents
        .lines()
        .map(serde_json::from_str::<serde_json::Value>)
        .collect::<Result<Vec<_>, _>>()?;
    let created = records
        .iter()
        .find(|r| r["fields"]["message"] == "address created")
        .expect("info record present");
    assert_eq!(created["fields"]["address_id"], 7);
    assert!(records.iter().all(|r| r["fields"]["message"] != "filtered out"));

    Ok(())
}
