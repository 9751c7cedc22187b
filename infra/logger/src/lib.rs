//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for GeoPost binaries:
//! compact console output, and optionally a daily-rotated log file written
//! off the request path by a background worker.
//!
//! ```rust
//! use geopost_logger::Logger;
//!
//! let _logger = Logger::builder("geopost-server")
//!     .filter("info,geopost_addresses=debug")
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Rotated files kept on disk.
const RETAINED_FILES: usize = 14;

/// Collects logger settings; nothing is installed until [`LoggerBuilder::init`].
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    name: String,
    filter: String,
    directory: Option<PathBuf>,
    json: bool,
}

impl LoggerBuilder {
    /// `EnvFilter` directives used when `RUST_LOG` is unset. Defaults to `info`.
    pub fn filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = directives.into();
        self
    }

    /// Also writes `<dir>/<name>.<date>.log`, rotated daily.
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }

    /// Writes file records as JSON lines. Ignored without [`LoggerBuilder::directory`].
    pub const fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Installs the subscriber.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for a blank name or unparsable filter.
    /// * [`LoggerError::Internal`] if the log directory cannot be created.
    /// * [`LoggerError::Appender`] if the rolling file cannot be opened.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name must not be blank".into(),
                context: None,
            });
        }

        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = build_filter(env.as_deref(), &self.filter)?;
        let console = layer().compact().with_target(true).boxed();

        let (file, guard) = match &self.directory {
            Some(dir) => {
                let (writer, guard) = tracing_appender::non_blocking(appender(dir, &self.name)?);
                let file = layer().with_writer(writer).with_ansi(false);
                (Some(if self.json { file.json().boxed() } else { file.boxed() }), Some(guard))
            },
            None => (None, None),
        };

        tracing_subscriber::registry().with(filter).with(console).with(file).try_init()?;

        tracing::debug!(name = %self.name, file = ?self.directory, json = self.json, "Logger installed");
        Ok(Logger { guard })
    }
}

fn appender(dir: &Path, name: &str) -> Result<RollingFileAppender, LoggerError> {
    fs::create_dir_all(dir).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Creating log directory {}", dir.display()).into()),
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(name)
        .filename_suffix("log")
        .max_log_files(RETAINED_FILES)
        .build(dir)
        .context("Opening rolling log file")
}

/// A non-blank `RUST_LOG` overrides the configured directives.
fn build_filter(env: Option<&str>, configured: &str) -> Result<EnvFilter, LoggerError> {
    let directives = env.filter(|value| !value.trim().is_empty()).unwrap_or(configured);

    EnvFilter::try_new(directives).map_err(|e| LoggerError::InvalidConfiguration {
        message: e.to_string().into(),
        context: Some(format!("Log filter `{directives}`").into()),
    })
}

/// Keeps the file writer alive. Buffered records are flushed when dropped.
#[must_use = "dropping the logger stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder { name: name.into(), filter: "info".to_owned(), directory: None, json: false }
    }

    #[must_use]
    pub const fn writes_file(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_overrides_configured_filter() {
        let filter = build_filter(Some("warn"), "debug").expect("valid filter");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn blank_environment_is_ignored() {
        let filter = build_filter(Some("  "), "info,geopost_addresses=debug").expect("valid filter");
        assert!(filter.to_string().contains("geopost_addresses=debug"));
    }

    #[test]
    fn unparsable_filter_is_a_configuration_error() {
        let err = build_filter(None, "geopost=loudest").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }), "{err}");
    }

    #[test]
    fn blank_name_is_rejected_before_installing() {
        let err = Logger::builder(" ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
