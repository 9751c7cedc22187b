//! # Database Infrastructure
//!
//! Connects to [SurrealDB](https://surrealdb.com), applies the schema
//! migrations contributed by feature slices, and hands out scoped sessions.
//!
//! ## Key Features
//! - **Engine Agnostic**: `mem://`, `rocksdb://`, `ws://` and `http://` through the `any` engine.
//! - **Resilient Connectivity**: health checks with exponential backoff during startup.
//! - **Migrations**: checksummed, applied once per `(slice, version)`.
//! - **Scoped Sessions**: [`DatabaseSession`] guards released on drop.
//! - **Conflict Replay**: [`retry_on_conflict`] re-runs writes aborted by a concurrent transaction.
//!
//! ## Example
//!
//! ```rust
//! use geopost_database::{Database, DatabaseError, Migration};
//!
//! const NOTES: Migration =
//!     Migration::new("notes", "0001", "DEFINE TABLE IF NOT EXISTS note SCHEMALESS;");
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder()
//!         .url("mem://")
//!         .session("geopost", "core")
//!         .migration(NOTES)
//!         .init()
//!         .await?;
//!
//!     let session = db.session();
//!     let _version = session.version().await?;
//!
//!     Ok(())
//! }
//! ```

mod error;
mod migrations;
mod retry;
mod session;

pub use error::{DatabaseError, DatabaseErrorExt};
pub use migrations::{Migration, MigrationReport};
pub use retry::retry_on_conflict;
pub use session::DatabaseSession;

use migrations::MigrationRunner;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{info, instrument, warn};

const HEALTH_CHECK_ATTEMPTS: u32 = 3;
const HEALTH_CHECK_INITIAL_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct DatabaseInner {
    instance: Surreal<Any>,
    ns: String,
    db: String,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        info!(ns = %self.ns, db = %self.db, "SurrealDB connection handle dropped");
    }
}

/// Shared `SurrealDB` connection. Clones share the same underlying client.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Acquires a session for one request or unit of work.
    pub fn session(&self) -> DatabaseSession {
        DatabaseSession::acquire(self.inner.instance.clone())
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.inner.ns
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.inner.db
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

/// Fluent builder for a [`Database`].
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
    migrations: Vec<Migration>,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the namespace and database name.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Signs in as root after connecting.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    pub fn migration(mut self, migration: Migration) -> Self {
        self.migrations.push(migration);
        self
    }

    pub fn migrations(mut self, migrations: impl IntoIterator<Item = Migration>) -> Self {
        self.migrations.extend(migrations);
        self
    }

    /// Connects, authenticates, selects the namespace/database and applies migrations.
    ///
    /// # Process
    /// 1. **Validation**: URL, namespace and database name must be set.
    /// 2. **Engine Initialization**: connects through the `any` engine.
    /// 3. **Resilience**: up to 3 health checks, backing off from 500ms.
    /// 4. **Authentication**: root sign-in when [`DatabaseBuilder::auth`] was called.
    /// 5. **Session Activation**: selects namespace and database.
    /// 6. **Migrations**: applies every pending registered migration.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] if required parameters are missing.
    /// * [`DatabaseError::Connection`] if the engine fails to start or stays unhealthy.
    /// * [`DatabaseError::Auth`] if the credentials are rejected.
    /// * [`DatabaseError::Surreal`] if session activation or a migration statement fails.
    /// * [`DatabaseError::Migration`] if an applied migration's script changed.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let url = required(self.url, "URL is required")?;
        let ns = required(self.ns, "Namespace is required")?;
        let db = required(self.db, "Database is required")?;

        let instance = connect(&url).await.map_err(|e| DatabaseError::Connection {
            message: e.to_string().into(),
            context: Some("Initializing engine".into()),
        })?;

        wait_until_healthy(&instance, &url).await?;

        if let Some((username, password)) = self.auth {
            instance.signin(Root { username, password }).await.map_err(|e| {
                DatabaseError::Auth { message: e.to_string().into(), context: Some(url.clone().into()) }
            })?;
        }

        instance.use_ns(&ns).use_db(&db).await.context("Activating session")?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB connection established");

        let report = MigrationRunner::new(&instance).run(&self.migrations).await?;
        info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "Database migrations up to date"
        );

        Ok(Database { inner: Arc::new(DatabaseInner { instance, ns, db }) })
    }
}

fn required(value: Option<String>, message: &'static str) -> Result<String, DatabaseError> {
    value.ok_or(DatabaseError::Validation { message: message.into(), context: None })
}

async fn wait_until_healthy(instance: &Surreal<Any>, url: &str) -> Result<(), DatabaseError> {
    let mut delay = HEALTH_CHECK_INITIAL_DELAY;
    for attempt in 1..=HEALTH_CHECK_ATTEMPTS {
        if instance.health().await.is_ok() {
            return Ok(());
        }
        if attempt < HEALTH_CHECK_ATTEMPTS {
            warn!(attempt, ?delay, "Database not ready, retrying...");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }

    Err(DatabaseError::Connection {
        message: "Unhealthy after retries".into(),
        context: Some(url.to_owned().into()),
    })
}
