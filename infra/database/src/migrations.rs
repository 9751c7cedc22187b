use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;
use tracing::{info, trace};

/// Creates the bookkeeping table; safe to run on every start.
const BOOTSTRAP: &str = "
    DEFINE TABLE IF NOT EXISTS migration SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS slice ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS version ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS checksum ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS applied_at ON migration TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS migration_key ON migration FIELDS slice, version UNIQUE;
";

/// A schema script contributed by a feature slice.
///
/// Migrations run in the order they are registered. Once applied, a
/// `(slice, version)` pair must keep the same script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Hex-encoded hash of the script.
    #[must_use]
    pub fn checksum(&self) -> String {
        format!("{:016x}", fxhash::hash64(self.script))
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }
}

/// Outcome of a migration run, in registration order.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    slice: String,
    version: String,
    checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(
        &self,
        migrations: &[Migration],
    ) -> Result<MigrationReport, DatabaseError> {
        self.db
            .query(BOOTSTRAP)
            .await
            .context("Bootstrapping migration table")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let applied = self.applied().await?;
        let mut report = MigrationReport::default();

        for migration in migrations {
            let key = migration.key();
            if let Some(existing) = applied.get(&key) {
                ensure_checksum_match(migration, &existing.checksum)?;
                trace!(migration = %key, "Skipping migration");
                report.skipped.push(key);
                continue;
            }

            self.apply(migration).await?;
            info!(migration = %key, "Applied migration");
            report.applied.push(key);
        }

        Ok(report)
    }

    async fn applied(&self) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration SET slice = $slice, version = $version, checksum = $checksum;
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", migration.checksum()))
            .await
            .context(format!("Executing migration {}", migration.key()))?
            .check()
            .map_err(surrealdb::Error::from)
            .context(format!("Migration {} failed", migration.key()))?;

        Ok(())
    }
}

fn ensure_checksum_match(migration: &Migration, existing: &str) -> Result<(), DatabaseError> {
    let expected = migration.checksum();
    if existing != expected {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (recorded {existing}, script {expected})",
                migration.key()
            )
            .into(),
            context: Some("Migration already applied with a different script".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::engine::any::connect;

    const NOTES_V1: Migration = Migration::new(
        "notes",
        "0001",
        "DEFINE TABLE IF NOT EXISTS note SCHEMAFULL; DEFINE FIELD IF NOT EXISTS body ON note TYPE string;",
    );

    async fn memory() -> Surreal<Any> {
        let db = connect("mem://").await.expect("mem engine");
        db.use_ns("test").use_db("migrations").await.expect("session");
        db
    }

    #[test]
    fn checksum_is_stable_and_script_sensitive() {
        assert_eq!(NOTES_V1.checksum(), NOTES_V1.checksum());
        assert_eq!(NOTES_V1.checksum().len(), 16);

        let edited = Migration::new("notes", "0001", "DEFINE TABLE note;");
        assert_ne!(NOTES_V1.checksum(), edited.checksum());
    }

    #[tokio::test]
    async fn applies_once_then_skips() {
        let db = memory().await;
        let runner = MigrationRunner::new(&db);

        let first = runner.run(&[NOTES_V1]).await.expect("first run");
        assert_eq!(first.applied, vec!["notes:0001".to_owned()]);
        assert!(first.skipped.is_empty());

        let second = runner.run(&[NOTES_V1]).await.expect("second run");
        assert!(second.applied.is_empty());
        assert_eq!(second.skipped, vec!["notes:0001".to_owned()]);
    }

    #[tokio::test]
    async fn edited_script_is_rejected() {
        let db = memory().await;
        let runner = MigrationRunner::new(&db);
        runner.run(&[NOTES_V1]).await.expect("first run");

        let edited = Migration::new("notes", "0001", "DEFINE TABLE IF NOT EXISTS note SCHEMALESS;");
        let err = runner.run(&[edited]).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { .. }));
    }

    #[tokio::test]
    async fn failing_script_is_not_recorded() {
        let db = memory().await;
        let runner = MigrationRunner::new(&db);
        let broken = Migration::new("notes", "0002", "THIS IS NOT SURREALQL;");

        assert!(runner.run(&[broken]).await.is_err());

        let report = runner.run(&[NOTES_V1]).await.expect("valid run");
        assert_eq!(report.applied, vec!["notes:0001".to_owned()]);
    }
}
