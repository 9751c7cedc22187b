use std::ops::Deref;
use std::time::Instant;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use tracing::trace;

/// A client handle scoped to one unit of work.
///
/// Acquired with [`Database::session`](crate::Database::session) and released
/// when dropped, whichever way the owning scope exits.
#[must_use = "a session is released as soon as it is dropped"]
#[derive(Debug)]
pub struct DatabaseSession {
    client: Surreal<Any>,
    acquired: Instant,
}

impl DatabaseSession {
    pub(crate) fn acquire(client: Surreal<Any>) -> Self {
        trace!("Database session acquired");
        Self { client, acquired: Instant::now() }
    }
}

impl Deref for DatabaseSession {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl Drop for DatabaseSession {
    fn drop(&mut self) {
        trace!(held_us = self.acquired.elapsed().as_micros(), "Database session released");
    }
}
