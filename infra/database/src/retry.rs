use crate::DatabaseError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const CONFLICT_ATTEMPTS: u32 = 10;
const CONFLICT_INITIAL_DELAY: Duration = Duration::from_millis(2);

impl DatabaseError {
    /// Whether the storage engine aborted the transaction because a concurrent
    /// one touched the same keys. Such failures succeed when replayed.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Surreal { source, .. } => {
                let message = source.to_string();
                message.contains("Transaction conflict") || message.contains("can be retried")
            },
            _ => false,
        }
    }
}

/// Runs `op` until it succeeds, fails with anything but a write conflict, or
/// runs out of attempts. Waits between attempts double from 2ms.
///
/// `op` must be safe to replay: a conflicting transaction is rolled back
/// whole, so a single-statement write is.
///
/// # Errors
/// The first non-conflict error, or the last conflict once attempts run out.
pub async fn retry_on_conflict<T, F, Fut>(mut op: F) -> Result<T, DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let mut delay = CONFLICT_INITIAL_DELAY;
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err) if err.is_conflict() && attempt < CONFLICT_ATTEMPTS => {
                debug!(attempt, ?delay, "Write conflict, replaying transaction");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            },
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn conflict() -> DatabaseError {
        DatabaseError::Surreal {
            source: surrealdb::Error::thrown(
                "Transaction conflict: write-write. This transaction can be retried".to_owned(),
            ),
            context: None,
        }
    }

    #[test]
    fn only_surreal_conflicts_are_retryable() {
        assert!(conflict().is_conflict());
        assert!(!DatabaseError::from("Transaction conflict").is_conflict());
        let other = DatabaseError::Surreal {
            source: surrealdb::Error::thrown("Found record: `address:1`".to_owned()),
            context: None,
        };
        assert!(!other.is_conflict());
    }

    #[tokio::test]
    async fn replays_until_the_conflict_clears() {
        let calls = Cell::new(0);
        let value = retry_on_conflict(|| {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { if n < 3 { Err(conflict()) } else { Ok(n) } }
        })
        .await
        .expect("third attempt succeeds");

        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn other_errors_are_returned_immediately() {
        let calls = Cell::new(0);
        let result: Result<(), _> = retry_on_conflict(|| {
            calls.set(calls.get() + 1);
            async { Err(DatabaseError::from("boom")) }
        })
        .await;

        assert!(matches!(result, Err(DatabaseError::Internal { .. })));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn gives_up_after_bounded_attempts() {
        let calls = Cell::new(0);
        let result: Result<(), _> = retry_on_conflict(|| {
            calls.set(calls.get() + 1);
            async { Err(conflict()) }
        })
        .await;

        assert!(result.is_err_and(|err| err.is_conflict()));
        assert_eq!(calls.get(), CONFLICT_ATTEMPTS);
    }
}
