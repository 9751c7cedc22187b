//! # Runtime
//!
//! The multi-threaded Tokio runtime behind the GeoPost server binary.
//!
//! Worker count follows Tokio's own detection (`TOKIO_WORKER_THREADS`, then
//! the available parallelism) unless pinned on the attribute:
//!
//! ```rust,ignore
//! #[geopost_runtime::main(worker_threads = 2)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use geopost_derive::main;

use anyhow::Context;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

const MAX_WORKER_THREADS: usize = 1024;
/// 4 `MiB`.
const WORKER_STACK_SIZE: usize = 4 * 1024 * 1024;
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(120);

/// How the server runtime is sized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// `None` defers to Tokio's detection.
    pub worker_threads: Option<usize>,
}

impl RuntimeConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self { worker_threads: None }
    }

    /// Pins the worker count, clamped to `1..=1024`.
    #[must_use]
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads.clamp(1, MAX_WORKER_THREADS));
        self
    }

    /// Builds the runtime with I/O and timers enabled and workers named
    /// `geopost-http-<n>`.
    ///
    /// # Errors
    /// Returns an error if the OS refuses to spawn the worker threads.
    pub fn build(self) -> Result<Runtime> {
        debug!(worker_threads = ?self.worker_threads, "Building server runtime");

        let mut builder = Builder::new_multi_thread();
        if let Some(threads) = self.worker_threads {
            builder.worker_threads(threads);
        }
        builder
            .thread_name_fn(next_thread_name)
            .thread_stack_size(WORKER_STACK_SIZE)
            .thread_keep_alive(THREAD_KEEP_ALIVE)
            .enable_all()
            .build()
            .context("Failed to start the server runtime")
    }
}

fn next_thread_name() -> String {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    format!("geopost-http-{}", NEXT.fetch_add(1, Ordering::Relaxed))
}
