//! Kernel utilities shared across slices.
//! Keep this crate lightweight: config loading, the JSON error bodies every
//! slice answers with, and (behind `server`) the Axum state and system routes.
//!
//! ## Config loading
//! ```rust,no_run
//! use geopost_kernel::config::load_config;
//! use geopost_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server")).unwrap_or_default();
//! assert_eq!(cfg.server.port, 4583);
//! ```
pub mod config;
pub mod prelude;
pub mod problem;
#[cfg(feature = "server")]
pub mod server;

pub use geopost_domain as domain;
