//! Facade crate for `GeoPost` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Register [`migrations`] with the database builder.
//! - Call [`init`] (server) to build every feature slice.
//! - Mount [`server::router`] on the API state.

use geopost_database::{Database, Migration};
pub use geopost_domain as domain;
pub use geopost_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    use geopost_kernel::server::ApiState;
    use utoipa_axum::router::OpenApiRouter;

    pub use geopost_kernel::server::system_router;

    /// System routes plus the routes of every enabled slice.
    pub fn router() -> OpenApiRouter<ApiState> {
        system_router().merge(crate::features::addresses::router())
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use geopost_addresses as addresses;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "addresses",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Schema migrations of every feature slice, in application order.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    features::addresses::migrations()
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    database: &Database,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let slices = vec![features::addresses::init(database)?];
    tracing::debug!(count = slices.len(), "Feature slices initialized");

    Ok(slices)
}
