//! Names shared between slices and the OpenAPI document.

/// OpenAPI tag for platform endpoints (health).
pub const SYSTEM_TAG: &str = "System";
/// OpenAPI tag for the address endpoints.
pub const ADDRESSES_TAG: &str = "Addresses";
