use geopost_derive::api_model;
use surrealdb::types::SurrealValue;

/// Default page size of the address listing.
pub const DEFAULT_LIMIT: i64 = 10;

/// A stored postal address.
#[api_model]
#[derive(Clone, PartialEq, SurrealValue)]
pub struct Address {
    /// Identifier assigned on creation
    pub id: i64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    /// Degrees, strictly between -90 and 90
    pub latitude: f64,
    /// Degrees, strictly between -180 and 180
    pub longitude: f64,
}

/// Request body of create and update: every field except the identifier.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, PartialEq)]
pub struct AddressInput {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Pagination of the address listing.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "server", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "server", into_params(parameter_in = Query))]
pub struct ListParams {
    /// Records to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum records to return
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_LIMIT }
    }
}

const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Origin and radius of a proximity search.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "server", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "server", into_params(parameter_in = Query))]
pub struct ProximityParams {
    /// Origin latitude in degrees
    pub lat: f64,
    /// Origin longitude in degrees
    pub lon: f64,
    /// Radius in kilometres
    pub distance: f64,
}
