//! Common imports for feature slices.

pub use crate::problem::{ErrorBody, FieldViolation, ValidationBody};
pub use geopost_derive::{api_handler, api_model, geopost_error, geopost_slice};
pub use geopost_domain::constants::*;
pub use geopost_domain::registry::{FeatureSlice, InitializedSlice};

#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateError};
