use geopost_database::DatabaseError;
use geopost_kernel::problem::FieldViolation;
use std::borrow::Cow;

/// A specialized [`AddressError`] enum of this crate.
#[geopost_derive::geopost_error]
pub enum AddressError {
    /// Input failed one or more declared constraints.
    #[error("Address validation failed{}: {}", format_context(.context), describe(.violations))]
    Validation { violations: Vec<FieldViolation>, context: Option<Cow<'static, str>> },

    /// No address carries this identifier.
    #[error("Address {id} not found{}", format_context(.context))]
    NotFound { id: i64, context: Option<Cow<'static, str>> },

    /// Distance computation was given or produced non-finite geometry.
    #[error("Distance computation failed{}: {field} {message}", format_context(.context))]
    Computation {
        field: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Address storage error{}: {source}", format_context(.context))]
    Database {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal address error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl AddressError {
    #[cfg_attr(not(feature = "server"), allow(dead_code))]
    pub(crate) fn invalid(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { violations: vec![FieldViolation::new(field, message)], context: None }
    }

    pub(crate) const fn not_found(id: i64) -> Self {
        Self::NotFound { id, context: None }
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[cfg(feature = "server")]
mod response {
    use super::AddressError;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use geopost_kernel::problem::{ErrorBody, FieldViolation, ValidationBody};

    impl IntoResponse for AddressError {
        fn into_response(self) -> Response {
            match self {
                Self::Validation { violations, .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, Json(ValidationBody::from(violations)))
                        .into_response()
                }
                Self::Computation { field, message, .. } => {
                    let body = ValidationBody::from(vec![FieldViolation::new(field, message)]);
                    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
                }
                Self::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Address not found")))
                        .into_response()
                }
                err @ (Self::Database { .. } | Self::Internal { .. }) => {
                    tracing::error!(error = %err, "Address request failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new("Internal server error")))
                        .into_response()
                }
            }
        }
    }
}
