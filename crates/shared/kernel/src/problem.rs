//! JSON error bodies shared by every slice.
//!
//! Single-message answers (`404`, `500`) carry a `detail` string, `422`
//! answers a list of field violations under `detail`.

use geopost_derive::api_model;
use std::borrow::Cow;

/// One failed input constraint.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Name of the offending input field
    pub field: Cow<'static, str>,
    /// Human-readable constraint that was violated
    pub message: Cow<'static, str>,
}

impl FieldViolation {
    pub fn new(field: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Body of an answer carrying a single message.
#[api_model]
pub struct ErrorBody {
    pub detail: Cow<'static, str>,
}

impl ErrorBody {
    pub fn new(detail: impl Into<Cow<'static, str>>) -> Self {
        Self { detail: detail.into() }
    }
}

/// Body of a `422 Unprocessable Entity` answer.
#[api_model]
pub struct ValidationBody {
    pub detail: Vec<FieldViolation>,
}

impl From<Vec<FieldViolation>> for ValidationBody {
    fn from(detail: Vec<FieldViolation>) -> Self {
        Self { detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_joins_field_and_message() {
        let violation = FieldViolation::new("latitude", "must be greater than -90 and less than 90");
        assert_eq!(violation.to_string(), "latitude must be greater than -90 and less than 90");
    }

    #[test]
    fn violation_list_converts_into_body() {
        let body = ValidationBody::from(vec![FieldViolation::new("skip", "must not be negative")]);
        assert_eq!(body.detail.len(), 1);
        assert_eq!(body.detail[0].field, "skip");
    }
}
