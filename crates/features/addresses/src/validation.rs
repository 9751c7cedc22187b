//! Coordinate contract enforced before anything reaches the store.

use crate::error::AddressError;
use crate::model::AddressInput;
use geopost_kernel::problem::FieldViolation;
use surrealdb::types::SurrealValue;

pub const LATITUDE_LIMIT: f64 = 90.0;
pub const LONGITUDE_LIMIT: f64 = 180.0;

const LATITUDE_MESSAGE: &str = "must be greater than -90 and less than 90";
const LONGITUDE_MESSAGE: &str = "must be greater than -180 and less than 180";

/// Address fields that passed [`validate`]. The only input the repository accepts.
#[derive(Debug, Clone, PartialEq, SurrealValue)]
pub struct ValidAddress {
    street: String,
    city: String,
    state: String,
    country: String,
    postal_code: String,
    latitude: f64,
    longitude: f64,
}

/// Checks the coordinate ranges, collecting every violation before failing.
///
/// # Errors
/// [`AddressError::Validation`] listing each out-of-range coordinate.
pub fn validate(input: AddressInput) -> Result<ValidAddress, AddressError> {
    let mut violations = Vec::new();
    if !within_open_range(input.latitude, LATITUDE_LIMIT) {
        violations.push(FieldViolation::new("latitude", LATITUDE_MESSAGE));
    }
    if !within_open_range(input.longitude, LONGITUDE_LIMIT) {
        violations.push(FieldViolation::new("longitude", LONGITUDE_MESSAGE));
    }

    if !violations.is_empty() {
        return Err(AddressError::Validation { violations, context: None });
    }

    let AddressInput { street, city, state, country, postal_code, latitude, longitude } = input;
    Ok(ValidAddress { street, city, state, country, postal_code, latitude, longitude })
}

/// `true` when `value` lies strictly between `-limit` and `limit`. NaN never does.
fn within_open_range(value: f64, limit: f64) -> bool {
    value > -limit && value < limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input(latitude: f64, longitude: f64) -> AddressInput {
        AddressInput {
            street: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            country: "US".to_owned(),
            postal_code: "62701".to_owned(),
            latitude,
            longitude,
        }
    }

    fn violated_fields(err: AddressError) -> Vec<String> {
        match err {
            AddressError::Validation { violations, .. } => {
                violations.into_iter().map(|v| v.field.into_owned()).collect()
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn bounds_are_exclusive() {
        assert!(validate(input(90.0, 0.0)).is_err());
        assert!(validate(input(-90.0, 0.0)).is_err());
        assert!(validate(input(0.0, 180.0)).is_err());
        assert!(validate(input(0.0, -180.0)).is_err());
        assert!(validate(input(89.999_999, -179.999_999)).is_ok());
    }

    #[test]
    fn both_violations_are_reported() {
        let err = validate(input(100.0, -200.0)).unwrap_err();
        assert_eq!(violated_fields(err), vec!["latitude", "longitude"]);
    }

    #[test]
    fn nan_is_rejected() {
        let err = validate(input(f64::NAN, 0.0)).unwrap_err();
        assert_eq!(violated_fields(err), vec!["latitude"]);
    }

    #[test]
    fn text_fields_are_kept_verbatim() {
        let mut raw = input(1.0, 2.0);
        raw.street = "  Ünïcödé  ".to_owned();
        raw.postal_code = String::new();

        let valid = validate(raw).expect("valid coordinates");
        assert_eq!(valid.street, "  Ünïcödé  ");
        assert_eq!(valid.postal_code, "");
    }

    proptest! {
        #[test]
        fn in_range_coordinates_pass(lat in -89.999_f64..89.999, lon in -179.999_f64..179.999) {
            let valid = validate(input(lat, lon)).expect("in range");
            prop_assert_eq!(valid.latitude, lat);
            prop_assert_eq!(valid.longitude, lon);
        }

        #[test]
        fn out_of_range_latitude_fails(
            lat in prop_oneof![90.0_f64..1.0e6, -1.0e6_f64..=-90.0],
            lon in -179.0_f64..179.0,
        ) {
            let err = validate(input(lat, lon)).unwrap_err();
            prop_assert_eq!(violated_fields(err), vec!["latitude".to_owned()]);
        }

        #[test]
        fn out_of_range_longitude_fails(
            lat in -89.0_f64..89.0,
            lon in prop_oneof![180.0_f64..1.0e6, -1.0e6_f64..=-180.0],
        ) {
            let err = validate(input(lat, lon)).unwrap_err();
            prop_assert_eq!(violated_fields(err), vec!["longitude".to_owned()]);
        }
    }
}
