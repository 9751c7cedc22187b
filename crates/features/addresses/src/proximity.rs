//! Naive radius search: full scan plus a pairwise geodesic distance check.

use crate::error::AddressError;
use crate::model::Address;
use crate::repository::AddressRepository;
use geo::{Distance, Geodesic, Point};
use std::borrow::Cow;
use tracing::{debug, instrument};

const METERS_PER_KILOMETER: f64 = 1000.0;

/// Every stored address within `radius_km` of the origin, in listing order.
///
/// The whole collection is fetched on each call. A negative radius matches
/// nothing, but the store is still scanned.
///
/// # Errors
/// * [`AddressError::Computation`] for a non-finite origin, radius or distance.
/// * [`AddressError::Database`] if the scan fails.
#[instrument(skip(repository))]
pub async fn find_within_distance(
    repository: &AddressRepository,
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Result<Vec<Address>, AddressError> {
    ensure_finite("lat", lat)?;
    ensure_finite("lon", lon)?;
    ensure_finite("distance", radius_km)?;

    let addresses = repository.list_all().await?;
    let scanned = addresses.len();
    let nearby = within_distance(addresses, lat, lon, radius_km)?;
    debug!(scanned, matched = nearby.len(), "Proximity scan finished");

    Ok(nearby)
}

/// Keeps the addresses whose geodesic distance to the origin is at most `radius_km`.
///
/// # Errors
/// [`AddressError::Computation`] for a non-finite origin, radius or distance.
pub fn within_distance(
    addresses: Vec<Address>,
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Result<Vec<Address>, AddressError> {
    ensure_finite("lat", lat)?;
    ensure_finite("lon", lon)?;
    ensure_finite("distance", radius_km)?;

    let origin = Point::new(lon, lat);
    let mut nearby = Vec::new();
    for address in addresses {
        let km = distance_km(origin, &address)?;
        if km <= radius_km {
            nearby.push(address);
        }
    }

    Ok(nearby)
}

fn distance_km(origin: Point<f64>, address: &Address) -> Result<f64, AddressError> {
    let target = Point::new(address.longitude, address.latitude);
    let km = Geodesic.distance(origin, target) / METERS_PER_KILOMETER;
    if km.is_finite() {
        Ok(km)
    } else {
        Err(computation(
            "distance",
            format!("is not finite between the origin and address {}", address.id),
        ))
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), AddressError> {
    if value.is_finite() { Ok(()) } else { Err(computation(field, "must be a finite number")) }
}

fn computation(field: &'static str, message: impl Into<Cow<'static, str>>) -> AddressError {
    AddressError::Computation { field: field.into(), message: message.into(), context: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: i64, latitude: f64, longitude: f64) -> Address {
        Address {
            id,
            street: format!("{id} Meridian Way"),
            city: "Null Island".to_owned(),
            state: String::new(),
            country: "XX".to_owned(),
            postal_code: "00000".to_owned(),
            latitude,
            longitude,
        }
    }

    fn ids(addresses: &[Address]) -> Vec<i64> {
        addresses.iter().map(|a| a.id).collect()
    }

    fn sample() -> Vec<Address> {
        vec![at(1, 0.0, 0.0), at(2, 0.0, 1.0), at(3, 10.0, 10.0)]
    }

    #[test]
    fn radius_150_km_keeps_the_two_nearby_points() {
        // One degree of longitude on the equator is about 111.3 km.
        let nearby = within_distance(sample(), 0.0, 0.0, 150.0).expect("finite input");
        assert_eq!(ids(&nearby), vec![1, 2]);
    }

    #[test]
    fn zero_radius_keeps_exact_matches_only() {
        let nearby = within_distance(sample(), 0.0, 1.0, 0.0).expect("finite input");
        assert_eq!(ids(&nearby), vec![2]);
    }

    #[test]
    fn negative_radius_matches_nothing() {
        let nearby = within_distance(sample(), 0.0, 0.0, -1.0).expect("finite input");
        assert!(nearby.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(within_distance(Vec::new(), 45.0, 45.0, 1.0e4).expect("finite input").is_empty());
    }

    #[test]
    fn listing_order_is_preserved() {
        let addresses = vec![at(5, 10.0, 10.0), at(7, 0.0, 0.0), at(9, 0.0, 1.0)];
        let nearby = within_distance(addresses, 0.0, 0.0, 5_000.0).expect("finite input");
        assert_eq!(ids(&nearby), vec![5, 7, 9]);
    }

    #[test]
    fn non_finite_input_is_a_computation_error() {
        for (lat, lon, radius, field) in [
            (f64::NAN, 0.0, 1.0, "lat"),
            (0.0, f64::INFINITY, 1.0, "lon"),
            (0.0, 0.0, f64::NAN, "distance"),
        ] {
            let err = within_distance(sample(), lat, lon, radius).unwrap_err();
            assert!(
                matches!(&err, AddressError::Computation { field: f, .. } if f == field),
                "unexpected error for {field}: {err}"
            );
        }
    }
}
