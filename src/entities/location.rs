use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const MAX_ADDRESS_LEN: usize = 255;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn validate(&self, field: &str) -> Result<(), Error> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::validation_error(format!(
                "{}.lat must be a latitude in degrees",
                field
            )));
        }

        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::validation_error(format!(
                "{}.lng must be a longitude in degrees",
                field
            )));
        }

        Ok(())
    }
}

/// An address together with the point it resolves to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub address: String,
    pub coordinates: Coordinates,
}

impl Place {
    pub fn new(address: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            address: address.into(),
            coordinates,
        }
    }

    pub fn validate(&self, field: &str) -> Result<(), Error> {
        validate_address(&self.address, &format!("{}.address", field))?;
        self.coordinates.validate(&format!("{}.coordinates", field))
    }
}

pub fn validate_address(address: &str, field: &str) -> Result<(), Error> {
    if address.trim().is_empty() {
        return Err(Error::validation_error(format!("{} is required", field)));
    }

    if address.chars().count() > MAX_ADDRESS_LEN {
        return Err(Error::validation_error(format!(
            "{} must not exceed {} characters",
            field, MAX_ADDRESS_LEN
        )));
    }

    Ok(())
}

#[test]
fn coordinates_out_of_range_are_rejected() {
    assert!(Coordinates::new(91.0, 0.0).validate("origin").is_err());
    assert!(Coordinates::new(0.0, -180.5).validate("origin").is_err());
    assert!(Coordinates::new(f64::NAN, 0.0).validate("origin").is_err());
    assert!(Coordinates::new(-33.86, 151.2).validate("origin").is_ok());
}

#[test]
fn long_addresses_are_rejected() {
    let place = Place::new("x".repeat(256), Coordinates::new(0.0, 0.0));
    let err = place.validate("destination").unwrap_err();

    assert!(err.is_validation_error());
    assert!(err.message.starts_with("destination.address"));
}
