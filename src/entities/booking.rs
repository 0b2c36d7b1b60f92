use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::location::validate_address;
use crate::entities::{Coordinates, Driver, Place, Trip};
use crate::error::Error;

/// Everything a rider submits to book a trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub customer_id: i64,
    pub origin: Place,
    pub destination: Place,
    pub schedule: Schedule,
    pub fare: Fare,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default = "default_passenger_count")]
    pub passenger_count: i32,
    #[serde(default)]
    pub trip_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub return_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub round_trip: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    pub km: i32,
    pub total_amount: Decimal,
    pub payment: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub address: String,
    pub coordinates: Coordinates,
    pub stop_order: i32,
}

/// A stored trip and, when one was attached at creation, its driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub trip: Trip,
    pub driver: Option<Driver>,
}

fn default_passenger_count() -> i32 {
    1
}

impl BookingRequest {
    /// Rejects a request before any matching work is done for it.
    pub fn validate(&self) -> Result<(), Error> {
        self.origin.validate("origin")?;
        self.destination.validate("destination")?;
        self.schedule.validate()?;
        self.fare.validate()?;

        if self.passenger_count < 1 {
            return Err(Error::validation_error(
                "passenger_count must be at least 1",
            ));
        }

        let mut orders = HashSet::new();
        for (i, stop) in self.stops.iter().enumerate() {
            validate_address(&stop.address, &format!("stops.{}.address", i))?;
            stop.coordinates
                .validate(&format!("stops.{}.coordinates", i))?;

            if !orders.insert(stop.stop_order) {
                return Err(Error::validation_error(format!(
                    "stops.{}.stop_order {} is used more than once",
                    i, stop.stop_order
                )));
            }
        }

        Ok(())
    }
}

impl Schedule {
    fn validate(&self) -> Result<(), Error> {
        match self.return_time {
            Some(return_time) if return_time <= self.scheduled_time => Err(
                Error::validation_error("return_time must be after scheduled_time"),
            ),
            _ => Ok(()),
        }
    }
}

impl Fare {
    fn validate(&self) -> Result<(), Error> {
        if self.km < 0 {
            return Err(Error::validation_error("km must not be negative"));
        }

        if self.total_amount.is_sign_negative() {
            return Err(Error::validation_error(
                "total_amount must not be negative",
            ));
        }

        if self.payment.trim().is_empty() {
            return Err(Error::validation_error("payment is required"));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_request(customer_id: i64, scheduled_time: DateTime<Utc>) -> BookingRequest {
    BookingRequest {
        customer_id,
        origin: Place::new("1 Main St", Coordinates::new(0.0, 0.05)),
        destination: Place::new("9 Dock Rd", Coordinates::new(0.2, 0.2)),
        schedule: Schedule {
            scheduled_time,
            return_time: None,
            round_trip: false,
        },
        fare: Fare {
            km: 8,
            total_amount: Decimal::new(1800, 2),
            payment: "card".into(),
        },
        stops: vec![],
        passenger_count: 1,
        trip_type: None,
    }
}
