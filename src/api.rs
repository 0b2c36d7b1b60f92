use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Booking, BookingRequest, Coordinates, Customer, Driver, StatusClass, Trip};
use crate::error::Error;
use crate::matching::MatchStrategy;

#[async_trait]
pub trait BookingAPI {
    /// Validates and stores a booking, matching it now or later depending on
    /// `strategy`.
    async fn create_booking(
        &self,
        request: BookingRequest,
        strategy: MatchStrategy,
    ) -> Result<Booking, Error>;

    async fn create_immediate_booking(
        &self,
        request: BookingRequest,
    ) -> Result<(Trip, Driver), Error> {
        let booking = self
            .create_booking(request, MatchStrategy::Immediate)
            .await?;

        match booking.driver {
            Some(driver) => Ok((booking.trip, driver)),
            None => Err(Error::unexpected_error()),
        }
    }

    async fn create_deferred_booking(&self, request: BookingRequest) -> Result<Trip, Error> {
        let booking = self.create_booking(request, MatchStrategy::Deferred).await?;

        Ok(booking.trip)
    }

    async fn find_booking(&self, id: i64) -> Result<Trip, Error>;
    async fn list_bookings(&self, customer_id: i64, class: StatusClass)
        -> Result<Vec<Trip>, Error>;
    async fn cancel_booking(&self, id: i64) -> Result<Trip, Error>;
    async fn start_trip(&self, id: i64) -> Result<Trip, Error>;
    async fn complete_trip(&self, id: i64) -> Result<Trip, Error>;
    async fn delete_booking(&self, id: i64) -> Result<(), Error>;
}

#[async_trait]
pub trait DriverAPI {
    async fn register_driver(
        &self,
        user_id: Uuid,
        coordinates: Option<Coordinates>,
    ) -> Result<Driver, Error>;
    async fn find_driver(&self, id: i64) -> Result<Driver, Error>;
    async fn update_driver_location(
        &self,
        id: i64,
        coordinates: Option<Coordinates>,
    ) -> Result<Driver, Error>;
    async fn set_driver_availability(&self, id: i64, available: bool) -> Result<Driver, Error>;
}

#[async_trait]
pub trait CustomerAPI {
    async fn register_customer(&self, user_id: Uuid) -> Result<Customer, Error>;
}

pub trait API: BookingAPI + DriverAPI + CustomerAPI {}
