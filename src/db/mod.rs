mod memory;
mod postgres;
mod queries;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    entities::{BookingRequest, Coordinates, Customer, Driver, StatusClass, Trip, TripStatus},
    error::Error,
    matching::Candidate,
};

/// Persistence used by the engine.
///
/// Every method is atomic on its own. The two compare-and-set operations,
/// `reserve_driver` and `update_trip`, are what keep concurrent matches from
/// claiming the same driver or reviving a closed trip.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_customer(&self, user_id: Uuid) -> Result<Customer, Error>;

    async fn customer_exists(&self, id: i64) -> Result<bool, Error>;

    async fn insert_driver(
        &self,
        user_id: Uuid,
        coordinates: Option<Coordinates>,
    ) -> Result<Driver, Error>;

    async fn find_driver(&self, id: i64) -> Result<Option<Driver>, Error>;

    async fn update_driver_location(
        &self,
        id: i64,
        coordinates: Option<Coordinates>,
    ) -> Result<Option<Driver>, Error>;

    async fn set_driver_available(&self, id: i64, available: bool)
        -> Result<Option<Driver>, Error>;

    /// Available, located drivers with the busy windows of their trips other
    /// than `exclude_trip`.
    async fn candidate_drivers(&self, exclude_trip: Option<i64>) -> Result<Vec<Candidate>, Error>;

    /// Flips `available` from true to false. Fails with a reservation
    /// conflict when the driver was not available at commit time.
    async fn reserve_driver(&self, id: i64) -> Result<Driver, Error>;

    async fn release_driver(&self, id: i64) -> Result<(), Error>;

    /// Persists a booking together with its stops.
    async fn insert_trip(
        &self,
        request: BookingRequest,
        driver_id: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Result<Trip, Error>;

    /// Soft-deleted trips are not returned.
    async fn find_trip(&self, id: i64) -> Result<Option<Trip>, Error>;

    /// Ordered by scheduled time, earliest first.
    async fn list_trips(
        &self,
        customer_id: i64,
        class: StatusClass,
        now: DateTime<Utc>,
    ) -> Result<Vec<Trip>, Error>;

    /// Writes the mutable fields of `trip` only if the stored row is still in
    /// `expected` status and not deleted. Returns whether the write happened.
    async fn update_trip(&self, trip: &Trip, expected: TripStatus) -> Result<bool, Error>;

    /// Marks the trip deleted and returns it as it stood at that moment, so
    /// the caller sees any driver attached by a concurrent match. `None` when
    /// the trip is missing or already deleted.
    async fn soft_delete_trip(&self, id: i64, at: DateTime<Utc>) -> Result<Option<Trip>, Error>;
}
