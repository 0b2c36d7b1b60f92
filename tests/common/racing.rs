//! A store that lets a test slot a competing write between two steps of an
//! engine operation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use dispatch::db::{MemoryStore, Store};
use dispatch::entities::{
    BookingRequest, Coordinates, Customer, Driver, StatusClass, Trip, TripStatus,
};
use dispatch::error::Error;
use dispatch::matching::Candidate;

#[derive(Debug, Default)]
pub struct RacingStore {
    inner: MemoryStore,
    taken_after_snapshot: Mutex<Vec<i64>>,
    matched_before_delete: Mutex<Option<i64>>,
    conflicts: AtomicUsize,
}

impl RacingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The next candidate snapshot is followed by another booking reserving
    /// these drivers.
    pub fn take_after_snapshot(&self, driver_ids: &[i64]) {
        *lock(&self.taken_after_snapshot) = driver_ids.to_vec();
    }

    /// The next delete is preceded by a deferred match of the trip to this
    /// driver.
    pub fn match_before_delete(&self, driver_id: i64) {
        *lock(&self.matched_before_delete) = Some(driver_id);
    }

    pub fn conflicts(&self) -> usize {
        self.conflicts.load(Ordering::SeqCst)
    }

    pub async fn reserved_driver_ids(&self) -> std::collections::HashSet<i64> {
        self.inner.reserved_driver_ids().await
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl Store for RacingStore {
    async fn insert_customer(&self, user_id: Uuid) -> Result<Customer, Error> {
        self.inner.insert_customer(user_id).await
    }

    async fn customer_exists(&self, id: i64) -> Result<bool, Error> {
        self.inner.customer_exists(id).await
    }

    async fn insert_driver(
        &self,
        user_id: Uuid,
        coordinates: Option<Coordinates>,
    ) -> Result<Driver, Error> {
        self.inner.insert_driver(user_id, coordinates).await
    }

    async fn find_driver(&self, id: i64) -> Result<Option<Driver>, Error> {
        self.inner.find_driver(id).await
    }

    async fn update_driver_location(
        &self,
        id: i64,
        coordinates: Option<Coordinates>,
    ) -> Result<Option<Driver>, Error> {
        self.inner.update_driver_location(id, coordinates).await
    }

    async fn set_driver_available(
        &self,
        id: i64,
        available: bool,
    ) -> Result<Option<Driver>, Error> {
        self.inner.set_driver_available(id, available).await
    }

    async fn candidate_drivers(&self, exclude_trip: Option<i64>) -> Result<Vec<Candidate>, Error> {
        let snapshot = self.inner.candidate_drivers(exclude_trip).await?;

        let taken = std::mem::take(&mut *lock(&self.taken_after_snapshot));
        for driver_id in taken {
            self.inner.reserve_driver(driver_id).await?;
        }

        Ok(snapshot)
    }

    async fn reserve_driver(&self, id: i64) -> Result<Driver, Error> {
        let result = self.inner.reserve_driver(id).await;

        if matches!(&result, Err(err) if err.is_reservation_conflict_error()) {
            self.conflicts.fetch_add(1, Ordering::SeqCst);
        }

        result
    }

    async fn release_driver(&self, id: i64) -> Result<(), Error> {
        self.inner.release_driver(id).await
    }

    async fn insert_trip(
        &self,
        request: BookingRequest,
        driver_id: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Result<Trip, Error> {
        self.inner.insert_trip(request, driver_id, created_at).await
    }

    async fn find_trip(&self, id: i64) -> Result<Option<Trip>, Error> {
        self.inner.find_trip(id).await
    }

    async fn list_trips(
        &self,
        customer_id: i64,
        class: StatusClass,
        now: DateTime<Utc>,
    ) -> Result<Vec<Trip>, Error> {
        self.inner.list_trips(customer_id, class, now).await
    }

    async fn update_trip(&self, trip: &Trip, expected: TripStatus) -> Result<bool, Error> {
        self.inner.update_trip(trip, expected).await
    }

    async fn soft_delete_trip(&self, id: i64, at: DateTime<Utc>) -> Result<Option<Trip>, Error> {
        let matched = lock(&self.matched_before_delete).take();

        if let Some(driver_id) = matched {
            if let Some(mut trip) = self.inner.find_trip(id).await? {
                self.inner.reserve_driver(driver_id).await?;
                trip.assign_driver(driver_id)?;
                self.inner.update_trip(&trip, TripStatus::Requested).await?;
            }
        }

        self.inner.soft_delete_trip(id, at).await
    }
}
