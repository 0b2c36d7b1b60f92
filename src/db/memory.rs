use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Store;
use crate::{
    entities::{BookingRequest, Coordinates, Customer, Driver, StatusClass, Trip, TripStatus},
    error::Error,
    matching::Candidate,
};

/// In-process store. Each operation holds the lock for its whole duration,
/// which gives it the same atomicity as a single SQL statement.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    customers: BTreeMap<i64, Customer>,
    drivers: BTreeMap<i64, Driver>,
    trips: BTreeMap<i64, Trip>,
    last_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_customer(&self, user_id: Uuid) -> Result<Customer, Error> {
        let mut state = self.state.lock().await;

        if state.customers.values().any(|c| c.user_id == user_id) {
            return Err(Error::validation_error("user already has a customer profile"));
        }

        let customer = Customer {
            id: state.next_id(),
            user_id,
        };
        state.customers.insert(customer.id, customer.clone());

        Ok(customer)
    }

    async fn customer_exists(&self, id: i64) -> Result<bool, Error> {
        Ok(self.state.lock().await.customers.contains_key(&id))
    }

    async fn insert_driver(
        &self,
        user_id: Uuid,
        coordinates: Option<Coordinates>,
    ) -> Result<Driver, Error> {
        let mut state = self.state.lock().await;

        if state.drivers.values().any(|d| d.user_id == user_id) {
            return Err(Error::validation_error("user already has a driver profile"));
        }

        let driver = Driver::new(state.next_id(), user_id, coordinates);
        state.drivers.insert(driver.id, driver.clone());

        Ok(driver)
    }

    async fn find_driver(&self, id: i64) -> Result<Option<Driver>, Error> {
        Ok(self.state.lock().await.drivers.get(&id).cloned())
    }

    async fn update_driver_location(
        &self,
        id: i64,
        coordinates: Option<Coordinates>,
    ) -> Result<Option<Driver>, Error> {
        let mut state = self.state.lock().await;

        Ok(state.drivers.get_mut(&id).map(|driver| {
            driver.coordinates = coordinates;
            driver.clone()
        }))
    }

    async fn set_driver_available(
        &self,
        id: i64,
        available: bool,
    ) -> Result<Option<Driver>, Error> {
        let mut state = self.state.lock().await;

        Ok(state.drivers.get_mut(&id).map(|driver| {
            driver.available = available;
            driver.clone()
        }))
    }

    async fn candidate_drivers(&self, exclude_trip: Option<i64>) -> Result<Vec<Candidate>, Error> {
        let state = self.state.lock().await;

        let candidates = state
            .drivers
            .values()
            .filter(|d| d.available && d.is_located())
            .map(|driver| {
                let busy = state
                    .trips
                    .values()
                    .filter(|t| t.driver_id == Some(driver.id))
                    .filter(|t| Some(t.id) != exclude_trip && !t.is_deleted())
                    .filter_map(Trip::busy_window)
                    .collect();

                Candidate::new(driver.clone(), busy)
            })
            .collect();

        Ok(candidates)
    }

    async fn reserve_driver(&self, id: i64) -> Result<Driver, Error> {
        let mut state = self.state.lock().await;

        let driver = state
            .drivers
            .get_mut(&id)
            .ok_or_else(|| Error::not_found_error("driver"))?;
        driver.reserve()?;

        Ok(driver.clone())
    }

    async fn release_driver(&self, id: i64) -> Result<(), Error> {
        let mut state = self.state.lock().await;

        let driver = state
            .drivers
            .get_mut(&id)
            .ok_or_else(|| Error::not_found_error("driver"))?;
        driver.release();

        Ok(())
    }

    async fn insert_trip(
        &self,
        request: BookingRequest,
        driver_id: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Result<Trip, Error> {
        let mut state = self.state.lock().await;

        if !state.customers.contains_key(&request.customer_id) {
            return Err(Error::validation_error("customer_id does not exist"));
        }

        let trip = Trip::new(state.next_id(), request, driver_id, created_at);
        state.trips.insert(trip.id, trip.clone());

        Ok(trip)
    }

    async fn find_trip(&self, id: i64) -> Result<Option<Trip>, Error> {
        let state = self.state.lock().await;

        Ok(state.trips.get(&id).filter(|t| !t.is_deleted()).cloned())
    }

    async fn list_trips(
        &self,
        customer_id: i64,
        class: StatusClass,
        now: DateTime<Utc>,
    ) -> Result<Vec<Trip>, Error> {
        let state = self.state.lock().await;

        let mut trips: Vec<Trip> = state
            .trips
            .values()
            .filter(|t| t.customer_id == customer_id && !t.is_deleted())
            .filter(|t| class.includes(t, now))
            .cloned()
            .collect();
        trips.sort_by_key(|t| (t.scheduled_time, t.id));

        Ok(trips)
    }

    async fn update_trip(&self, trip: &Trip, expected: TripStatus) -> Result<bool, Error> {
        let mut state = self.state.lock().await;

        match state.trips.get_mut(&trip.id) {
            Some(stored) if stored.status == expected && !stored.is_deleted() => {
                stored.driver_id = trip.driver_id;
                stored.status = trip.status;
                stored.from_time = trip.from_time;
                stored.to_time = trip.to_time;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn soft_delete_trip(&self, id: i64, at: DateTime<Utc>) -> Result<Option<Trip>, Error> {
        let mut state = self.state.lock().await;

        match state.trips.get_mut(&id) {
            Some(trip) if !trip.is_deleted() => {
                trip.deleted_at = Some(at);
                Ok(Some(trip.clone()))
            }
            _ => Ok(None),
        }
    }
}

impl MemoryStore {
    /// Drivers that currently hold a reservation.
    pub async fn reserved_driver_ids(&self) -> HashSet<i64> {
        let state = self.state.lock().await;

        state
            .drivers
            .values()
            .filter(|d| !d.available)
            .map(|d| d.id)
            .collect()
    }
}

#[test]
fn reservation_is_compare_and_set() {
    use tokio_test::block_on;

    let store = MemoryStore::new();
    let driver = block_on(store.insert_driver(Uuid::new_v4(), None)).unwrap();

    assert!(block_on(store.reserve_driver(driver.id)).is_ok());

    let err = block_on(store.reserve_driver(driver.id)).unwrap_err();
    assert!(err.is_reservation_conflict_error());

    block_on(store.release_driver(driver.id)).unwrap();
    assert!(block_on(store.reserve_driver(driver.id)).is_ok());
}

#[test]
fn stale_trip_updates_are_refused() {
    use crate::entities::sample_request;
    use tokio_test::block_on;

    let store = MemoryStore::new();
    let customer = block_on(store.insert_customer(Uuid::new_v4())).unwrap();

    let request = sample_request(customer.id, Utc::now());
    let trip = block_on(store.insert_trip(request, None, Utc::now())).unwrap();

    let mut canceled = trip.clone();
    canceled.cancel().unwrap();
    assert!(block_on(store.update_trip(&canceled, TripStatus::Requested)).unwrap());

    // a matcher still holding the old snapshot loses
    let mut matched = trip.clone();
    matched.assign_driver(42).unwrap();
    assert!(!block_on(store.update_trip(&matched, TripStatus::Requested)).unwrap());

    let stored = block_on(store.find_trip(trip.id)).unwrap().unwrap();
    assert_eq!(stored.status, TripStatus::Canceled);
    assert_eq!(stored.driver_id, None);
}

#[test]
fn soft_delete_reports_the_trip_as_deleted() {
    use crate::entities::sample_request;
    use tokio_test::block_on;

    let store = MemoryStore::new();
    let customer = block_on(store.insert_customer(Uuid::new_v4())).unwrap();
    let request = sample_request(customer.id, Utc::now());
    let trip = block_on(store.insert_trip(request, Some(3), Utc::now())).unwrap();

    let deleted = block_on(store.soft_delete_trip(trip.id, Utc::now()))
        .unwrap()
        .unwrap();
    assert_eq!(deleted.driver_id, Some(3));
    assert_eq!(deleted.status, TripStatus::Accepted);
    assert!(deleted.is_deleted());

    assert!(block_on(store.soft_delete_trip(trip.id, Utc::now()))
        .unwrap()
        .is_none());
    assert!(block_on(store.find_trip(trip.id)).unwrap().is_none());
}
