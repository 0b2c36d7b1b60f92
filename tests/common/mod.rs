#![allow(dead_code)]

pub mod racing;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use dispatch::api::{CustomerAPI, DriverAPI};
use dispatch::clock::ManualClock;
use dispatch::db::{MemoryStore, Store};
use dispatch::engine::Engine;
use dispatch::entities::{BookingRequest, Coordinates, Driver, Fare, Place, Schedule};
use dispatch::matching::MatchingPolicy;
use dispatch::scheduler::RetryPolicy;

/// Kilometres per degree of longitude on the equator.
pub const KM_PER_DEGREE: f64 = 111.19492664455873;

pub struct Harness<S = MemoryStore> {
    pub engine: Engine,
    pub store: Arc<S>,
    pub clock: Arc<ManualClock>,
}

pub fn noon() -> DateTime<Utc> {
    at(12, 0)
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
}

pub fn harness() -> Harness {
    harness_with(RetryPolicy {
        delay: Duration::from_secs(120),
        max_attempts: 1,
        backoff_factor: 2,
    })
}

pub fn harness_with(retry: RetryPolicy) -> Harness {
    harness_over(Arc::new(MemoryStore::new()), retry)
}

pub fn harness_over<S: Store + 'static>(store: Arc<S>, retry: RetryPolicy) -> Harness<S> {
    let clock = Arc::new(ManualClock::new(noon()));
    let engine = Engine::new(
        store.clone(),
        clock.clone(),
        MatchingPolicy::default(),
        retry,
    );

    Harness {
        engine,
        store,
        clock,
    }
}

/// A point `km` east of the origin used by [`request`].
pub fn east_of_origin(km: f64) -> Coordinates {
    Coordinates::new(0.0, km / KM_PER_DEGREE)
}

pub fn request(customer_id: i64, scheduled_time: DateTime<Utc>) -> BookingRequest {
    BookingRequest {
        customer_id,
        origin: Place::new("1 Harbour St", Coordinates::new(0.0, 0.0)),
        destination: Place::new("44 Station Rd", Coordinates::new(0.1, 0.1)),
        schedule: Schedule {
            scheduled_time,
            return_time: None,
            round_trip: false,
        },
        fare: Fare {
            km: 16,
            total_amount: Decimal::new(2450, 2),
            payment: "cash".into(),
        },
        stops: vec![],
        passenger_count: 1,
        trip_type: None,
    }
}

impl<S> Harness<S> {
    pub async fn customer(&self) -> i64 {
        self.engine
            .register_customer(Uuid::new_v4())
            .await
            .unwrap()
            .id
    }

    pub async fn driver_at(&self, coordinates: Coordinates) -> Driver {
        self.engine
            .register_driver(Uuid::new_v4(), Some(coordinates))
            .await
            .unwrap()
    }
}
