mod common;

use std::time::Duration;

use common::racing::RacingStore;
use common::{at, east_of_origin, harness_over, noon, request};
use dispatch::api::{BookingAPI, DriverAPI};
use dispatch::entities::TripStatus;
use dispatch::scheduler::{RematchOutcome, RetryPolicy};

fn retry() -> RetryPolicy {
    RetryPolicy {
        delay: Duration::from_secs(120),
        max_attempts: 1,
        backoff_factor: 2,
    }
}

#[tokio::test]
async fn losing_a_reservation_falls_through_to_the_next_driver() {
    let h = harness_over(RacingStore::new(), retry());
    let customer = h.customer().await;
    let nearest = h.driver_at(east_of_origin(1.0)).await;
    let runner_up = h.driver_at(east_of_origin(2.0)).await;

    h.store.take_after_snapshot(&[nearest.id]);

    let (trip, driver) = h
        .engine
        .create_immediate_booking(request(customer, noon()))
        .await
        .unwrap();

    assert_eq!(h.store.conflicts(), 1);
    assert_eq!(driver.id, runner_up.id);
    assert_eq!(trip.driver_id, Some(runner_up.id));

    let reserved = h.store.reserved_driver_ids().await;
    assert!(reserved.contains(&nearest.id));
    assert!(reserved.contains(&runner_up.id));
}

#[tokio::test]
async fn losing_every_reservation_means_no_driver() {
    let h = harness_over(RacingStore::new(), retry());
    let customer = h.customer().await;
    let first = h.driver_at(east_of_origin(1.0)).await;
    let second = h.driver_at(east_of_origin(2.0)).await;

    h.store.take_after_snapshot(&[first.id, second.id]);

    let err = h
        .engine
        .create_immediate_booking(request(customer, noon()))
        .await
        .unwrap_err();

    assert!(err.is_no_driver_available_error());
    assert_eq!(h.store.conflicts(), 2);
}

#[tokio::test]
async fn rematch_skips_a_driver_taken_since_ranking() {
    let h = harness_over(RacingStore::new(), retry());
    let customer = h.customer().await;
    let nearest = h.driver_at(east_of_origin(0.5)).await;
    let runner_up = h.driver_at(east_of_origin(1.5)).await;

    let trip = h
        .engine
        .create_deferred_booking(request(customer, at(15, 0)))
        .await
        .unwrap();

    h.store.take_after_snapshot(&[nearest.id]);

    let outcome = h.engine.rematch(trip.id).await.unwrap();
    assert_eq!(
        outcome,
        RematchOutcome::Matched {
            driver_id: runner_up.id
        }
    );
    assert_eq!(h.store.conflicts(), 1);
}

#[tokio::test]
async fn deleting_during_a_rematch_commit_frees_the_driver() {
    let h = harness_over(RacingStore::new(), retry());
    let customer = h.customer().await;
    let driver = h.driver_at(east_of_origin(1.0)).await;

    let trip = h
        .engine
        .create_deferred_booking(request(customer, at(15, 0)))
        .await
        .unwrap();
    assert_eq!(trip.status, TripStatus::Requested);

    h.store.match_before_delete(driver.id);
    h.engine.delete_booking(trip.id).await.unwrap();

    assert!(h.engine.find_driver(driver.id).await.unwrap().available);
    assert!(h.store.reserved_driver_ids().await.is_empty());
    assert!(h
        .engine
        .find_booking(trip.id)
        .await
        .unwrap_err()
        .is_not_found_error());
}
