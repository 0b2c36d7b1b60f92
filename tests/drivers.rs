mod common;

use uuid::Uuid;

use common::harness;
use dispatch::api::{CustomerAPI, DriverAPI};
use dispatch::entities::Coordinates;

#[tokio::test]
async fn registered_drivers_start_available() {
    let h = harness();
    let user_id = Uuid::new_v4();

    let driver = h
        .engine
        .register_driver(user_id, Some(Coordinates::new(40.4, -3.7)))
        .await
        .unwrap();

    assert!(driver.available);
    assert_eq!(driver.user_id, user_id);
    assert_eq!(h.engine.find_driver(driver.id).await.unwrap(), driver);
}

#[tokio::test]
async fn locations_are_validated_and_can_be_cleared() {
    let h = harness();
    let driver = h
        .engine
        .register_driver(Uuid::new_v4(), None)
        .await
        .unwrap();
    assert_eq!(driver.coordinates, None);

    let err = h
        .engine
        .update_driver_location(driver.id, Some(Coordinates::new(91.0, 0.0)))
        .await
        .unwrap_err();
    assert!(err.is_validation_error());

    let located = h
        .engine
        .update_driver_location(driver.id, Some(Coordinates::new(10.0, 20.0)))
        .await
        .unwrap();
    assert_eq!(located.coordinates, Some(Coordinates::new(10.0, 20.0)));

    let cleared = h
        .engine
        .update_driver_location(driver.id, None)
        .await
        .unwrap();
    assert_eq!(cleared.coordinates, None);
}

#[tokio::test]
async fn unknown_drivers_are_not_found() {
    let h = harness();

    assert!(h.engine.find_driver(42).await.unwrap_err().is_not_found_error());
    assert!(h
        .engine
        .set_driver_availability(42, true)
        .await
        .unwrap_err()
        .is_not_found_error());
    assert!(h
        .engine
        .update_driver_location(42, None)
        .await
        .unwrap_err()
        .is_not_found_error());
}

#[tokio::test]
async fn availability_can_be_toggled() {
    let h = harness();
    let driver = h.driver_at(Coordinates::new(1.0, 1.0)).await;

    let off = h
        .engine
        .set_driver_availability(driver.id, false)
        .await
        .unwrap();
    assert!(!off.available);

    let on = h
        .engine
        .set_driver_availability(driver.id, true)
        .await
        .unwrap();
    assert!(on.available);
}

#[tokio::test]
async fn one_customer_profile_per_user() {
    let h = harness();
    let user_id = Uuid::new_v4();

    let customer = h.engine.register_customer(user_id).await.unwrap();
    assert_eq!(customer.user_id, user_id);

    assert!(h.engine.register_customer(user_id).await.is_err());
}
