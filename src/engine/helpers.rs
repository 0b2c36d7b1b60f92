use super::Engine;

use crate::{
    entities::{Coordinates, Driver, Trip},
    error::Error,
};

impl Engine {
    #[tracing::instrument(skip(self))]
    pub(super) async fn fetch_trip(&self, id: i64) -> Result<Trip, Error> {
        self.store
            .find_trip(id)
            .await?
            .ok_or_else(|| Error::not_found_error("trip"))
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn fetch_driver(&self, id: i64) -> Result<Driver, Error> {
        self.store
            .find_driver(id)
            .await?
            .ok_or_else(|| Error::not_found_error("driver"))
    }

    /// Applies `change` to the latest stored version of the trip and writes it
    /// back only if nobody moved the trip in between, reloading otherwise.
    /// Every status change goes forward, so this settles after a few rounds.
    #[tracing::instrument(skip(self, change))]
    pub(super) async fn transition_trip<T, F>(&self, id: i64, change: F) -> Result<(Trip, T), Error>
    where
        F: Fn(&mut Trip) -> Result<T, Error> + Send + Sync,
        T: Send,
    {
        loop {
            let trip = self.fetch_trip(id).await?;
            let expected = trip.status;

            let mut next = trip;
            let output = change(&mut next)?;

            if self.store.update_trip(&next, expected).await? {
                tracing::info!(from = %expected, to = %next.status, "trip transitioned");
                return Ok((next, output));
            }

            tracing::info!("trip changed while transitioning, reloading");
        }
    }

    pub(super) async fn release_driver(&self, driver_id: i64) -> Result<(), Error> {
        self.store.release_driver(driver_id).await?;
        tracing::info!(driver_id, "released driver");

        Ok(())
    }
}

pub(super) fn validate_location(coordinates: &Option<Coordinates>) -> Result<(), Error> {
    match coordinates {
        Some(coordinates) => coordinates.validate("coordinates"),
        None => Ok(()),
    }
}
