use super::Engine;

use async_trait::async_trait;

use crate::{
    api::BookingAPI,
    entities::{Booking, BookingRequest, StatusClass, Trip},
    error::Error,
    matching::{MatchStrategy, TimeContext},
};

#[async_trait]
impl BookingAPI for Engine {
    #[tracing::instrument(skip(self, request), fields(customer_id = request.customer_id))]
    async fn create_booking(
        &self,
        request: BookingRequest,
        strategy: MatchStrategy,
    ) -> Result<Booking, Error> {
        request.validate()?;

        if !self.store.customer_exists(request.customer_id).await? {
            return Err(Error::validation_error("customer does not exist"));
        }

        match strategy {
            MatchStrategy::Immediate => {
                let radius_km = self.policy.radius_km(strategy);
                let origin = request.origin.coordinates;

                let driver = self
                    .reserve_nearest(origin, TimeContext::Immediate, radius_km, None)
                    .await?
                    .ok_or_else(Error::no_driver_available_error)?;

                let trip = match self
                    .store
                    .insert_trip(request, Some(driver.id), self.clock.now())
                    .await
                {
                    Ok(trip) => trip,
                    Err(err) => {
                        self.release_driver(driver.id).await?;
                        return Err(err);
                    }
                };

                tracing::info!(trip_id = trip.id, driver_id = driver.id, "booked trip");

                Ok(Booking {
                    trip,
                    driver: Some(driver),
                })
            }
            MatchStrategy::Deferred => {
                let trip = self
                    .store
                    .insert_trip(request, None, self.clock.now())
                    .await?;

                tracing::info!(trip_id = trip.id, "stored trip, driver will be matched later");

                self.schedule_rematch(trip.id).await;

                Ok(Booking { trip, driver: None })
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn find_booking(&self, id: i64) -> Result<Trip, Error> {
        self.fetch_trip(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_bookings(
        &self,
        customer_id: i64,
        class: StatusClass,
    ) -> Result<Vec<Trip>, Error> {
        if !self.store.customer_exists(customer_id).await? {
            return Err(Error::validation_error("customer does not exist"));
        }

        self.store
            .list_trips(customer_id, class, self.clock.now())
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_booking(&self, id: i64) -> Result<Trip, Error> {
        let (trip, driver_id) = self.transition_trip(id, |trip| trip.cancel()).await?;

        self.scheduler.cancel(id).await;

        if let Some(driver_id) = driver_id {
            self.release_driver(driver_id).await?;
        }

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn start_trip(&self, id: i64) -> Result<Trip, Error> {
        let now = self.clock.now();
        let (trip, _) = self.transition_trip(id, |trip| trip.start(now)).await?;

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn complete_trip(&self, id: i64) -> Result<Trip, Error> {
        let now = self.clock.now();
        let (trip, driver_id) = self.transition_trip(id, |trip| trip.complete(now)).await?;

        if let Some(driver_id) = driver_id {
            self.release_driver(driver_id).await?;
        }

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_booking(&self, id: i64) -> Result<(), Error> {
        // the deleted row, not an earlier read, says whether a driver is held
        let trip = self
            .store
            .soft_delete_trip(id, self.clock.now())
            .await?
            .ok_or_else(|| Error::not_found_error("trip"))?;

        self.scheduler.cancel(id).await;

        if let (false, Some(driver_id)) = (trip.status.is_terminal(), trip.driver_id) {
            self.release_driver(driver_id).await?;
        }

        tracing::info!("deleted trip");

        Ok(())
    }
}
