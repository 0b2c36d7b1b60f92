use super::Engine;

use crate::{
    entities::{Coordinates, Driver, TripStatus},
    error::Error,
    matching::{rank_drivers, MatchStrategy, TimeContext},
    scheduler::RematchOutcome,
};

impl Engine {
    /// Reserves the nearest eligible driver. Candidates lost to a concurrent
    /// reservation are skipped in favour of the next one in line.
    #[tracing::instrument(skip(self))]
    pub(super) async fn reserve_nearest(
        &self,
        origin: Coordinates,
        context: TimeContext,
        radius_km: f64,
        exclude_trip: Option<i64>,
    ) -> Result<Option<Driver>, Error> {
        let candidates = self.store.candidate_drivers(exclude_trip).await?;
        let ranked = rank_drivers(origin, &context, radius_km, &candidates);

        tracing::info!(
            candidates = candidates.len(),
            eligible = ranked.len(),
            "ranked drivers"
        );

        for candidate in ranked {
            match self.store.reserve_driver(candidate.driver.id).await {
                Ok(driver) => {
                    tracing::info!(
                        driver_id = driver.id,
                        distance_km = candidate.distance_km,
                        "reserved driver"
                    );
                    return Ok(Some(driver));
                }
                Err(err) if err.is_reservation_conflict_error() => {
                    tracing::info!(
                        driver_id = candidate.driver.id,
                        "driver taken by a concurrent booking, trying next candidate"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(None)
    }

    /// One deferred matching attempt for a trip. Safe to run more than once:
    /// a trip that already has a driver, or is closed, is left untouched.
    #[tracing::instrument(skip(self))]
    pub async fn rematch(&self, trip_id: i64) -> Result<RematchOutcome, Error> {
        let trip = match self.store.find_trip(trip_id).await? {
            Some(trip) if trip.is_awaiting_driver() => trip,
            _ => return Ok(RematchOutcome::Skipped),
        };

        let strategy = MatchStrategy::Deferred;
        let context = self.policy.time_context(strategy, trip.scheduled_time);
        let radius_km = self.policy.radius_km(strategy);

        let driver = match self
            .reserve_nearest(trip.origin.coordinates, context, radius_km, Some(trip.id))
            .await?
        {
            Some(driver) => driver,
            None => return Ok(RematchOutcome::NoDriver),
        };

        let mut matched = trip;
        let assigned = match matched.assign_driver(driver.id) {
            Ok(()) => self.store.update_trip(&matched, TripStatus::Requested).await,
            Err(err) => Err(err),
        };

        match assigned {
            Ok(true) => Ok(RematchOutcome::Matched {
                driver_id: driver.id,
            }),
            Ok(false) => {
                tracing::info!("trip moved on before the driver was attached");
                self.release_driver(driver.id).await?;
                Ok(RematchOutcome::Skipped)
            }
            Err(err) => {
                self.release_driver(driver.id).await?;
                Err(err)
            }
        }
    }

    pub(super) async fn schedule_rematch(&self, trip_id: i64) {
        let engine = self.clone();

        self.scheduler
            .schedule(trip_id, move || {
                let engine = engine.clone();
                async move { engine.rematch(trip_id).await }
            })
            .await;
    }
}
