use super::helpers::validate_location;
use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::DriverAPI,
    entities::{Coordinates, Driver},
    error::Error,
};

#[async_trait]
impl DriverAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn register_driver(
        &self,
        user_id: Uuid,
        coordinates: Option<Coordinates>,
    ) -> Result<Driver, Error> {
        validate_location(&coordinates)?;

        let driver = self.store.insert_driver(user_id, coordinates).await?;
        tracing::info!(driver_id = driver.id, "registered driver");

        Ok(driver)
    }

    #[tracing::instrument(skip(self))]
    async fn find_driver(&self, id: i64) -> Result<Driver, Error> {
        self.fetch_driver(id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_driver_location(
        &self,
        id: i64,
        coordinates: Option<Coordinates>,
    ) -> Result<Driver, Error> {
        validate_location(&coordinates)?;

        self.store
            .update_driver_location(id, coordinates)
            .await?
            .ok_or_else(|| Error::not_found_error("driver"))
    }

    #[tracing::instrument(skip(self))]
    async fn set_driver_availability(&self, id: i64, available: bool) -> Result<Driver, Error> {
        self.store
            .set_driver_available(id, available)
            .await?
            .ok_or_else(|| Error::not_found_error("driver"))
    }
}
