use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Coordinates, Driver};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    user_id: Uuid,
    #[serde(default)]
    coordinates: Option<Coordinates>,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateLocationParams {
    coordinates: Option<Coordinates>,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateAvailabilityParams {
    available: bool,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<(StatusCode, Json<Driver>), Error> {
    let driver = api
        .register_driver(params.user_id, params.coordinates)
        .await?;

    Ok((StatusCode::CREATED, driver.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Driver>, Error> {
    let driver = api.find_driver(id).await?;

    Ok(driver.into())
}

pub async fn update_location(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    Json(params): Json<UpdateLocationParams>,
) -> Result<Json<Driver>, Error> {
    let driver = api.update_driver_location(id, params.coordinates).await?;

    Ok(driver.into())
}

pub async fn update_availability(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
    Json(params): Json<UpdateAvailabilityParams>,
) -> Result<Json<Driver>, Error> {
    let driver = api.set_driver_availability(id, params.available).await?;

    Ok(driver.into())
}
