use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::entities::{Booking, BookingRequest, StatusClass, Trip};
use crate::error::Error;
use crate::matching::MatchStrategy;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct ListParams {
    customer_id: i64,
    status: StatusClass,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), Error> {
    let booking = api
        .create_booking(request, MatchStrategy::Immediate)
        .await?;

    Ok((StatusCode::CREATED, booking.into()))
}

pub async fn create_deferred(
    Extension(api): Extension<DynAPI>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Trip>), Error> {
    let trip = api.create_deferred_booking(request).await?;

    Ok((StatusCode::CREATED, trip.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Trip>, Error> {
    let trip = api.find_booking(id).await?;

    Ok(trip.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Trip>>, Error> {
    let trips = api.list_bookings(params.customer_id, params.status).await?;

    Ok(trips.into())
}

pub async fn cancel(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Trip>, Error> {
    let trip = api.cancel_booking(id).await?;

    Ok(trip.into())
}

pub async fn start(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Trip>, Error> {
    let trip = api.start_trip(id).await?;

    Ok(trip.into())
}

pub async fn complete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<Json<Trip>, Error> {
    let trip = api.complete_trip(id).await?;

    Ok(trip.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Error> {
    api.delete_booking(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
