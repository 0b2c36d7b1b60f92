use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Customer;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    user_id: Uuid,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<(StatusCode, Json<Customer>), Error> {
    let customer = api.register_customer(params.user_id).await?;

    Ok((StatusCode::CREATED, customer.into()))
}
