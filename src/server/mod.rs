mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::server::handlers::{bookings, customers, drivers};
use crate::{api::API, error::Error};

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/bookings", post(bookings::create).get(bookings::list))
        .route("/bookings/deferred", post(bookings::create_deferred))
        .route("/bookings/:id", get(bookings::find).delete(bookings::delete))
        .route("/bookings/:id/cancel", patch(bookings::cancel))
        .route("/bookings/:id/start", patch(bookings::start))
        .route("/bookings/:id/complete", patch(bookings::complete))
        .route("/drivers", post(drivers::create))
        .route("/drivers/:id", get(drivers::find))
        .route("/drivers/:id/location", patch(drivers::update_location))
        .route("/drivers/:id/availability", patch(drivers::update_availability))
        .route("/customers", post(customers::create))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server stopped: {}", err);
            Error::unexpected_error()
        })
}
