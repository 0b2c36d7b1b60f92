use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use dispatch::clock::SystemClock;
use dispatch::config::{AppConfig, StoreKind};
use dispatch::db::{MemoryStore, PgStore, Store};
use dispatch::engine::Engine;
use dispatch::error::Error;
use dispatch::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    let store: Arc<dyn Store> = match config.store {
        StoreKind::Postgres => {
            Arc::new(PgStore::new(&config.database_url, config.db_max_connections).await?)
        }
        StoreKind::Memory => {
            tracing::warn!("using the in-memory store, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let engine = Engine::new(store, Arc::new(SystemClock), config.matching, config.retry);

    serve(engine, config.bind_addr).await
}
