mod booking_api;
mod customer_api;
mod driver_api;
mod helpers;
mod matching;

use std::sync::Arc;

use crate::{
    api::API,
    clock::Clock,
    db::Store,
    matching::MatchingPolicy,
    scheduler::{RematchScheduler, RetryPolicy},
};

/// Booking engine. Cheap to clone; clones share the store and the pending
/// rematch tasks.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    policy: MatchingPolicy,
    scheduler: RematchScheduler,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip(store, clock))]
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        policy: MatchingPolicy,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
            scheduler: RematchScheduler::new(retry),
        }
    }

    pub fn scheduler(&self) -> &RematchScheduler {
        &self.scheduler
    }
}

impl API for Engine {}
