use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{api::CustomerAPI, entities::Customer, error::Error};

#[async_trait]
impl CustomerAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn register_customer(&self, user_id: Uuid) -> Result<Customer, Error> {
        let customer = self.store.insert_customer(user_id).await?;
        tracing::info!(customer_id = customer.id, "registered customer");

        Ok(customer)
    }
}
