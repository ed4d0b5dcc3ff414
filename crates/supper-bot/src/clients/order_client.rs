//! # Order Client
//!
//! High-level API for the Order actor and the local [`OrderStore`].

use crate::model::{NotificationOutcome, OrderRecord};
use crate::order_actor::{OrderAction, OrderError, OrderUpdate};
use crate::repository::OrderStore;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<OrderRecord>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<OrderRecord>) -> Self {
        Self { inner }
    }

    fn classify(e: FrameworkError) -> OrderError {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::AlreadyExists(id) => OrderError::AlreadyExists(id),
            other => super::entity_error::<OrderError>(other).unwrap_or_else(Self::map_error),
        }
    }

    async fn act(&self, order_id: &str, action: OrderAction) -> Result<OrderRecord, OrderError> {
        self.inner
            .perform_action(order_id.to_string(), action)
            .await
            .map_err(Self::classify)
    }
}

#[async_trait]
impl ActorClient<OrderRecord> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<OrderRecord> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::ActorCommunicationError(e.to_string())
    }
}

#[async_trait]
impl OrderStore for OrderClient {
    /// A duplicate order id is declined, not overwritten.
    #[instrument(skip(self, record), fields(order_id = %record.order_id))]
    async fn create_order(&self, record: &OrderRecord) -> Result<bool, OrderError> {
        debug!("Sending request");
        match self.inner.create(record.clone()).await.map_err(Self::classify) {
            Ok(_) => {
                info!(total = record.total_price, "Order stored");
                Ok(true)
            }
            Err(OrderError::AlreadyExists(id)) => {
                warn!(order_id = %id, "Order id already taken");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn get_order(&self, order_id: &str) -> Result<Option<OrderRecord>, OrderError> {
        self.get(order_id.to_string()).await
    }

    #[instrument(skip(self))]
    async fn update_order(&self, order_id: &str, update: OrderUpdate) -> Result<OrderRecord, OrderError> {
        debug!("Sending request");
        self.inner
            .update(order_id.to_string(), update)
            .await
            .map_err(Self::classify)
    }

    async fn verify_payment(&self, order_id: &str) -> Result<OrderRecord, OrderError> {
        self.act(order_id, OrderAction::VerifyPayment).await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<OrderRecord, OrderError> {
        self.act(order_id, OrderAction::Cancel).await
    }

    async fn record_notification(
        &self,
        order_id: &str,
        outcome: NotificationOutcome,
    ) -> Result<(), OrderError> {
        self.act(order_id, OrderAction::RecordNotification(outcome))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentStatus;
    use actor_framework::mock::MockClient;

    #[tokio::test]
    async fn duplicate_order_id_is_declined() {
        let mut mock = MockClient::<OrderRecord>::new();
        mock.expect_create()
            .return_err(FrameworkError::AlreadyExists("202610191830000001".to_string()));
        mock.expect_action()
            .return_err(FrameworkError::EntityError(Box::new(OrderError::InvalidTransition {
                order_id: "202610191830000001".to_string(),
                from: PaymentStatus::Rejected,
            })));
        let client = OrderClient::new(mock.client());
        let record = sample_record();

        assert_eq!(client.create_order(&record).await, Ok(false));
        // The entity's own error comes back intact
        assert!(matches!(
            client.verify_payment(&record.order_id).await,
            Err(OrderError::InvalidTransition { from: PaymentStatus::Rejected, .. })
        ));
        mock.verify();
    }

    fn sample_record() -> OrderRecord {
        use crate::model::{Cart, CartItem, CustomerProfile, Fulfilment, Settlement};

        let mut cart = Cart::default();
        cart.push(CartItem::new("Classic Acai", "", 1, 8.0));
        OrderRecord::new(
            "202610191830000001",
            &CustomerProfile {
                user_id: 1,
                name: "Ana".to_string(),
                handle: String::new(),
                phone: "91234567".to_string(),
            },
            Fulfilment::Delivery {
                delivery_session_id: None,
                delivery_location: "Clementi".to_string(),
                delivery_time: "Tue, 20 Oct 2026 • 09:00 PM".to_string(),
            },
            &cart,
            Settlement::AtCounter,
        )
    }
}
