//! [`ActorEntity`] implementation for [`OrderRecord`].

use super::OrderError;
use crate::model::{NotificationOutcome, OrderRecord, OrderStatus, PaymentStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub payment_status: Option<PaymentStatus>,
    pub order_status: Option<OrderStatus>,
}

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Mark a submitted (or counter-pending) payment as verified.
    VerifyPayment,
    /// Withdraw an order that has not been completed.
    Cancel,
    RecordNotification(NotificationOutcome),
}

#[async_trait]
impl ActorEntity for OrderRecord {
    type Id = String;
    type Create = OrderRecord;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderRecord;
    type Context = ();
    type Error = OrderError;

    fn id(&self) -> String {
        self.order_id.clone()
    }

    fn from_create_params(params: OrderRecord) -> Result<Self, Self::Error> {
        if params.order_id.trim().is_empty() {
            return Err(OrderError::ValidationError("order id is empty".to_string()));
        }
        if params.items.is_empty() {
            return Err(OrderError::ValidationError(format!(
                "order {} has no items",
                params.order_id
            )));
        }
        Ok(params)
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(status) = update.payment_status {
            self.payment_status = status;
        }
        if let Some(status) = update.order_status {
            self.order_status = status;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: OrderAction, _ctx: &()) -> Result<OrderRecord, Self::Error> {
        match action {
            OrderAction::VerifyPayment => match self.payment_status {
                PaymentStatus::Submitted | PaymentStatus::Pending => {
                    self.payment_status = PaymentStatus::Verified;
                }
                from => {
                    return Err(OrderError::InvalidTransition {
                        order_id: self.order_id.clone(),
                        from,
                    })
                }
            },
            OrderAction::Cancel => {
                if self.order_status == OrderStatus::Completed {
                    return Err(OrderError::ValidationError(format!(
                        "order {} is already completed",
                        self.order_id
                    )));
                }
                self.order_status = OrderStatus::Cancelled;
            }
            OrderAction::RecordNotification(outcome) => {
                self.notification = Some(outcome);
            }
        }
        Ok(self.clone())
    }
}
