//! # Customer Notifications
//!
//! Staff-side messages back to customers: the confirmation sent once a payment
//! has been checked, and free-form broadcasts. Sending is best effort; the
//! outcome of a confirmation is recorded on the order instead of failing it.

use crate::model::{Fulfilment, NotificationOutcome, OrderRecord};
use crate::order_actor::OrderError;
use crate::repository::OrderStore;
use crate::transport::Transport;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Template used when staff have not configured their own.
pub const DEFAULT_VERIFICATION_TEMPLATE: &str =
    "Hi {customer_name}, your order #{order_id} has been confirmed! Total: {total_price}. Thank you!";

/// Fills the order's details into a staff-written template.
///
/// Placeholders for the other fulfilment kind are left untouched.
pub fn format_verification_message(template: &str, order: &OrderRecord) -> String {
    let mut message = template
        .replace("{customer_name}", &order.customer_name)
        .replace("{order_id}", &order.order_id)
        .replace("{total_price}", &format!("${:.2}", order.total_price));

    match &order.fulfilment {
        Fulfilment::Delivery {
            delivery_location,
            delivery_time,
            ..
        } => {
            message = message
                .replace("{delivery_location}", delivery_location)
                .replace("{delivery_time}", delivery_time);
        }
        Fulfilment::Pickup {
            store_name,
            pickup_date,
            pickup_time,
            ..
        } => {
            let when = format!("{} • {}", pickup_date.format("%a, %d %b %Y"), pickup_time);
            message = message
                .replace("{pickup_store}", store_name)
                .replace("{pickup_time}", &when);
        }
    }
    message
}

/// Who a broadcast did not reach.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: Vec<(i64, String)>,
}

pub struct NotificationDispatcher {
    orders: Arc<dyn OrderStore>,
    transport: Arc<dyn Transport>,
}

impl NotificationDispatcher {
    pub fn new(orders: Arc<dyn OrderStore>, transport: Arc<dyn Transport>) -> Self {
        Self { orders, transport }
    }

    /// Sends the filled template to the order's customer and records the outcome.
    #[instrument(skip(self, template))]
    pub async fn notify_order(&self, order_id: &str, template: &str) -> Result<NotificationOutcome, OrderError> {
        let order = self
            .orders
            .get_order(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

        let message = format_verification_message(template, &order);
        let outcome = match self.transport.send_text(order.user_id, &message, None).await {
            Ok(_) => {
                info!(user_id = order.user_id, "Customer notified");
                NotificationOutcome { sent: true, error: None }
            }
            Err(e) => {
                warn!(user_id = order.user_id, error = %e, "Customer notification failed");
                NotificationOutcome {
                    sent: false,
                    error: Some(e.to_string()),
                }
            }
        };

        self.orders.record_notification(order_id, outcome.clone()).await?;
        Ok(outcome)
    }

    /// Marks the payment verified, then tells the customer.
    pub async fn confirm_payment(&self, order_id: &str, template: &str) -> Result<NotificationOutcome, OrderError> {
        self.orders.verify_payment(order_id).await?;
        self.notify_order(order_id, template).await
    }

    #[instrument(skip(self, user_ids, text), fields(recipients = user_ids.len()))]
    pub async fn broadcast(&self, user_ids: &[i64], text: &str) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for &user_id in user_ids {
            match self.transport.send_text(user_id, text, None).await {
                Ok(_) => report.sent += 1,
                Err(e) => report.failed.push((user_id, e.to_string())),
            }
        }
        info!(sent = report.sent, failed = report.failed.len(), "Broadcast finished");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cart, CartItem, CustomerProfile, PaymentStatus, Settlement};
    use crate::transport::RecordingTransport;
    use chrono::NaiveDate;

    fn record(fulfilment: Fulfilment) -> OrderRecord {
        let mut cart = Cart::default();
        cart.push(CartItem::new("Protein Acai", "Sauce: Honey", 2, 9.0));
        let customer = CustomerProfile {
            user_id: 4242,
            name: "Wei Ling".to_string(),
            handle: "weiling".to_string(),
            phone: "91234567".to_string(),
        };
        OrderRecord::new(
            "202610191830000001",
            &customer,
            fulfilment,
            &cart,
            Settlement::Screenshot("receipt.jpg".to_string()),
        )
    }

    fn delivery() -> Fulfilment {
        Fulfilment::Delivery {
            delivery_session_id: Some(12),
            delivery_location: "NUS UTown".to_string(),
            delivery_time: "Tue, 20 Oct 2026 • 09:30 PM".to_string(),
        }
    }

    #[test]
    fn template_fills_delivery_details() {
        let message = format_verification_message(
            "{customer_name}: #{order_id} {total_price} at {delivery_location}, {delivery_time} {pickup_store}",
            &record(delivery()),
        );
        assert_eq!(
            message,
            "Wei Ling: #202610191830000001 $18.00 at NUS UTown, Tue, 20 Oct 2026 • 09:30 PM {pickup_store}"
        );
    }

    #[test]
    fn template_fills_pickup_details() {
        let order = record(Fulfilment::Pickup {
            store_id: "3".to_string(),
            store_name: "Bugis Kiosk".to_string(),
            pickup_date: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
            pickup_time: "9:00 PM".to_string(),
        });
        assert_eq!(
            format_verification_message("{pickup_store} @ {pickup_time}", &order),
            "Bugis Kiosk @ Wed, 21 Oct 2026 • 9:00 PM"
        );
    }

    #[tokio::test]
    async fn confirmation_is_sent_and_recorded() {
        let (actor, orders) = crate::order_actor::new(8);
        tokio::spawn(actor.run(()));
        let transport = Arc::new(RecordingTransport::new());
        orders.create_order(&record(delivery())).await.unwrap();

        let dispatcher = NotificationDispatcher::new(Arc::new(orders.clone()), transport.clone());
        let outcome = dispatcher
            .confirm_payment("202610191830000001", DEFAULT_VERIFICATION_TEMPLATE)
            .await
            .unwrap();

        assert!(outcome.sent);
        assert_eq!(
            transport.bodies(4242),
            vec!["Hi Wei Ling, your order #202610191830000001 has been confirmed! Total: $18.00. Thank you!"]
        );
        let stored = orders.get_order("202610191830000001").await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Verified);
        assert_eq!(stored.notification, Some(outcome));
    }

    #[tokio::test]
    async fn failed_send_is_recorded_not_raised() {
        let (actor, orders) = crate::order_actor::new(8);
        tokio::spawn(actor.run(()));
        let transport = Arc::new(RecordingTransport::new());
        transport.fail_chat(4242);
        orders.create_order(&record(delivery())).await.unwrap();

        let dispatcher = NotificationDispatcher::new(Arc::new(orders.clone()), transport);
        let outcome = dispatcher
            .notify_order("202610191830000001", DEFAULT_VERIFICATION_TEMPLATE)
            .await
            .unwrap();

        assert!(!outcome.sent);
        assert!(outcome.error.unwrap().contains("unreachable"));
        assert!(matches!(
            dispatcher.notify_order("missing", "hi").await,
            Err(OrderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn broadcast_reports_unreachable_recipients() {
        let (actor, orders) = crate::order_actor::new(8);
        tokio::spawn(actor.run(()));
        let transport = Arc::new(RecordingTransport::new());
        transport.fail_chat(2);

        let dispatcher = NotificationDispatcher::new(Arc::new(orders), transport.clone());
        let report = dispatcher.broadcast(&[1, 2, 3], "Closed tonight").await;

        assert_eq!(report.sent, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, 2);
        assert_eq!(transport.bodies(3), vec!["Closed tonight"]);
    }
}
