//! Payment intake: asking for payment, taking the receipt, committing the order.
//!
//! Leaving the payment stage always clears the conversation, whether or not
//! the order store accepted the record.

use super::context::Destination;
use super::flow::Flow;
use super::render;
use super::stage::Stage;
use crate::model::{CustomerProfile, OrderRecord, Settlement};
use crate::transport::Outbound;
use tracing::{error, info, warn};

/// How the commit went, from the customer's point of view.
enum Commit {
    Stored,
    Declined,
    Failed,
}

impl Flow<'_> {
    pub(crate) async fn request_payment(&mut self) {
        self.ctx.stage = Stage::Payment;
        let message = render::payment_request(self.ctx.cart.total_quantity(), self.ctx.cart.total_price());
        let qr = &self.services.config.payment.qr_image_path;

        if tokio::fs::try_exists(qr).await.unwrap_or(false) {
            self.say(Outbound::Image {
                source: qr.display().to_string(),
                caption: message,
            });
        } else {
            warn!(path = %qr.display(), "Payment QR image missing");
            self.say(Outbound::text(format!("{message}\n\n{}", render::QR_MISSING_NOTE)));
        }
        self.say(render::upload_prompt());
    }

    pub(crate) async fn receive_receipt(&mut self, bytes: &[u8], content_type: &str) {
        let order_id = self
            .ctx
            .order_id
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        for ack in render::screenshot_received() {
            self.say(ack);
        }

        let reference = self
            .services
            .receipts
            .archive(&order_id, bytes, content_type)
            .await;
        let outcome = self.commit(&order_id, Settlement::Screenshot(reference)).await;

        let reply = match (outcome, self.ctx.destination.as_ref()) {
            (Commit::Stored, Some(Destination::Pickup { store, slot })) => {
                render::pickup_order_complete(&order_id, store, slot, false)
            }
            (Commit::Stored, _) => render::delivery_order_complete(&order_id),
            (Commit::Declined, _) => render::order_not_logged(&order_id, true),
            (Commit::Failed, _) => render::order_failed(&order_id),
        };
        self.say(reply);
        self.ctx.clear();
    }

    pub(crate) async fn settle_at_counter(&mut self) {
        let order_id = self
            .ctx
            .order_id
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        self.say(render::pay_at_counter_chosen());

        let outcome = self.commit(&order_id, Settlement::AtCounter).await;
        let reply = match (outcome, self.ctx.destination.as_ref()) {
            (Commit::Stored, Some(Destination::Pickup { store, slot })) => {
                render::pickup_order_complete(&order_id, store, slot, true)
            }
            (Commit::Stored, _) => render::delivery_order_complete(&order_id),
            (Commit::Declined, _) => render::order_not_logged(&order_id, false),
            (Commit::Failed, _) => render::order_failed(&order_id),
        };
        self.say(reply);
        self.ctx.clear();
    }

    /// Builds the record from the context and hands it to the order store.
    async fn commit(&self, order_id: &str, settlement: Settlement) -> Commit {
        let Some(destination) = self.ctx.destination.as_ref() else {
            error!(%order_id, "No delivery or pickup chosen at commit");
            return Commit::Failed;
        };

        let customer = self.ctx.customer.clone().unwrap_or_else(|| CustomerProfile {
            user_id: self.update.user_id,
            name: "Unknown".to_string(),
            handle: self.update.handle.clone(),
            phone: "Unknown".to_string(),
        });
        let record = OrderRecord::new(
            order_id,
            &customer,
            destination.fulfilment(),
            &self.ctx.cart,
            settlement,
        );

        if let Some(known) = &self.ctx.customer {
            if let Err(e) = self.services.users.save(known.clone()).await {
                warn!(%order_id, error = %e, "Profile not refreshed at checkout");
            }
        }

        match self.services.orders.create_order(&record).await {
            Ok(true) => {
                info!(
                    %order_id,
                    items = record.items.len(),
                    total = record.total_price,
                    payment_status = ?record.payment_status,
                    "Order committed"
                );
                Commit::Stored
            }
            Ok(false) => {
                warn!(%order_id, "Order store declined the record");
                Commit::Declined
            }
            Err(e) => {
                error!(%order_id, error = %e, "Order store failed");
                Commit::Failed
            }
        }
    }
}
