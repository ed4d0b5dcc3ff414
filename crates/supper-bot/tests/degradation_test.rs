mod common;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use common::{bodies_of, Harness};
use std::sync::Arc;
use supper_bot::conversation::Stage;
use supper_bot::delivery_actor::DeliveryError;
use supper_bot::lifecycle::RemoteBackends;
use supper_bot::menu::{MenuError, MenuSource};
use supper_bot::model::{
    CartItem, CustomerProfile, DeliverySession, MenuGroup, NotificationOutcome, OrderRecord, PaymentStatus,
};
use supper_bot::order_actor::{OrderError, OrderUpdate};
use supper_bot::receipts::{ImageStore, StorageError};
use supper_bot::repository::{DeliveryDirectory, OrderStore, UserDirectory};
use supper_bot::user_actor::UserError;

// --- Remote fakes ---

struct OfflineImages;

#[async_trait]
impl ImageStore for OfflineImages {
    async fn store(&self, _id: &str, _bytes: &[u8], _content_type: &str) -> Result<String, StorageError> {
        Err(StorageError::Unavailable("bucket unreachable".to_string()))
    }
}

/// Either refuses records outright or fails every call.
struct RemoteOrders {
    declines: bool,
}

impl RemoteOrders {
    fn offline() -> OrderError {
        OrderError::DatabaseError("connection refused".to_string())
    }
}

#[async_trait]
impl OrderStore for RemoteOrders {
    async fn create_order(&self, _record: &OrderRecord) -> Result<bool, OrderError> {
        if self.declines {
            Ok(false)
        } else {
            Err(Self::offline())
        }
    }

    async fn get_order(&self, _order_id: &str) -> Result<Option<OrderRecord>, OrderError> {
        Err(Self::offline())
    }

    async fn update_order(&self, _order_id: &str, _update: OrderUpdate) -> Result<OrderRecord, OrderError> {
        Err(Self::offline())
    }

    async fn verify_payment(&self, _order_id: &str) -> Result<OrderRecord, OrderError> {
        Err(Self::offline())
    }

    async fn cancel_order(&self, _order_id: &str) -> Result<OrderRecord, OrderError> {
        Err(Self::offline())
    }

    async fn record_notification(
        &self,
        _order_id: &str,
        _outcome: NotificationOutcome,
    ) -> Result<(), OrderError> {
        Err(Self::offline())
    }
}

struct DownDeliveries;

#[async_trait]
impl DeliveryDirectory for DownDeliveries {
    async fn probe(&self) -> bool {
        false
    }

    async fn active_sessions(&self, _now: NaiveDateTime) -> Result<Vec<DeliverySession>, DeliveryError> {
        Err(DeliveryError::DatabaseError("down".to_string()))
    }

    async fn find(&self, _id: &str) -> Result<Option<DeliverySession>, DeliveryError> {
        Err(DeliveryError::DatabaseError("down".to_string()))
    }
}

/// Reachable, but every lookup and write fails.
struct FlakyUsers;

#[async_trait]
impl UserDirectory for FlakyUsers {
    async fn find(&self, _user_id: i64) -> Result<Option<CustomerProfile>, UserError> {
        Err(UserError::DatabaseError("timeout".to_string()))
    }

    async fn save(&self, _profile: CustomerProfile) -> Result<(), UserError> {
        Err(UserError::DatabaseError("timeout".to_string()))
    }
}

struct BrokenMenu;

#[async_trait]
impl MenuSource for BrokenMenu {
    async fn menu_groups(&self) -> Result<Vec<MenuGroup>, MenuError> {
        Err(MenuError::Unavailable("menu table missing".to_string()))
    }
}

// --- Tests ---

#[tokio::test]
async fn test_receipt_kept_locally_when_image_store_is_down() {
    let bot = Harness::with(
        |_| {},
        RemoteBackends {
            images: Some(Arc::new(OfflineImages)),
            ..Default::default()
        },
    );
    bot.order_to_summary().await;
    let order_id = bot.press("confirm").await.order_id.expect("No order id");

    let done = bot.upload_receipt().await;

    assert_eq!(done.stage, Stage::Idle);
    assert!(bot.last_body().contains("Order Complete"));
    let order = bot
        .system
        .order_client
        .get_order(&order_id)
        .await
        .expect("Failed to get order")
        .expect("Order not stored");
    let local = bot.dir.path().join("receipts").join(format!("{order_id}.jpg"));
    assert_eq!(order.payment_screenshot_url, local.display().to_string());
    assert_eq!(order.payment_status, PaymentStatus::Submitted);
}

#[tokio::test]
async fn test_order_store_failure_apologises_with_order_id() {
    let bot = Harness::with(
        |_| {},
        RemoteBackends {
            orders: Some(Arc::new(RemoteOrders { declines: false })),
            ..Default::default()
        },
    );
    bot.order_to_summary().await;
    let order_id = bot.press("confirm").await.order_id.expect("No order id");

    let done = bot.upload_receipt().await;

    assert_eq!(done.stage, Stage::Idle);
    let last = bot.last_body();
    assert!(last.starts_with("⚠️ Error processing order."));
    assert!(last.contains(&order_id));
    // The receipt is still on disk for staff to reconcile
    assert!(bot.dir.path().join("receipts").join(format!("{order_id}.jpg")).exists());
}

#[tokio::test]
async fn test_declined_order_keeps_receipt_and_says_so() {
    let bot = Harness::with(
        |_| {},
        RemoteBackends {
            orders: Some(Arc::new(RemoteOrders { declines: true })),
            ..Default::default()
        },
    );
    bot.order_to_summary().await;
    let order_id = bot.press("confirm").await.order_id.expect("No order id");

    let done = bot.upload_receipt().await;

    assert_eq!(done.stage, Stage::Idle);
    let last = bot.last_body();
    assert!(last.contains("issue logging your order"));
    assert!(last.contains("payment screenshot has been saved"));
    assert!(last.contains(&order_id));
}

#[tokio::test]
async fn test_unavailable_delivery_tier_falls_back_to_local() {
    let bot = Harness::with(
        |_| {},
        RemoteBackends {
            deliveries: Some(Arc::new(DownDeliveries)),
            ..Default::default()
        },
    );
    bot.schedule_delivery("1").await;

    assert_eq!(bot.say("/order").await.stage, Stage::SelectDelivery);
    assert_eq!(bot.press("delivery_1").await.stage, Stage::RegisterName);
}

#[tokio::test]
async fn test_failing_profile_tier_still_registers_locally() {
    let bot = Harness::with(
        |_| {},
        RemoteBackends {
            users: Some(Arc::new(FlakyUsers)),
            ..Default::default()
        },
    );
    bot.order_to_summary().await;

    // The local tier took the write even though the remote one refused it
    let profile = bot
        .system
        .user_client
        .find(common::CHAT)
        .await
        .expect("Failed to find profile")
        .expect("Profile not saved locally");
    assert_eq!(profile.phone, "91234567");
}

#[tokio::test]
async fn test_broken_menu_source_serves_built_in_menu() {
    let bot = Harness::with(
        |_| {},
        RemoteBackends {
            menu: Some(Arc::new(BrokenMenu)),
            ..Default::default()
        },
    );
    bot.register_customer().await;
    bot.schedule_delivery("1").await;
    bot.say("/order").await;

    let turn = bot.press("delivery_1").await;
    assert_eq!(turn.stage, Stage::MenuSelection);
    assert!(bodies_of(&turn)[0].starts_with("Menu Flavors:"));

    bot.press("menu_0_2").await;
    bot.press("menu_1_1").await;
    let turn = bot.press("qty_1").await;
    assert_eq!(
        turn.cart.items(),
        &[CartItem::new("Vegan Acai", "Sauce Options: Peanut Butter", 1, 8.5)]
    );
}
