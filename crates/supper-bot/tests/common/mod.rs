#![allow(dead_code)]

use chrono::{Duration, Local};
use std::path::Path;
use std::sync::Arc;
use supper_bot::config::BotConfig;
use supper_bot::conversation::{Inbound, Stage, Turn, Update};
use supper_bot::lifecycle::{BotSystem, RemoteBackends};
use supper_bot::menu::StaticMenu;
use supper_bot::model::{CustomerProfile, DeliverySession, DeliveryStatus, MenuGroup, MenuOption};
use supper_bot::transport::RecordingTransport;
use tempfile::TempDir;

pub const CHAT: i64 = 4242;

/// Two groups: a priced base and a sauce.
pub fn test_menu() -> Vec<MenuGroup> {
    vec![
        MenuGroup::new(
            "base",
            "Base",
            vec![
                MenuOption::priced("Classic Acai", 8.0),
                MenuOption::priced("Protein Acai", 9.0),
            ],
        ),
        MenuGroup::new(
            "sauce",
            "Sauce",
            vec![MenuOption::label("Honey"), MenuOption::label("Nutella")],
        ),
    ]
}

pub fn config_in(dir: &Path) -> BotConfig {
    let mut config = BotConfig::default();
    config.data.dir = dir.to_path_buf();
    config.payment.qr_image_path = dir.join("qr.png");
    config.payment.receipt_dir = dir.join("receipts");
    config
}

pub struct Harness {
    pub system: BotSystem,
    pub transport: Arc<RecordingTransport>,
    pub dir: TempDir,
}

impl Harness {
    pub fn start() -> Self {
        Self::with(|_| {}, RemoteBackends::default())
    }

    pub fn with(tune: impl FnOnce(&mut BotConfig), mut remote: RemoteBackends) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = config_in(dir.path());
        tune(&mut config);
        if remote.menu.is_none() {
            remote.menu = Some(Arc::new(StaticMenu(test_menu())));
        }
        let transport = Arc::new(RecordingTransport::new());
        let system = BotSystem::new(config, transport.clone(), remote);
        Self {
            system,
            transport,
            dir,
        }
    }

    pub async fn schedule_delivery(&self, id: &str) {
        let now = Local::now().naive_local();
        self.system
            .delivery_client
            .schedule(DeliverySession {
                id: id.to_string(),
                location: "NUS UTown".to_string(),
                delivery_datetime: now + Duration::hours(4),
                cutoff_time: now + Duration::hours(2),
                status: DeliveryStatus::Open,
            })
            .await
            .expect("Failed to schedule delivery");
    }

    pub async fn register_customer(&self) {
        self.system
            .user_client
            .save_profile(CustomerProfile {
                user_id: CHAT,
                name: "Wei Ling".to_string(),
                handle: "weiling".to_string(),
                phone: "91234567".to_string(),
            })
            .await
            .expect("Failed to save profile");
    }

    pub async fn send_as(&self, chat_id: i64, input: Inbound) -> Turn {
        self.system
            .handle_update(Update::new(chat_id, chat_id, input).with_handle("weiling"))
            .await
            .expect("Turn failed")
    }

    pub async fn send(&self, input: Inbound) -> Turn {
        self.send_as(CHAT, input).await
    }

    /// Typed text; `/...` becomes a command.
    pub async fn say(&self, text: &str) -> Turn {
        self.send(Inbound::from_message(text)).await
    }

    pub async fn press(&self, data: &str) -> Turn {
        self.send(Inbound::callback(data)).await
    }

    pub async fn upload_receipt(&self) -> Turn {
        self.send(Inbound::Photo {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            content_type: "image/jpeg".to_string(),
        })
        .await
    }

    /// New customer: delivery `1`, registration, Protein Acai with Honey × 2,
    /// up to the order summary.
    pub async fn order_to_summary(&self) -> Turn {
        self.schedule_delivery("1").await;
        self.say("/order").await;
        self.press("delivery_1").await;
        self.say("Wei Ling").await;
        self.say("91234567").await;
        self.press("menu_0_1").await;
        self.press("menu_1_0").await;
        self.press("qty_2").await;
        let turn = self.press("proceed_payment").await;
        assert_eq!(turn.stage, Stage::Confirm);
        turn
    }

    pub fn bodies(&self) -> Vec<String> {
        self.transport.bodies(CHAT)
    }

    pub fn last_body(&self) -> String {
        self.bodies().pop().unwrap_or_default()
    }
}

pub fn bodies_of(turn: &Turn) -> Vec<&str> {
    turn.replies.iter().map(|reply| reply.body()).collect()
}
