//! Demo run: one customer orders for tonight's delivery run against a
//! recording transport, then staff confirm the payment.
//!
//! ```bash
//! RUST_LOG=info cargo run -p supper-bot
//! ```

use actor_framework::tracing::setup_tracing;
use chrono::{Duration, Local};
use std::sync::Arc;
use supper_bot::config::BotConfig;
use supper_bot::conversation::{Inbound, Update};
use supper_bot::lifecycle::{BotSystem, RemoteBackends};
use supper_bot::menu::{default_menu, StaticMenu};
use supper_bot::model::{DeliverySession, DeliveryStatus};
use supper_bot::notify::DEFAULT_VERIFICATION_TEMPLATE;
use supper_bot::transport::RecordingTransport;
use tracing::{error, info, Instrument};

const CHAT_ID: i64 = 4242;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = BotConfig::load().map_err(|e| e.to_string())?;
    let transport = Arc::new(RecordingTransport::new());
    let remote = RemoteBackends {
        menu: Some(Arc::new(StaticMenu(default_menu()))),
        ..RemoteBackends::default()
    };
    let system = BotSystem::new(config, transport.clone(), remote);
    system.seed_from_dir().await.map_err(|e| e.to_string())?;

    let now = Local::now().naive_local();
    system
        .delivery_client
        .schedule(DeliverySession {
            id: "1".to_string(),
            location: "NUS UTown".to_string(),
            delivery_datetime: now + Duration::hours(4),
            cutoff_time: now + Duration::hours(2),
            status: DeliveryStatus::Open,
        })
        .await
        .map_err(|e| e.to_string())?;

    let script = vec![
        Inbound::from_message("/order"),
        Inbound::callback("delivery_1"),
        Inbound::text("Wei Ling"),
        Inbound::text("91234567"),
        Inbound::callback("menu_0_1"),
        Inbound::callback("menu_1_0"),
        Inbound::callback("qty_2"),
        Inbound::callback("proceed_payment"),
        Inbound::callback("confirm"),
        Inbound::Photo {
            bytes: vec![0xFF, 0xD8, 0xFF],
            content_type: "image/jpeg".to_string(),
        },
    ];

    let mut order_id = None;
    let span = tracing::info_span!("conversation", chat_id = CHAT_ID);
    async {
        for input in script {
            let update = Update::new(CHAT_ID, CHAT_ID, input).with_handle("weiling");
            match system.handle_update(update).await {
                Ok(turn) => {
                    info!(stage = %turn.stage, replies = turn.replies.len(), "Turn handled");
                    order_id = turn.order_id.or(order_id.take());
                }
                Err(e) => error!(error = %e, "Turn failed"),
            }
        }
    }
    .instrument(span)
    .await;

    for body in transport.bodies(CHAT_ID) {
        println!("--\n{body}");
    }

    if let Some(order_id) = order_id {
        match system
            .notifier()
            .confirm_payment(&order_id, DEFAULT_VERIFICATION_TEMPLATE)
            .await
        {
            Ok(outcome) => info!(%order_id, sent = outcome.sent, "Payment confirmed"),
            Err(e) => error!(%order_id, error = %e, "Payment confirmation failed"),
        }
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    info!("Demo completed");
    Ok(())
}
