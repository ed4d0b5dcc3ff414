//! # System Lifecycle & Orchestration
//!
//! [`BotSystem`] creates the local resource actors and the conversation hub,
//! wires them together and shuts them down again.
//!
//! Wiring follows the framework's late binding: every actor is created first,
//! then spawned with its context. The hub's context is the [`Services`] bundle,
//! which holds the repository seams. Each seam is the local actor's client, or
//! a [`Tiered`] pair when a remote backend was supplied for it:
//!
//! ```rust,ignore
//! let (user_actor, user_client) = user_actor::new(buffer);
//! let (hub, sessions) = SessionHub::<ConversationSession>::new(buffer, idle_timeout);
//!
//! tokio::spawn(user_actor.run(()));
//! tokio::spawn(hub.run(services)); // services hold user_client (maybe tiered)
//! ```
//!
//! ## Shutdown
//!
//! The hub holds clones of the actor clients inside [`Services`], so it has to
//! stop first: dropping the session client ends the hub, which waits for its
//! workers and drops the services. Dropping the remaining clients then closes
//! every actor's channel.

use crate::branding::{BrandingProvider, BrandingSource, JsonBrandingFile};
use crate::clients::{DeliveryClient, OrderClient, PickupClient, UserClient};
use crate::config::BotConfig;
use crate::conversation::{
    render, ConversationError, ConversationSession, OrderIdGenerator, Services, Turn, Update,
};
use crate::menu::{JsonMenuFile, MenuProvider, MenuSource};
use crate::model::{CustomerProfile, DeliverySession, PickupStore};
use crate::notify::NotificationDispatcher;
use crate::receipts::{ImageStore, LocalReceiptStore, ReceiptArchive};
use crate::repository::{DeliveryDirectory, OrderStore, PickupDirectory, Tiered, UserDirectory};
use crate::transport::Transport;
use actor_framework::{FrameworkError, SessionClient, SessionHub};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub const DELIVERIES_FILE: &str = "deliveries.json";
pub const USERS_FILE: &str = "users.json";
pub const PICKUP_STORES_FILE: &str = "pickup_stores.json";
pub const MENU_FILE: &str = "menu.json";
pub const BRANDING_FILE: &str = "branding.json";

#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),
    #[error("Conversation hub error: {0}")]
    Hub(FrameworkError),
    #[error("Seeding {file} failed: {reason}")]
    Seed { file: &'static str, reason: String },
    #[error("Task failed during shutdown: {0}")]
    Shutdown(String),
}

impl From<FrameworkError> for BotError {
    fn from(e: FrameworkError) -> Self {
        match crate::clients::entity_error::<ConversationError>(e) {
            Ok(conversation) => BotError::Conversation(conversation),
            Err(other) => BotError::Hub(other),
        }
    }
}

/// Optional remote primaries. Anything left `None` is served locally only.
#[derive(Default)]
pub struct RemoteBackends {
    pub users: Option<Arc<dyn UserDirectory>>,
    pub deliveries: Option<Arc<dyn DeliveryDirectory>>,
    pub pickups: Option<Arc<dyn PickupDirectory>>,
    pub orders: Option<Arc<dyn OrderStore>>,
    pub images: Option<Arc<dyn ImageStore>>,
    pub menu: Option<Arc<dyn MenuSource>>,
    pub branding: Option<Arc<dyn BrandingSource>>,
}

/// How many records each seed file contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub deliveries: usize,
    pub users: usize,
    pub pickup_stores: usize,
}

/// `users.json` is keyed by user id.
#[derive(Deserialize)]
struct SeedUser {
    name: String,
    #[serde(default)]
    handle: String,
    #[serde(default)]
    phone: String,
}

pub struct BotSystem {
    pub user_client: UserClient,
    pub delivery_client: DeliveryClient,
    pub pickup_client: PickupClient,
    pub order_client: OrderClient,
    sessions: SessionClient<ConversationSession>,
    menu: Arc<MenuProvider>,
    branding: Arc<BrandingProvider>,
    notifier: NotificationDispatcher,
    transport: Arc<dyn Transport>,
    config: BotConfig,
    /// Hub first, then the actors it depends on.
    handles: Vec<JoinHandle<()>>,
}

impl BotSystem {
    /// Spawns every actor and the conversation hub. Must be called inside a
    /// tokio runtime.
    pub fn new(config: BotConfig, transport: Arc<dyn Transport>, remote: RemoteBackends) -> Self {
        let buffer = config.conversation.mailbox_buffer.max(1);

        // 1. Create actors (no dependencies yet)
        let (user_actor, user_client) = crate::user_actor::new(buffer);
        let (delivery_actor, delivery_client) = crate::delivery_actor::new(buffer);
        let (pickup_actor, pickup_client) = crate::pickup_actor::new(buffer);
        let (order_actor, order_client) = crate::order_actor::new(buffer);
        let (hub, sessions) =
            SessionHub::<ConversationSession>::new(buffer, config.conversation.idle_timeout());

        // 2. Put remote primaries in front of the local tiers
        let local_users: Arc<dyn UserDirectory> = Arc::new(user_client.clone());
        let users: Arc<dyn UserDirectory> = match remote.users {
            Some(primary) => Arc::new(Tiered::new(primary, local_users)),
            None => local_users,
        };
        let local_deliveries: Arc<dyn DeliveryDirectory> = Arc::new(delivery_client.clone());
        let deliveries: Arc<dyn DeliveryDirectory> = match remote.deliveries {
            Some(primary) => Arc::new(Tiered::new(primary, local_deliveries)),
            None => local_deliveries,
        };
        let local_pickups: Arc<dyn PickupDirectory> = Arc::new(pickup_client.clone());
        let pickups: Arc<dyn PickupDirectory> = match remote.pickups {
            Some(primary) => Arc::new(Tiered::new(primary, local_pickups)),
            None => local_pickups,
        };
        let orders: Arc<dyn OrderStore> = match remote.orders {
            Some(remote_orders) => remote_orders,
            None => Arc::new(order_client.clone()),
        };

        let menu_source = remote
            .menu
            .unwrap_or_else(|| Arc::new(JsonMenuFile::new(config.data.dir.join(MENU_FILE))));
        let menu = Arc::new(MenuProvider::new(menu_source, config.menu.cache_ttl()));
        let branding_source = remote
            .branding
            .unwrap_or_else(|| Arc::new(JsonBrandingFile::new(config.data.dir.join(BRANDING_FILE))));
        let branding = Arc::new(BrandingProvider::new(branding_source, config.menu.cache_ttl()));
        let receipts = Arc::new(ReceiptArchive::new(
            remote.images,
            LocalReceiptStore::new(config.payment.receipt_dir.clone()),
        ));

        let services = Services {
            config: config.clone(),
            menu: menu.clone(),
            branding: branding.clone(),
            users,
            deliveries,
            pickups,
            orders: orders.clone(),
            receipts,
            transport: transport.clone(),
            order_ids: OrderIdGenerator::new(),
        };
        let notifier = NotificationDispatcher::new(orders, transport.clone());

        // 3. Start everything with injected context
        let hub_handle = tokio::spawn(hub.run(services));
        let user_handle = tokio::spawn(user_actor.run(()));
        let delivery_handle = tokio::spawn(delivery_actor.run(()));
        let pickup_handle = tokio::spawn(pickup_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(()));

        info!(
            idle_timeout = ?config.conversation.idle_timeout(),
            data_dir = %config.data.dir.display(),
            "Bot system started"
        );

        Self {
            user_client,
            delivery_client,
            pickup_client,
            order_client,
            sessions,
            menu,
            branding,
            notifier,
            transport,
            config,
            handles: vec![hub_handle, user_handle, delivery_handle, pickup_handle, order_handle],
        }
    }

    /// Loads the JSON seed files from the configured data directory into the
    /// local tiers. Missing or unreadable files count as empty.
    pub async fn seed_from_dir(&self) -> Result<SeedReport, BotError> {
        let dir = self.config.data.dir.clone();
        let mut report = SeedReport::default();

        for session in read_seed::<Vec<DeliverySession>>(&dir, DELIVERIES_FILE).await {
            self.delivery_client
                .schedule(session)
                .await
                .map_err(|e| seed_error(DELIVERIES_FILE, e))?;
            report.deliveries += 1;
        }

        for (raw_id, user) in read_seed::<BTreeMap<String, SeedUser>>(&dir, USERS_FILE).await {
            let Ok(user_id) = raw_id.trim().parse::<i64>() else {
                warn!(file = USERS_FILE, id = %raw_id, "Skipping user with non-numeric id");
                continue;
            };
            let profile = CustomerProfile {
                user_id,
                name: user.name,
                handle: user.handle,
                phone: user.phone,
            };
            self.user_client
                .save_profile(profile)
                .await
                .map_err(|e| seed_error(USERS_FILE, e))?;
            report.users += 1;
        }

        for store in read_seed::<Vec<PickupStore>>(&dir, PICKUP_STORES_FILE).await {
            self.pickup_client
                .register_store(store)
                .await
                .map_err(|e| seed_error(PICKUP_STORES_FILE, e))?;
            report.pickup_stores += 1;
        }

        info!(
            deliveries = report.deliveries,
            users = report.users,
            pickup_stores = report.pickup_stores,
            "Local stores seeded"
        );
        Ok(report)
    }

    /// Runs one inbound update through its conversation. A failed turn is
    /// answered with the generic error reply before the error is returned.
    pub async fn handle_update(&self, update: Update) -> Result<Turn, BotError> {
        let key = update.key();
        let chat_id = update.chat_id;

        match self.sessions.dispatch(key, update).await {
            Ok(turn) => Ok(turn),
            Err(e) => {
                let e = BotError::from(e);
                error!(%key, error = %e, "Update failed");
                let keyboard = render::main_keyboard();
                if let Err(send) = self
                    .transport
                    .send_text(chat_id, render::GENERIC_ERROR, Some(&keyboard))
                    .await
                {
                    warn!(chat_id, error = %send, "Error reply not delivered");
                }
                Err(e)
            }
        }
    }

    /// Conversations currently holding state.
    pub async fn active_conversations(&self) -> Result<usize, BotError> {
        Ok(self.sessions.active_sessions().await?)
    }

    pub fn menu(&self) -> &MenuProvider {
        &self.menu
    }

    /// Admin tools call `invalidate` on this after editing the branding.
    pub fn branding(&self) -> &BrandingProvider {
        &self.branding
    }

    pub fn notifier(&self) -> &NotificationDispatcher {
        &self.notifier
    }

    /// Stops the hub, then every actor, and waits for all of them.
    pub async fn shutdown(self) -> Result<(), BotError> {
        info!("Shutting down bot system...");

        // Hub first: it owns clones of the actor clients
        drop(self.sessions);
        drop(self.notifier);
        drop(self.user_client);
        drop(self.delivery_client);
        drop(self.pickup_client);
        drop(self.order_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Task failed during shutdown");
                return Err(BotError::Shutdown(e.to_string()));
            }
        }

        info!("Bot system shutdown complete.");
        Ok(())
    }
}

fn seed_error(file: &'static str, e: impl std::fmt::Display) -> BotError {
    BotError::Seed {
        file,
        reason: e.to_string(),
    }
}

async fn read_seed<T: DeserializeOwned + Default>(dir: &Path, file: &'static str) -> T {
    let path = dir.join(file);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!(file, error = %e, "Seed file unreadable, starting empty");
            return T::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(file, error = %e, "Seed file malformed, starting empty");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use crate::repository::DeliveryDirectory;
    use crate::transport::RecordingTransport;

    fn config_in(dir: &Path) -> BotConfig {
        BotConfig {
            data: DataConfig {
                dir: dir.to_path_buf(),
            },
            ..BotConfig::default()
        }
    }

    #[tokio::test]
    async fn seeds_present_files_and_skips_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DELIVERIES_FILE),
            r#"[{"id": 1, "location": "NUS UTown", "datetime": "2099-01-02 21:00",
                 "cutoff_time": "2099-01-02 18:00", "status": "open"}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(USERS_FILE),
            r#"{"4242": {"name": "Wei Ling", "handle": "weiling", "phone": "91234567"},
                "oops": {"name": "Nobody"}}"#,
        )
        .unwrap();

        let system = BotSystem::new(
            config_in(dir.path()),
            Arc::new(RecordingTransport::new()),
            RemoteBackends::default(),
        );
        let report = system.seed_from_dir().await.unwrap();

        assert_eq!(
            report,
            SeedReport {
                deliveries: 1,
                users: 1,
                pickup_stores: 0
            }
        );
        let profile = system.user_client.find(4242).await.unwrap().unwrap();
        assert_eq!(profile.phone, "91234567");
        assert!(system.delivery_client.find("1").await.unwrap().is_some());

        system.shutdown().await.unwrap();
    }

    #[test]
    fn failed_turns_surface_the_conversation_error() {
        let failed = FrameworkError::EntityError(Box::new(ConversationError::Delivery(
            crate::delivery_actor::DeliveryError::DatabaseError("offline".to_string()),
        )));
        assert!(matches!(BotError::from(failed), BotError::Conversation(_)));
        assert!(matches!(
            BotError::from(FrameworkError::ActorClosed),
            BotError::Hub(FrameworkError::ActorClosed)
        ));
    }

    #[tokio::test]
    async fn malformed_seed_file_counts_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PICKUP_STORES_FILE), "{ not json").unwrap();

        let system = BotSystem::new(
            config_in(dir.path()),
            Arc::new(RecordingTransport::new()),
            RemoteBackends::default(),
        );

        assert_eq!(system.seed_from_dir().await.unwrap(), SeedReport::default());
        system.shutdown().await.unwrap();
    }
}
