//! # Order Conversation
//!
//! The ordering flow as a state machine over [`Stage`]s:
//!
//! ```text
//! SELECT_DELIVERY ─┐                         ┌──────────── add more ────────────┐
//!                  ├─(REGISTER_NAME → REGISTER_PHONE)?─→ MENU_SELECTION ⇄ QUANTITY → ADD_MORE_ITEMS
//! SELECT_STORE → SELECT_PICKUP_SLOT ─┘                                               │ proceed
//!                                                     PAYMENT ←─(PAYMENT_METHOD)?─ CONFIRM
//! ```
//!
//! Each conversation is a [`ConversationSession`] owned by a
//! [`SessionHub`](actor_framework::SessionHub) worker keyed by
//! [`ConversationKey`], so overlapping events for one customer are serialized
//! and a quiet conversation is dropped after the configured idle timeout.
//!
//! A turn runs the stage logic against the [`ConversationContext`], collects
//! [`Outbound`](crate::transport::Outbound) replies and then delivers them
//! through the [`Transport`](crate::transport::Transport). Cancel and restart
//! phrases are honoured in every stage before any field validation.

pub mod context;
pub mod event;
pub mod ids;
pub mod render;
pub mod selection;
pub mod session;
pub mod stage;

mod flow;
mod payment;

pub use context::{ConversationContext, Destination};
pub use event::{Callback, Command, Control, ConversationKey, Inbound, Update};
pub use ids::OrderIdGenerator;
pub use selection::{MenuSelection, SelectionStep};
pub use session::{ConversationSession, Turn};
pub use stage::Stage;

use crate::branding::BrandingProvider;
use crate::config::BotConfig;
use crate::delivery_actor::DeliveryError;
use crate::menu::MenuProvider;
use crate::pickup_actor::PickupError;
use crate::receipts::ReceiptArchive;
use crate::repository::{DeliveryDirectory, OrderStore, PickupDirectory, UserDirectory};
use crate::transport::Transport;
use std::sync::Arc;
use thiserror::Error;

/// Failures that end a turn with the generic error reply. Everything else
/// degrades inside the flow.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error(transparent)]
    Pickup(#[from] PickupError),
}

/// Collaborators shared by every conversation.
pub struct Services {
    pub config: BotConfig,
    pub menu: Arc<MenuProvider>,
    pub branding: Arc<BrandingProvider>,
    pub users: Arc<dyn UserDirectory>,
    pub deliveries: Arc<dyn DeliveryDirectory>,
    pub pickups: Arc<dyn PickupDirectory>,
    pub orders: Arc<dyn OrderStore>,
    pub receipts: Arc<ReceiptArchive>,
    pub transport: Arc<dyn Transport>,
    pub order_ids: OrderIdGenerator,
}
