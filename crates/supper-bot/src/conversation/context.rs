//! Per-conversation state.

use super::selection::MenuSelection;
use super::stage::Stage;
use crate::model::{
    Cart, CustomerProfile, DeliverySession, Fulfilment, MenuGroup, PickupSlot, PickupStore,
};
use crate::transport::MessageRef;

/// Where the order will be handed over.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    Delivery(DeliverySession),
    Pickup { store: PickupStore, slot: PickupSlot },
}

impl Destination {
    pub fn is_pickup(&self) -> bool {
        matches!(self, Self::Pickup { .. })
    }

    pub fn fulfilment(&self) -> Fulfilment {
        match self {
            Self::Delivery(session) => Fulfilment::Delivery {
                delivery_session_id: session.numeric_id(),
                delivery_location: session.location.clone(),
                delivery_time: session.time_label(),
            },
            Self::Pickup { store, slot } => Fulfilment::Pickup {
                store_id: store.id.clone(),
                store_name: store.name.clone(),
                pickup_date: slot.date,
                pickup_time: slot.time.clone(),
            },
        }
    }
}

/// A store picked for collection, with the slots that were offered for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPickup {
    pub store: PickupStore,
    pub slots: Vec<PickupSlot>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationContext {
    pub stage: Stage,
    pub destination: Option<Destination>,
    pub pending_pickup: Option<PendingPickup>,
    pub customer: Option<CustomerProfile>,
    pub pending_name: Option<String>,
    /// Menu snapshot taken when the order started; prompts and choices both
    /// index into it.
    pub menu: Vec<MenuGroup>,
    pub selection: MenuSelection,
    pub cart: Cart,
    pub order_id: Option<String>,
    /// Inline prompt that button presses edit in place.
    pub prompt: Option<MessageRef>,
}

impl ConversationContext {
    /// Forgets everything, as if the customer had never written.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
