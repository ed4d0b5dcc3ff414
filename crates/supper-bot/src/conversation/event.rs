//! Inbound chat events and the vocabulary they are parsed into.

use std::fmt;

/// One conversation per user per chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// An event delivered by the messaging transport.
#[derive(Debug, Clone)]
pub struct Update {
    pub chat_id: i64,
    pub user_id: i64,
    /// Platform username, empty when the user has none.
    pub handle: String,
    pub input: Inbound,
}

impl Update {
    pub fn new(chat_id: i64, user_id: i64, input: Inbound) -> Self {
        Self {
            chat_id,
            user_id,
            handle: String::new(),
            input,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = handle.into();
        self
    }

    pub fn key(&self) -> ConversationKey {
        ConversationKey {
            chat_id: self.chat_id,
            user_id: self.user_id,
        }
    }
}

#[derive(Clone)]
pub enum Inbound {
    Command(Command),
    Text(String),
    /// Data attached to a pressed inline button.
    Callback(String),
    Photo { bytes: Vec<u8>, content_type: String },
}

impl Inbound {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn callback(data: impl Into<String>) -> Self {
        Self::Callback(data.into())
    }

    /// `/order`-style input becomes a command, anything else plain text.
    pub fn from_message(text: &str) -> Self {
        match text.trim().strip_prefix('/') {
            Some(command) => Self::Command(Command::parse(command)),
            None => Self::Text(text.to_string()),
        }
    }
}

impl fmt::Debug for Inbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(command) => f.debug_tuple("Command").field(command).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Callback(data) => f.debug_tuple("Callback").field(data).finish(),
            Self::Photo {
                bytes,
                content_type,
            } => f
                .debug_struct("Photo")
                .field("len", &bytes.len())
                .field("content_type", content_type)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Order,
    Pickup,
    Cancel,
    Unknown(String),
}

impl Command {
    /// Parses a command name without its leading slash; `@botname` suffixes are ignored.
    pub fn parse(raw: &str) -> Self {
        let name = raw
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "order" => Self::Order,
            "pickup" => Self::Pickup,
            "cancel" => Self::Cancel,
            _ => Self::Unknown(name),
        }
    }
}

/// A pressed inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Delivery(String),
    Store(String),
    Slot(usize),
    Menu { group: usize, option: usize },
    Quantity(u32),
    AddMore,
    ProceedPayment,
    Confirm,
    PayNow,
    PayAtCounter,
    Cancel,
}

impl Callback {
    /// `None` for data no current button produces.
    pub fn parse(data: &str) -> Option<Self> {
        let parsed = match data {
            "add_more" => Self::AddMore,
            "proceed_payment" => Self::ProceedPayment,
            "confirm" => Self::Confirm,
            "payment_now" => Self::PayNow,
            "payment_counter" => Self::PayAtCounter,
            "cancel" => Self::Cancel,
            _ => {
                if let Some(id) = data.strip_prefix("delivery_") {
                    Self::Delivery(id.to_string())
                } else if let Some(id) = data.strip_prefix("store_") {
                    Self::Store(id.to_string())
                } else if let Some(index) = data.strip_prefix("slot_") {
                    Self::Slot(index.parse().ok()?)
                } else if let Some(n) = data.strip_prefix("qty_") {
                    Self::Quantity(n.parse().ok()?)
                } else if let Some(rest) = data.strip_prefix("menu_") {
                    let (group, option) = rest.split_once('_')?;
                    Self::Menu {
                        group: group.parse().ok()?,
                        option: option.parse().ok()?,
                    }
                } else {
                    return None;
                }
            }
        };
        Some(parsed)
    }

    pub fn data(&self) -> String {
        match self {
            Self::Delivery(id) => format!("delivery_{id}"),
            Self::Store(id) => format!("store_{id}"),
            Self::Slot(index) => format!("slot_{index}"),
            Self::Menu { group, option } => format!("menu_{group}_{option}"),
            Self::Quantity(n) => format!("qty_{n}"),
            Self::AddMore => "add_more".to_string(),
            Self::ProceedPayment => "proceed_payment".to_string(),
            Self::Confirm => "confirm".to_string(),
            Self::PayNow => "payment_now".to_string(),
            Self::PayAtCounter => "payment_counter".to_string(),
            Self::Cancel => "cancel".to_string(),
        }
    }
}

/// Reply-keyboard phrases, recognised with or without their emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    CancelOrder,
    RestartOrder,
    OrderNow,
    ShowMenu,
    ShowDeliveries,
    Help,
    StartOver,
}

impl Control {
    pub fn parse(text: &str) -> Option<Self> {
        let phrase = text
            .trim()
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .trim()
            .to_lowercase();
        match phrase.as_str() {
            "cancel order" => Some(Self::CancelOrder),
            "restart order" => Some(Self::RestartOrder),
            "order now" => Some(Self::OrderNow),
            "show menu" => Some(Self::ShowMenu),
            "show deliveries" => Some(Self::ShowDeliveries),
            "help" => Some(Self::Help),
            "start over" => Some(Self::StartOver),
            _ => None,
        }
    }

    /// Honoured in every stage, ahead of the stage's own input handling.
    pub fn overrides_flow(self) -> bool {
        matches!(self, Self::CancelOrder | Self::RestartOrder | Self::OrderNow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_grammar() {
        assert_eq!(Callback::parse("delivery_12"), Some(Callback::Delivery("12".to_string())));
        assert_eq!(Callback::parse("menu_1_3"), Some(Callback::Menu { group: 1, option: 3 }));
        assert_eq!(Callback::parse("qty_4"), Some(Callback::Quantity(4)));
        assert_eq!(Callback::parse("slot_0"), Some(Callback::Slot(0)));
        assert_eq!(Callback::parse("payment_counter"), Some(Callback::PayAtCounter));
        assert_eq!(Callback::parse("menu_x_1"), None);
        assert_eq!(Callback::parse("flavor_2"), None);
        assert_eq!(Callback::Menu { group: 2, option: 0 }.data(), "menu_2_0");
    }

    #[test]
    fn control_phrases_match_keyboard_labels_and_typed_text() {
        assert_eq!(Control::parse("❌ Cancel Order"), Some(Control::CancelOrder));
        assert_eq!(Control::parse("  cancel order "), Some(Control::CancelOrder));
        assert_eq!(Control::parse("🔄 Restart Order"), Some(Control::RestartOrder));
        assert_eq!(Control::parse("🍧 Order Now"), Some(Control::OrderNow));
        assert_eq!(Control::parse("Cancel my order"), None);
        assert!(!Control::ShowMenu.overrides_flow());
    }

    #[test]
    fn slash_text_is_a_command() {
        assert!(matches!(Inbound::from_message("/order"), Inbound::Command(Command::Order)));
        assert!(matches!(
            Inbound::from_message("/pickup@SupperBot"),
            Inbound::Command(Command::Pickup)
        ));
        assert!(matches!(Inbound::from_message("Wei Ling"), Inbound::Text(_)));
    }
}
