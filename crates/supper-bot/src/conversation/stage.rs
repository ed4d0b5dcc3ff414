use std::fmt;

/// Where a conversation currently is in the ordering flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    /// No order in progress.
    #[default]
    Idle,
    SelectDelivery,
    SelectStore,
    SelectPickupSlot,
    RegisterName,
    RegisterPhone,
    MenuSelection,
    Quantity,
    AddMoreItems,
    Confirm,
    /// Pickup orders only: pay now or at the counter.
    PaymentMethod,
    /// Waiting for a proof-of-payment image.
    Payment,
}

impl Stage {
    pub fn is_active(self) -> bool {
        self != Self::Idle
    }

    /// Stages that read free text rather than button presses.
    pub fn accepts_text(self) -> bool {
        matches!(self, Self::RegisterName | Self::RegisterPhone | Self::Payment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::SelectDelivery => "SELECT_DELIVERY",
            Self::SelectStore => "SELECT_STORE",
            Self::SelectPickupSlot => "SELECT_PICKUP_SLOT",
            Self::RegisterName => "REGISTER_NAME",
            Self::RegisterPhone => "REGISTER_PHONE",
            Self::MenuSelection => "MENU_SELECTION",
            Self::Quantity => "QUANTITY",
            Self::AddMoreItems => "ADD_MORE_ITEMS",
            Self::Confirm => "CONFIRM",
            Self::PaymentMethod => "PAYMENT_METHOD",
            Self::Payment => "PAYMENT",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
