use super::{Cart, CartItem, CustomerProfile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Screenshot reference recorded for orders settled in person.
pub const PAY_AT_COUNTER: &str = "Pay at Counter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Submitted,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Confirmed,
    Preparing,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    PayNow,
    PayAtCounter,
}

/// How the customer settled, as known when the order is committed.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// Paid ahead; the value references the archived receipt image.
    Screenshot(String),
    AtCounter,
}

impl Settlement {
    pub fn method(&self) -> PaymentMethod {
        match self {
            Self::Screenshot(_) => PaymentMethod::PayNow,
            Self::AtCounter => PaymentMethod::PayAtCounter,
        }
    }

    pub fn status(&self) -> PaymentStatus {
        match self {
            Self::Screenshot(_) => PaymentStatus::Submitted,
            Self::AtCounter => PaymentStatus::Pending,
        }
    }

    pub fn reference(&self) -> String {
        match self {
            Self::Screenshot(reference) => reference.clone(),
            Self::AtCounter => PAY_AT_COUNTER.to_string(),
        }
    }
}

/// Where the order is handed over. Flattened into the record with an
/// `order_type` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "order_type", rename_all = "snake_case")]
pub enum Fulfilment {
    Delivery {
        delivery_session_id: Option<i64>,
        delivery_location: String,
        delivery_time: String,
    },
    Pickup {
        store_id: String,
        store_name: String,
        pickup_date: NaiveDate,
        pickup_time: String,
    },
}

/// Result of telling the customer about their order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationOutcome {
    pub sent: bool,
    pub error: Option<String>,
}

/// A committed order as handed to the order store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub user_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_handle: String,
    #[serde(flatten)]
    pub fulfilment: Fulfilment,
    pub items: Vec<CartItem>,
    pub total_quantity: u32,
    pub total_price: f64,
    pub payment_method: PaymentMethod,
    pub payment_screenshot_url: String,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    /// Single-item fields kept for older consumers: first item's flavor/sauce,
    /// total quantity.
    pub flavor: String,
    pub sauce: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationOutcome>,
}

impl OrderRecord {
    pub fn new(
        order_id: impl Into<String>,
        customer: &CustomerProfile,
        fulfilment: Fulfilment,
        cart: &Cart,
        settlement: Settlement,
    ) -> Self {
        let (flavor, sauce) = cart
            .first()
            .map(|item| (item.flavor.clone(), item.sauce.clone()))
            .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));

        Self {
            order_id: order_id.into(),
            user_id: customer.user_id,
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            customer_handle: customer.handle.clone(),
            fulfilment,
            items: cart.items().to_vec(),
            total_quantity: cart.total_quantity(),
            total_price: cart.total_price(),
            payment_method: settlement.method(),
            payment_screenshot_url: settlement.reference(),
            payment_status: settlement.status(),
            order_status: OrderStatus::Confirmed,
            flavor,
            sauce,
            quantity: cart.total_quantity(),
            notification: None,
        }
    }

    /// Flat field mapping as stored by the datastore.
    pub fn to_fields(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerProfile {
        CustomerProfile {
            user_id: 4242,
            name: "Wei Ling".to_string(),
            handle: "weiling".to_string(),
            phone: "91234567".to_string(),
        }
    }

    #[test]
    fn delivery_record_flattens_with_legacy_fields() {
        let mut cart = Cart::default();
        cart.push(CartItem::new("Protein Acai", "Honey", 2, 9.0));
        cart.push(CartItem::new("Classic Acai", "Nutella", 1, 8.0));

        let record = OrderRecord::new(
            "202610191830000001",
            &customer(),
            Fulfilment::Delivery {
                delivery_session_id: Some(12),
                delivery_location: "NUS UTown".to_string(),
                delivery_time: "Tue, 20 Oct 2026 • 09:30 PM".to_string(),
            },
            &cart,
            Settlement::Screenshot("data/payment_screenshots/202610191830000001.jpg".to_string()),
        );
        let fields = record.to_fields().unwrap();

        assert_eq!(fields["order_type"], "delivery");
        assert_eq!(fields["delivery_session_id"], 12);
        assert_eq!(fields["payment_status"], "submitted");
        assert_eq!(fields["order_status"], "confirmed");
        assert_eq!(fields["payment_method"], "pay_now");
        assert_eq!(fields["flavor"], "Protein Acai");
        assert_eq!(fields["sauce"], "Honey");
        assert_eq!(fields["quantity"], 3);
        assert_eq!(fields["total_price"], 26.0);
        assert_eq!(fields["items"].as_array().unwrap().len(), 2);
        assert!(fields.get("notification").is_none());
    }

    #[test]
    fn counter_settlement_is_pending() {
        let mut cart = Cart::default();
        cart.push(CartItem::new("Vegan Acai", "", 1, 8.5));

        let record = OrderRecord::new(
            "202610191830000002",
            &customer(),
            Fulfilment::Pickup {
                store_id: "3".to_string(),
                store_name: "Bugis Kiosk".to_string(),
                pickup_date: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
                pickup_time: "9:00 PM".to_string(),
            },
            &cart,
            Settlement::AtCounter,
        );
        let fields = record.to_fields().unwrap();

        assert_eq!(fields["order_type"], "pickup");
        assert_eq!(fields["pickup_date"], "2026-10-21");
        assert_eq!(fields["payment_screenshot_url"], PAY_AT_COUNTER);
        assert_eq!(fields["payment_status"], "pending");
        assert_eq!(fields["payment_method"], "pay_at_counter");
        assert_eq!(fields["sauce"], "");
    }
}
