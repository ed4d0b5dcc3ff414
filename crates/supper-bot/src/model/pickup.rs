use super::id_from_any;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A collection window offered by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupSlot {
    pub date: NaiveDate,
    pub time: String,
}

impl PickupSlot {
    pub fn date_label(&self) -> String {
        self.date.format("%a, %d %b %Y").to_string()
    }

    pub fn label(&self) -> String {
        format!("{} • {}", self.date_label(), self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupStore {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "active_by_default")]
    pub active: bool,
    #[serde(default)]
    pub pickup_slots: Vec<PickupSlot>,
}

fn active_by_default() -> bool {
    true
}

impl PickupStore {
    /// Slots dated today or later, in the order the store lists them.
    pub fn upcoming_slots(&self, today: NaiveDate) -> Vec<PickupSlot> {
        self.pickup_slots
            .iter()
            .filter(|slot| slot.date >= today)
            .cloned()
            .collect()
    }
}
