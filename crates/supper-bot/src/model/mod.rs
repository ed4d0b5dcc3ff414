//! Plain data carried through the ordering flow and persisted by the stores.

pub mod cart;
pub mod delivery;
pub mod menu;
pub mod order;
pub mod pickup;
pub mod profile;

pub use cart::*;
pub use delivery::*;
pub use menu::*;
pub use order::*;
pub use pickup::*;
pub use profile::*;

use serde::{Deserialize, Deserializer};

/// Identifiers arrive as strings from some sources and as integers from others.
pub(crate) fn id_from_any<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
