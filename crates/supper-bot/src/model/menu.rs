use serde::{Deserialize, Serialize};

/// Index of the only group whose options may carry a price.
pub const PRICED_GROUP: usize = 0;

/// A single choice inside a menu group: a bare label, or a name with a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MenuOption {
    Priced {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price: Option<f64>,
    },
    Label(String),
}

impl MenuOption {
    pub fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into())
    }

    pub fn priced(name: impl Into<String>, price: f64) -> Self {
        Self::Priced {
            name: name.into(),
            price: Some(price),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Priced { name, .. } | Self::Label(name) => name,
        }
    }

    /// Unit price; labels and unpriced options count as zero.
    pub fn price(&self) -> f64 {
        match self {
            Self::Priced { price, .. } => price.unwrap_or(0.0),
            Self::Label(_) => 0.0,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name().trim().is_empty()
    }

    /// Text shown on the option's button.
    pub fn button_text(&self) -> String {
        let price = self.price();
        if price > 0.0 {
            format!("{} - ${:.2}", self.name(), price)
        } else {
            self.name().to_string()
        }
    }

    /// Same option with any negative price raised to zero.
    pub(crate) fn without_negative_price(self) -> Self {
        match self {
            Self::Priced {
                name,
                price: Some(price),
            } if price < 0.0 => Self::Priced {
                name,
                price: Some(0.0),
            },
            option => option,
        }
    }

    pub(crate) fn into_label(self) -> Self {
        match self {
            Self::Priced { name, .. } => Self::Label(name),
            label => label,
        }
    }
}

/// An ordered list of options the customer picks exactly one from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuGroup {
    /// Blank when the source gave none; filled in while sanitizing.
    #[serde(default, alias = "key")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub options: Vec<MenuOption>,
}

impl MenuGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>, options: Vec<MenuOption>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            options,
        }
    }

    /// Prompt shown above the group's buttons.
    pub fn prompt(&self) -> String {
        if self.title.trim().is_empty() {
            "Please select an option:".to_string()
        } else {
            format!("{}:", self.title)
        }
    }
}
