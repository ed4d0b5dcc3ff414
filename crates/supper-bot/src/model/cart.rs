use serde::{Deserialize, Serialize};

/// One configured line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub flavor: String,
    pub sauce: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub item_total: f64,
}

impl CartItem {
    pub fn new(flavor: impl Into<String>, sauce: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            flavor: flavor.into(),
            sauce: sauce.into(),
            quantity,
            unit_price,
            item_total: f64::from(quantity) * unit_price,
        }
    }

    /// `"{flavor} + {sauce} × {qty}"`, without the sauce part when there is none.
    pub fn describe(&self) -> String {
        if self.sauce.is_empty() {
            format!("{} × {}", self.flavor, self.quantity)
        } else {
            format!("{} + {} × {}", self.flavor, self.sauce, self.quantity)
        }
    }
}

/// Items plus totals that always match them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    items: Vec<CartItem>,
    total_price: f64,
    total_quantity: u32,
}

impl Cart {
    /// Appends an item and recomputes both totals from every item.
    pub fn push(&mut self, item: CartItem) {
        self.items.push(item);
        self.total_price = self.items.iter().map(|i| i.item_total).sum();
        self.total_quantity = self.items.iter().map(|i| i.quantity).sum();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn first(&self) -> Option<&CartItem> {
        self.items.first()
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    pub fn total_quantity(&self) -> u32 {
        self.total_quantity
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_follow_every_append() {
        let mut cart = Cart::default();
        let lines = [(2, 9.0), (1, 8.5), (5, 8.0), (3, 0.0)];

        for (n, (quantity, price)) in lines.iter().enumerate() {
            cart.push(CartItem::new("Acai", "", *quantity, *price));

            let expected_price: f64 = lines[..=n].iter().map(|(q, p)| f64::from(*q) * p).sum();
            let expected_quantity: u32 = lines[..=n].iter().map(|(q, _)| q).sum();
            assert!((cart.total_price() - expected_price).abs() < 1e-9);
            assert_eq!(cart.total_quantity(), expected_quantity);
            assert_eq!(cart.items().len(), n + 1);
        }
    }

    #[test]
    fn describe_omits_empty_sauce() {
        assert_eq!(CartItem::new("Classic Acai", "", 2, 8.0).describe(), "Classic Acai × 2");
        assert_eq!(
            CartItem::new("Protein Acai", "Honey", 1, 9.0).describe(),
            "Protein Acai + Honey × 1"
        );
    }
}
