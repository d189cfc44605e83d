use serde::{Deserialize, Serialize};

use crate::menu::{FoodItem, FoodSize};

/// A dish in the cart at a given size. Lines are keyed by `(item.id, size)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: FoodItem,
    pub size: FoodSize,
    pub quantity: u32,
}

impl CartLine {
    pub fn matches(&self, id: &str, size: FoodSize) -> bool {
        self.item.id == id && self.size == size
    }

    pub fn unit_price(&self) -> f64 {
        self.item.unit_price(self.size)
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price() * f64::from(self.quantity)
    }
}

pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
