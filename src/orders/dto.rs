use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::cart::CartLine;
use crate::menu::FoodSize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
}

impl OrderStatus {
    pub fn toggled(self) -> Self {
        match self {
            OrderStatus::Pending => OrderStatus::Completed,
            OrderStatus::Completed => OrderStatus::Pending,
        }
    }
}

/// Frozen copy of a cart line at the time of purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub size: FoodSize,
    pub quantity: u32,
    pub price: f64, // unit price at the chosen size
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.item.id.clone(),
            name: line.item.name.clone(),
            size: line.size,
            quantity: line.quantity,
            price: line.unit_price(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub address: String, // payer identity, e.g. a wallet address
    pub total: f64,
    pub items: Vec<OrderItem>,
    #[serde(with = "time::serde::timestamp::milliseconds")]
    pub timestamp: OffsetDateTime, // epoch milliseconds
    #[serde(default)]
    pub status: OrderStatus,
}
