use thiserror::Error;

use crate::menu::FoodSize;

/// Failures at the durable storage boundary.
///
/// Only the orders hydration ever sees these; every other caller gets the
/// degraded "no prior value" result from [`crate::storage::DurableStore::read`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("stored value at `{key}` is corrupt: {reason}")]
    StorageCorrupt { key: String, reason: String },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("invalid food item: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("item not on the menu: {0}")]
    UnknownItem(String),
    #[error("{id} ({size}) is out of stock")]
    OutOfStock { id: String, size: FoodSize },
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("payment address is required")]
    MissingAddress,
    #[error("payment failed: {0:#}")]
    Payment(anyhow::Error),
}
