//! Storefront state for a small food-ordering app: the menu, the shopper's
//! cart and the placed orders, each mirrored to a durable key-value store.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod menu;
pub mod orders;
pub mod state;
pub mod storage;
