mod defaults;
mod dto;
pub mod image;
mod store;

pub use defaults::default_catalog;
pub use dto::{FoodItem, FoodSize, PerSize};
pub use store::MenuStore;
