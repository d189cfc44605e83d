mod dto;
mod store;

pub use dto::{Order, OrderItem, OrderStatus};
pub use store::{LoadState, OrdersStore};
