mod dto;
mod store;

pub(crate) use dto::round_cents;
pub use dto::CartLine;
pub use store::CartStore;
