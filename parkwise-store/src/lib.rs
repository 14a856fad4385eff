pub mod app_config;
pub mod events;
pub mod lot_store;

pub use events::EventPublisher;
pub use lot_store::{LotSnapshot, LotStore};
