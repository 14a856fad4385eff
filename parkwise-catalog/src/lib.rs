pub mod spots;
pub mod pricing;
pub mod occupancy;

pub use spots::SpotRegistry;
pub use pricing::{overstay_penalty, Tariff};
pub use occupancy::aggregate;
