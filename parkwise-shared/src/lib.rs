pub mod models;
pub mod money;
pub mod secret;

pub use models::chat::{ChatMessage, MessageSender};
pub use models::parking::{OccupancySnapshot, Spot, SpotStatus};
pub use money::format_cents;
pub use secret::Masked;
