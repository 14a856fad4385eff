pub mod chat;
pub mod events;
pub mod parking;
