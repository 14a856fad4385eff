pub mod models;
pub mod manager;
pub mod countdown;

pub use models::{compute_penalty, compute_remaining, Booking, BookingReceipt, BookingState, BookingStatusView};
pub use manager::ParkingLot;
pub use countdown::format_countdown;
