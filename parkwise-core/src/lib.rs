pub mod assistant;

use parkwise_shared::SpotStatus;

/// Failures of the lot's synchronous transitions. None of these leave the
/// registry or the active booking partially updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LotError {
    #[error("Spot not found: {0}")]
    SpotNotFound(String),
    #[error("Invalid transition for spot {spot_id}: {from} -> {to}")]
    InvalidTransition {
        spot_id: String,
        from: SpotStatus,
        to: SpotStatus,
    },
    #[error("A booking for spot {spot_id} is already active")]
    BookingConflict { spot_id: String },
    #[error("Invalid duration: {hours}h (allowed {min}..={max})")]
    InvalidDuration { hours: u32, min: u32, max: u32 },
    #[error("No active booking")]
    NoActiveBooking,
}

pub type LotResult<T> = Result<T, LotError>;
