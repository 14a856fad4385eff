use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingStartedEvent {
    pub booking_id: Uuid,
    pub spot_id: String,
    pub duration_hours: u32,
    pub cost_cents: i64,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingEndedEvent {
    pub booking_id: Uuid,
    pub spot_id: String,
    pub penalty_cents: i64,
    pub ended_at: DateTime<Utc>,
}

/// Everything the lot publishes after a committed transition
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LotEvent {
    BookingStarted(BookingStartedEvent),
    BookingEnded(BookingEndedEvent),
}

impl LotEvent {
    pub fn spot_id(&self) -> &str {
        match self {
            LotEvent::BookingStarted(e) => &e.spot_id,
            LotEvent::BookingEnded(e) => &e.spot_id,
        }
    }
}
