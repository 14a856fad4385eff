use chrono::{DateTime, Duration, Utc};
use parkwise_catalog::overstay_penalty;
use parkwise_shared::format_cents;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::countdown::format_countdown;

/// Lifecycle state of the lot's single booking slot.
///
/// `Overstaying` is never stored; it is derived from the clock each time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    NoBooking,
    Active,
    Overstaying,
}

impl BookingState {
    pub fn derive(booking: Option<&Booking>, now: DateTime<Utc>) -> Self {
        match booking {
            None => BookingState::NoBooking,
            Some(b) if b.is_overstaying(now) => BookingState::Overstaying,
            Some(_) => BookingState::Active,
        }
    }
}

/// The user's reservation of one spot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    pub id: Uuid,
    pub spot_id: String,
    pub duration_hours: u32,
    pub cost_cents: i64,
    pub started_at: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Booking {
    pub fn new(spot_id: String, duration_hours: u32, cost_cents: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            spot_id,
            duration_hours,
            cost_cents,
            started_at: now,
            end_time: now + Duration::hours(i64::from(duration_hours)),
        }
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        compute_remaining(self, now)
    }

    pub fn is_overstaying(&self, now: DateTime<Utc>) -> bool {
        now > self.end_time
    }

    pub fn status_view(&self, now: DateTime<Utc>, penalty_rate_cents: i64) -> BookingStatusView {
        let remaining = self.remaining(now);
        BookingStatusView {
            booking_id: self.id,
            spot_id: self.spot_id.clone(),
            end_time: self.end_time,
            cost_cents: self.cost_cents,
            remaining_seconds: remaining.num_milliseconds().div_euclid(1000),
            countdown: format_countdown(remaining),
            overstaying: self.is_overstaying(now),
            penalty_cents: compute_penalty(self, now, penalty_rate_cents),
        }
    }
}

/// Signed time left; negative once the booking has run out
pub fn compute_remaining(booking: &Booking, now: DateTime<Utc>) -> Duration {
    booking.end_time - now
}

/// Zero until `end_time`, then `rate` for every started hour
pub fn compute_penalty(booking: &Booking, now: DateTime<Utc>, penalty_rate_cents: i64) -> i64 {
    if now <= booking.end_time {
        return 0;
    }
    overstay_penalty(now - booking.end_time, penalty_rate_cents)
}

/// What the status panel shows, recomputed on every tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingStatusView {
    pub booking_id: Uuid,
    pub spot_id: String,
    pub end_time: DateTime<Utc>,
    pub cost_cents: i64,
    pub remaining_seconds: i64,
    pub countdown: String,
    pub overstaying: bool,
    pub penalty_cents: i64,
}

/// Result of ending a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingReceipt {
    pub booking: Booking,
    pub final_penalty_cents: i64,
    pub ended_at: DateTime<Utc>,
    pub summary: String,
}

impl BookingReceipt {
    pub fn new(booking: Booking, final_penalty_cents: i64, ended_at: DateTime<Utc>) -> Self {
        let mut summary = format!("Parking session for spot {} has ended.", booking.spot_id);
        if final_penalty_cents > 0 {
            summary.push_str(&format!(
                " An overstay penalty of {} was applied.",
                format_cents(final_penalty_cents)
            ));
        }

        Self {
            booking,
            final_penalty_cents,
            ended_at,
            summary,
        }
    }
}
