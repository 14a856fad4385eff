use chrono::Duration;
use parkwise_core::{LotError, LotResult};
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Prices and limits for a booking. All amounts in cents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tariff {
    /// Price per booked hour
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate_cents: i64,

    /// Charge per started hour past the booking's end
    #[serde(default = "default_penalty_rate")]
    pub penalty_rate_cents: i64,

    #[serde(default = "default_min_hours")]
    pub min_duration_hours: u32,

    #[serde(default = "default_max_hours")]
    pub max_duration_hours: u32,
}

fn default_hourly_rate() -> i64 { 500 }
fn default_penalty_rate() -> i64 { 1000 }
fn default_min_hours() -> u32 { 1 }
fn default_max_hours() -> u32 { 120 }

impl Default for Tariff {
    fn default() -> Self {
        Self {
            hourly_rate_cents: default_hourly_rate(),
            penalty_rate_cents: default_penalty_rate(),
            min_duration_hours: default_min_hours(),
            max_duration_hours: default_max_hours(),
        }
    }
}

impl Tariff {
    pub fn validate_duration(&self, hours: u32) -> LotResult<()> {
        if hours < self.min_duration_hours || hours > self.max_duration_hours {
            return Err(LotError::InvalidDuration {
                hours,
                min: self.min_duration_hours,
                max: self.max_duration_hours,
            });
        }
        Ok(())
    }

    pub fn booking_cost(&self, hours: u32) -> i64 {
        i64::from(hours) * self.hourly_rate_cents
    }

    pub fn penalty_for(&self, overstay: Duration) -> i64 {
        overstay_penalty(overstay, self.penalty_rate_cents)
    }
}

/// Whole hours billed for an overstay. Any started hour counts, down to the millisecond.
pub fn billable_hours(overstay: Duration) -> i64 {
    let ms = overstay.num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    (ms + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR
}

/// Penalty for staying `overstay` past the end of a booking
pub fn overstay_penalty(overstay: Duration, rate_per_hour_cents: i64) -> i64 {
    billable_hours(overstay) * rate_per_hour_cents
}
