use chrono::{DateTime, Utc};
use parkwise_catalog::{aggregate, SpotRegistry, Tariff};
use parkwise_core::{LotError, LotResult};
use parkwise_shared::OccupancySnapshot;

use crate::models::{compute_penalty, Booking, BookingReceipt, BookingState, BookingStatusView};

/// Owns the spot registry and the single active booking.
///
/// Every transition builds the next registry first and only then commits it
/// together with the booking change, so a rejected call leaves both untouched.
#[derive(Debug, Clone)]
pub struct ParkingLot {
    registry: SpotRegistry,
    active: Option<Booking>,
    tariff: Tariff,
}

impl ParkingLot {
    pub fn new(registry: SpotRegistry, tariff: Tariff) -> Self {
        Self {
            registry,
            active: None,
            tariff,
        }
    }

    pub fn registry(&self) -> &SpotRegistry {
        &self.registry
    }

    pub fn active_booking(&self) -> Option<&Booking> {
        self.active.as_ref()
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn occupancy(&self) -> OccupancySnapshot {
        aggregate(self.registry.spots())
    }

    pub fn state(&self, now: DateTime<Utc>) -> BookingState {
        BookingState::derive(self.active.as_ref(), now)
    }

    /// Transition: NoBooking → Active
    pub fn start_booking(
        &mut self,
        spot_id: &str,
        duration_hours: u32,
        now: DateTime<Utc>,
    ) -> LotResult<Booking> {
        if let Some(existing) = &self.active {
            return Err(LotError::BookingConflict {
                spot_id: existing.spot_id.clone(),
            });
        }

        self.tariff.validate_duration(duration_hours)?;
        let next = self.registry.mark_booked(spot_id)?;

        let booking = Booking::new(
            spot_id.to_string(),
            duration_hours,
            self.tariff.booking_cost(duration_hours),
            now,
        );

        self.registry = next;
        self.active = Some(booking.clone());

        tracing::info!(
            booking_id = %booking.id,
            spot_id,
            duration_hours,
            cost_cents = booking.cost_cents,
            "Booking started"
        );
        Ok(booking)
    }

    /// Transition: Active | Overstaying → NoBooking
    pub fn end_booking(&mut self, now: DateTime<Utc>) -> LotResult<BookingReceipt> {
        let booking = self.active.as_ref().ok_or(LotError::NoActiveBooking)?;

        let penalty = compute_penalty(booking, now, self.tariff.penalty_rate_cents);
        let next = self.registry.mark_available(&booking.spot_id)?;

        self.registry = next;
        let booking = self.active.take().ok_or(LotError::NoActiveBooking)?;

        tracing::info!(
            booking_id = %booking.id,
            spot_id = %booking.spot_id,
            penalty_cents = penalty,
            "Booking ended"
        );
        Ok(BookingReceipt::new(booking, penalty, now))
    }

    /// Countdown projection of the active booking, if any
    pub fn status_view(&self, now: DateTime<Utc>) -> Option<BookingStatusView> {
        self.active
            .as_ref()
            .map(|b| b.status_view(now, self.tariff.penalty_rate_cents))
    }
}
