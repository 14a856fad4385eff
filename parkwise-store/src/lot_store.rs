use chrono::{DateTime, Utc};
use parkwise_booking::{Booking, BookingReceipt, BookingState, BookingStatusView, ParkingLot};
use parkwise_catalog::{SpotRegistry, Tariff};
use parkwise_core::LotResult;
use parkwise_shared::models::events::{BookingEndedEvent, BookingStartedEvent, LotEvent};
use parkwise_shared::{OccupancySnapshot, Spot};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::app_config::LotConfig;
use crate::events::EventPublisher;

/// Read-only view handed to the HTTP layer and the assistant
#[derive(Debug, Clone, Serialize)]
pub struct LotSnapshot {
    pub spots: Vec<Spot>,
    pub occupancy: OccupancySnapshot,
    pub state: BookingState,
    pub booking: Option<Booking>,
    pub status: Option<BookingStatusView>,
}

/// The process-wide parking lot.
///
/// All transitions run under one write lock that is never held across an
/// await, so user actions are applied one at a time. Lot events are sent
/// before the lock is released.
pub struct LotStore {
    lot: RwLock<ParkingLot>,
    events: EventPublisher,
}

impl LotStore {
    pub fn new(lot: ParkingLot) -> Self {
        Self {
            lot: RwLock::new(lot),
            events: EventPublisher::new(64),
        }
    }

    pub fn from_config(config: &LotConfig, tariff: Tariff) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let registry = SpotRegistry::initialize(config.total_spots, config.available_probability, &mut rng);
        let lot = ParkingLot::new(registry, tariff);

        let occupancy = lot.occupancy();
        tracing::info!(
            "Lot initialized: {} spots, {} available",
            occupancy.total,
            occupancy.available
        );
        Self::new(lot)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LotEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self, now: DateTime<Utc>) -> LotSnapshot {
        let lot = self.lot.read().await;
        LotSnapshot {
            spots: lot.registry().spots().to_vec(),
            occupancy: lot.occupancy(),
            state: lot.state(now),
            booking: lot.active_booking().cloned(),
            status: lot.status_view(now),
        }
    }

    pub async fn occupancy(&self) -> OccupancySnapshot {
        self.lot.read().await.occupancy()
    }

    pub async fn active_booking(&self) -> Option<Booking> {
        self.lot.read().await.active_booking().cloned()
    }

    pub async fn status_view(&self, now: DateTime<Utc>) -> Option<BookingStatusView> {
        self.lot.read().await.status_view(now)
    }

    pub async fn tariff(&self) -> Tariff {
        self.lot.read().await.tariff().clone()
    }

    pub async fn start_booking(
        &self,
        spot_id: &str,
        duration_hours: u32,
        now: DateTime<Utc>,
    ) -> LotResult<Booking> {
        let mut lot = self.lot.write().await;
        let booking = lot.start_booking(spot_id, duration_hours, now)?;

        // Published under the write lock so subscribers see commit order
        self.events.publish(LotEvent::BookingStarted(BookingStartedEvent {
            booking_id: booking.id,
            spot_id: booking.spot_id.clone(),
            duration_hours: booking.duration_hours,
            cost_cents: booking.cost_cents,
            end_time: booking.end_time,
        }));
        Ok(booking)
    }

    pub async fn end_booking(&self, now: DateTime<Utc>) -> LotResult<BookingReceipt> {
        let mut lot = self.lot.write().await;
        let receipt = lot.end_booking(now)?;

        self.events.publish(LotEvent::BookingEnded(BookingEndedEvent {
            booking_id: receipt.booking.id,
            spot_id: receipt.booking.spot_id.clone(),
            penalty_cents: receipt.final_penalty_cents,
            ended_at: receipt.ended_at,
        }));
        Ok(receipt)
    }
}
