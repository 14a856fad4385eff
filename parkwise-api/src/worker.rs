use chrono::{DateTime, Utc};
use parkwise_booking::{BookingState, BookingStatusView};
use parkwise_shared::OccupancySnapshot;
use parkwise_store::LotStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Periodic projection pushed to status-stream subscribers
#[derive(Debug, Clone, Serialize)]
pub struct StatusTick {
    pub at: DateTime<Utc>,
    pub state: BookingState,
    pub occupancy: OccupancySnapshot,
    pub status: Option<BookingStatusView>,
}

pub async fn status_tick(lot: &LotStore, now: DateTime<Utc>) -> StatusTick {
    let snapshot = lot.snapshot(now).await;
    StatusTick {
        at: now,
        state: snapshot.state,
        occupancy: snapshot.occupancy,
        status: snapshot.status,
    }
}

/// Recomputes the countdown every `period`. Read-only: never mutates the lot.
pub async fn start_status_ticker(
    lot: Arc<LotStore>,
    tx: broadcast::Sender<StatusTick>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Status ticker started, every {}ms", period.as_millis());

    loop {
        interval.tick().await;

        if tx.receiver_count() == 0 {
            continue;
        }

        let tick = status_tick(&lot, Utc::now()).await;
        if tx.send(tick).is_err() {
            debug!("Status tick dropped, subscribers went away");
        }
    }
}
