use axum::{
    extract::{Json, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use parkwise_booking::{Booking, BookingReceipt, BookingStatusView};
use parkwise_core::LotError;
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub spot_id: String,
    pub duration_hours: u32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route(
            "/v1/bookings/current",
            get(current_booking).delete(end_booking),
        )
        .route("/v1/bookings/current/stream", get(status_stream))
        .route("/v1/events", get(lot_events))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .lot
        .start_booking(&req.spot_id, req.duration_hours, Utc::now())
        .await?;

    info!("Booked spot {} for {}h", booking.spot_id, booking.duration_hours);
    Ok(Json(booking))
}

async fn current_booking(State(state): State<AppState>) -> Result<Json<BookingStatusView>, AppError> {
    let view = state
        .lot
        .status_view(Utc::now())
        .await
        .ok_or(LotError::NoActiveBooking)?;
    Ok(Json(view))
}

async fn end_booking(State(state): State<AppState>) -> Result<Json<BookingReceipt>, AppError> {
    let receipt = state.lot.end_booking(Utc::now()).await?;
    info!("{}", receipt.summary);
    Ok(Json(receipt))
}

/// Countdown ticks, one per ticker interval
async fn status_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.status_tx.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result
            .ok()
            .and_then(|tick| Event::default().event("status").json_data(&tick).ok())
            .map(Ok)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Booking started/ended notifications
async fn lot_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.lot.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result
            .ok()
            .and_then(|event| Event::default().event("lot").json_data(&event).ok())
            .map(Ok)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
