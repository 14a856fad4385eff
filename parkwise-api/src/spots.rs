use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use parkwise_shared::{OccupancySnapshot, Spot};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SpotsResponse {
    spots: Vec<Spot>,
    occupancy: OccupancySnapshot,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/spots", get(list_spots))
        .route("/v1/occupancy", get(occupancy))
}

async fn list_spots(State(state): State<AppState>) -> Json<SpotsResponse> {
    let snapshot = state.lot.snapshot(Utc::now()).await;
    Json(SpotsResponse {
        spots: snapshot.spots,
        occupancy: snapshot.occupancy,
    })
}

async fn occupancy(State(state): State<AppState>) -> Json<OccupancySnapshot> {
    Json(state.lot.occupancy().await)
}
