use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use parkwise_api::{app, worker::status_tick, AppState};
use parkwise_assistant::{AssistantBridge, CircuitBreaker};
use parkwise_booking::ParkingLot;
use parkwise_catalog::{SpotRegistry, Tariff};
use parkwise_core::assistant::{AssistantAdapter, AssistantError, AssistantRequest, FALLBACK_REPLY};
use parkwise_shared::{Spot, SpotStatus};
use parkwise_store::LotStore;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use tower::ServiceExt;

struct BrokenProvider;

#[async_trait]
impl AssistantAdapter for BrokenProvider {
    fn name(&self) -> &str {
        "broken"
    }

    async fn generate(&self, _request: &AssistantRequest) -> Result<String, AssistantError> {
        Err(AssistantError::Unavailable("503 from upstream".to_string()))
    }
}

/// Answers with the occupancy line it was given, to prove the prompt carries lot state
struct ContextEcho;

#[async_trait]
impl AssistantAdapter for ContextEcho {
    fn name(&self) -> &str {
        "context-echo"
    }

    async fn generate(&self, request: &AssistantRequest) -> Result<String, AssistantError> {
        let line = request
            .system_instruction
            .lines()
            .find(|l| l.starts_with("Current parking lot status"))
            .unwrap_or_default();
        Ok(line.to_string())
    }
}

fn test_state(adapter: Arc<dyn AssistantAdapter>) -> AppState {
    let registry = SpotRegistry::from_spots(vec![
        Spot::new("A1", SpotStatus::Available),
        Spot::new("A2", SpotStatus::Occupied),
        Spot::new("A3", SpotStatus::Available),
        Spot::new("A4", SpotStatus::Available),
        Spot::new("A5", SpotStatus::Occupied),
    ]);
    let lot = Arc::new(LotStore::new(ParkingLot::new(registry, Tariff::default())));
    let assistant = Arc::new(AssistantBridge::new(
        adapter,
        "test-model",
        Duration::from_secs(2),
        CircuitBreaker::new("test", 3, Duration::from_secs(60)),
    ));

    AppState::new(lot, assistant)
}

fn test_app(adapter: Arc<dyn AssistantAdapter>) -> Router {
    app(test_state(adapter))
}

/// Opens an SSE route and returns its body as a stream of chunks
async fn open_stream(app: &Router, uri: &str) -> axum::body::BodyDataStream {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
    response.into_body().into_data_stream()
}

async fn next_event(stream: &mut axum::body::BodyDataStream) -> String {
    let chunk = tokio::time::timeout(Duration::from_secs(2), stream.next())
        .await
        .expect("no event within 2s")
        .unwrap()
        .unwrap();
    String::from_utf8(chunk.to_vec()).unwrap()
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = test_app(Arc::new(BrokenProvider));
    let (status, body) = call(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_booking_flow() {
    let app = test_app(Arc::new(BrokenProvider));

    let (_, before) = call(&app, "GET", "/v1/occupancy", None).await;
    assert_eq!(before, json!({ "available": 3, "occupied": 2, "total": 5 }));

    let (status, booking) = call(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({ "spot_id": "A1", "duration_hours": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["spot_id"], "A1");
    assert_eq!(booking["cost_cents"], 1000);

    let (_, after) = call(&app, "GET", "/v1/occupancy", None).await;
    assert_eq!(after["available"], 2);

    let (_, spots) = call(&app, "GET", "/v1/spots", None).await;
    assert_eq!(spots["spots"][0], json!({ "id": "A1", "status": "booked" }));

    let (status, current) = call(&app, "GET", "/v1/bookings/current", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["overstaying"], false);
    assert_eq!(current["penalty_cents"], 0);

    // Only one booking at a time
    let (status, _) = call(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({ "spot_id": "A3", "duration_hours": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, receipt) = call(&app, "DELETE", "/v1/bookings/current", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["final_penalty_cents"], 0);
    assert_eq!(receipt["summary"], "Parking session for spot A1 has ended.");

    let (_, restored) = call(&app, "GET", "/v1/occupancy", None).await;
    assert_eq!(restored, before);

    let (status, _) = call(&app, "DELETE", "/v1/bookings/current", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejected_bookings() {
    let app = test_app(Arc::new(BrokenProvider));

    let cases = [
        (json!({ "spot_id": "A2", "duration_hours": 1 }), StatusCode::CONFLICT),
        (json!({ "spot_id": "A1", "duration_hours": 0 }), StatusCode::BAD_REQUEST),
        (json!({ "spot_id": "A1", "duration_hours": 121 }), StatusCode::BAD_REQUEST),
        (json!({ "spot_id": "Z9", "duration_hours": 1 }), StatusCode::NOT_FOUND),
    ];

    for (body, expected) in cases {
        let (status, error) = call(&app, "POST", "/v1/bookings", Some(body)).await;
        assert_eq!(status, expected);
        assert!(error["error"].is_string());
    }

    let (_, occupancy) = call(&app, "GET", "/v1/occupancy", None).await;
    assert_eq!(occupancy["available"], 3);

    let (status, _) = call(&app, "GET", "/v1/bookings/current", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_failure_falls_back_without_touching_lot() {
    let app = test_app(Arc::new(BrokenProvider));

    call(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({ "spot_id": "A4", "duration_hours": 3 })),
    )
    .await;
    let (_, spots_before) = call(&app, "GET", "/v1/spots", None).await;

    let (status, reply) = call(&app, "POST", "/v1/chat", Some(json!({ "text": "How long do I have?" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["fallback"], true);
    assert_eq!(reply["reply"]["text"], FALLBACK_REPLY);
    assert_eq!(reply["user"]["sender"], "user");

    let (_, spots_after) = call(&app, "GET", "/v1/spots", None).await;
    assert_eq!(spots_after, spots_before);

    let (status, _) = call(&app, "GET", "/v1/bookings/current", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, transcript) = call(&app, "GET", "/v1/chat", None).await;
    let messages = transcript.as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["text"], "How long do I have?");
    assert!(messages[1]["id"].as_u64() < messages[2]["id"].as_u64());
}

#[tokio::test]
async fn test_chat_prompt_carries_occupancy() {
    let app = test_app(Arc::new(ContextEcho));

    let (status, reply) = call(&app, "POST", "/v1/chat", Some(json!({ "text": "Any space left?" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["fallback"], false);
    assert_eq!(
        reply["reply"]["text"],
        "Current parking lot status: 3 spots available, 2 spots occupied, out of 5 total spots."
    );
}

#[tokio::test]
async fn test_empty_chat_message_rejected() {
    let app = test_app(Arc::new(ContextEcho));

    let (status, _) = call(&app, "POST", "/v1/chat", Some(json!({ "text": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, transcript) = call(&app, "GET", "/v1/chat", None).await;
    assert_eq!(transcript.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_lot_events_stream() {
    let app = test_app(Arc::new(BrokenProvider));
    let mut events = open_stream(&app, "/v1/events").await;

    let (status, booking) = call(
        &app,
        "POST",
        "/v1/bookings",
        Some(json!({ "spot_id": "A3", "duration_hours": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let started = next_event(&mut events).await;
    assert!(started.contains("event: lot"));
    assert!(started.contains(r#""type":"booking_started""#));
    assert!(started.contains(&format!(r#""booking_id":"{}""#, booking["id"].as_str().unwrap())));

    call(&app, "DELETE", "/v1/bookings/current", None).await;
    let ended = next_event(&mut events).await;
    assert!(ended.contains(r#""type":"booking_ended""#));
    assert!(ended.contains(r#""spot_id":"A3""#));
}

#[tokio::test]
async fn test_status_stream() {
    let state = test_state(Arc::new(BrokenProvider));
    let (lot, status_tx) = (state.lot.clone(), state.status_tx.clone());
    let app = app(state);

    let mut ticks = open_stream(&app, "/v1/bookings/current/stream").await;

    lot.start_booking("A1", 1, Utc::now()).await.unwrap();
    status_tx.send(status_tick(&lot, Utc::now()).await).unwrap();

    let tick = next_event(&mut ticks).await;
    assert!(tick.contains("event: status"));
    assert!(tick.contains(r#""state":"ACTIVE""#));
    assert!(tick.contains(r#""spot_id":"A1""#));
}
