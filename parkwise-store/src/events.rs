use parkwise_shared::models::events::LotEvent;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// In-process fan-out of lot transitions to SSE subscribers
#[derive(Clone)]
pub struct EventPublisher {
    tx: broadcast::Sender<LotEvent>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LotEvent> {
        self.tx.subscribe()
    }

    /// Returns how many subscribers received the event
    pub fn publish(&self, event: LotEvent) -> usize {
        let spot_id = event.spot_id().to_string();
        match self.tx.send(event) {
            Ok(receivers) => {
                info!("Published lot event for spot {} to {} subscriber(s)", spot_id, receivers);
                receivers
            }
            Err(_) => {
                debug!("No subscribers for lot event on spot {}", spot_id);
                0
            }
        }
    }
}
