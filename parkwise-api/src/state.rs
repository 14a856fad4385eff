use parkwise_assistant::{AssistantBridge, ChatLog};
use parkwise_store::LotStore;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::worker::StatusTick;

#[derive(Clone)]
pub struct AppState {
    pub lot: Arc<LotStore>,
    pub assistant: Arc<AssistantBridge>,
    pub chat: Arc<RwLock<ChatLog>>,
    pub status_tx: broadcast::Sender<StatusTick>,
}

impl AppState {
    pub fn new(lot: Arc<LotStore>, assistant: Arc<AssistantBridge>) -> Self {
        let (status_tx, _) = broadcast::channel(16);
        Self {
            lot,
            assistant,
            chat: Arc::new(RwLock::new(ChatLog::new())),
            status_tx,
        }
    }
}
