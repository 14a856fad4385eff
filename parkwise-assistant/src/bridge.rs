use chrono::{DateTime, Utc};
use parkwise_booking::Booking;
use parkwise_catalog::Tariff;
use parkwise_core::assistant::{
    AssistantAdapter, AssistantError, AssistantRequest, DisabledAssistant, FALLBACK_REPLY,
};
use parkwise_shared::{ChatMessage, OccupancySnapshot};
use parkwise_store::app_config::AssistantConfig;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::gemini::GeminiAdapter;
use crate::prompt::build_system_instruction;
use crate::resiliency::CircuitBreaker;

/// Read-only lot state the prompt is built from
#[derive(Debug, Clone)]
pub struct AssistantContext {
    pub occupancy: OccupancySnapshot,
    pub booking: Option<Booking>,
    pub tariff: Tariff,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    /// True when the provider failed and the canned reply was used
    pub fallback: bool,
}

impl AssistantReply {
    fn fallback() -> Self {
        Self {
            text: FALLBACK_REPLY.to_string(),
            fallback: true,
        }
    }
}

/// Clears the busy flag when the request finishes, however it finishes
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Wraps a provider with a timeout, a circuit breaker and a single fallback reply.
///
/// Never touches lot state; callers pass in a snapshot.
pub struct AssistantBridge {
    adapter: Arc<dyn AssistantAdapter>,
    model: String,
    timeout: Duration,
    breaker: CircuitBreaker,
    busy: AtomicBool,
}

impl AssistantBridge {
    pub fn new(
        adapter: Arc<dyn AssistantAdapter>,
        model: &str,
        timeout: Duration,
        breaker: CircuitBreaker,
    ) -> Self {
        Self {
            adapter,
            model: model.to_string(),
            timeout,
            breaker,
            busy: AtomicBool::new(false),
        }
    }

    /// Gemini when a key is configured, otherwise an adapter that always falls back
    pub fn from_config(config: &AssistantConfig) -> Self {
        let adapter: Arc<dyn AssistantAdapter> = match &config.api_key {
            Some(key) => Arc::new(GeminiAdapter::new(&config.api_url, key.expose().clone())),
            None => {
                warn!("No assistant API key configured; chat will answer with the fallback message");
                Arc::new(DisabledAssistant)
            }
        };
        info!("Assistant provider: {} ({})", adapter.name(), config.model);

        Self::new(
            adapter,
            &config.model,
            Duration::from_secs(config.timeout_seconds),
            CircuitBreaker::new(
                "assistant",
                config.failure_threshold,
                Duration::from_secs(config.reset_seconds),
            ),
        )
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Answer one user message.
    ///
    /// The only error is `Busy`, returned while another request is in flight.
    /// Provider failures, timeouts and an open circuit all become the fallback reply.
    pub async fn respond(
        &self,
        user_text: &str,
        history: &[ChatMessage],
        context: &AssistantContext,
    ) -> Result<AssistantReply, AssistantError> {
        let _guard = self.try_acquire()?;

        let request = AssistantRequest {
            model: self.model.clone(),
            system_instruction: build_system_instruction(
                &context.occupancy,
                context.booking.as_ref(),
                &context.tariff,
                context.now,
            ),
            history: history.to_vec(),
            user_text: user_text.to_string(),
        };

        match self.call(&request).await {
            Ok(text) => Ok(AssistantReply { text, fallback: false }),
            Err(e) => {
                warn!("Assistant [{}] failed, using fallback: {}", self.adapter.name(), e);
                Ok(AssistantReply::fallback())
            }
        }
    }

    fn try_acquire(&self) -> Result<BusyGuard<'_>, AssistantError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard(&self.busy))
            .map_err(|_| AssistantError::Busy)
    }

    async fn call(&self, request: &AssistantRequest) -> Result<String, AssistantError> {
        if !self.breaker.check().await {
            return Err(AssistantError::CircuitOpen);
        }

        let result = match tokio::time::timeout(self.timeout, self.adapter.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(AssistantError::Timeout(self.timeout.as_secs())),
        };

        match &result {
            Ok(_) => self.breaker.record_success().await,
            Err(AssistantError::NotConfigured) => {}
            Err(_) => self.breaker.record_failure().await,
        }
        result
    }
}
