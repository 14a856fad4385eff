use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,   // Normal operation
    Open,     // Failing fast
    HalfOpen, // One probe allowed through
}

struct BreakerInner {
    state: CircuitState,
    failure_count: usize,
    last_failure: Option<Instant>,
    /// When the current half-open probe was let through
    probe_started: Option<Instant>,
}

/// Stops calling the provider after repeated failures until `reset_timeout` passes
pub struct CircuitBreaker {
    name: String,
    failure_threshold: usize,
    reset_timeout: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: &str, threshold: usize, reset_timeout: Duration) -> Self {
        Self {
            name: name.to_string(),
            failure_threshold: threshold.max(1),
            reset_timeout,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                failure_count: 0,
                last_failure: None,
                probe_started: None,
            }),
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.inner.lock().await.state
    }

    /// Whether a call may go through right now.
    ///
    /// A probe that never reports back (its caller was cancelled) is replaced
    /// by a new one once `reset_timeout` has passed.
    pub async fn check(&self) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => {
                let stale = inner.probe_started.map(|t| t.elapsed() >= self.reset_timeout);
                if stale.unwrap_or(true) {
                    tracing::warn!("Circuit Breaker [{}] probe went unanswered, probing again", self.name);
                    inner.probe_started = Some(Instant::now());
                    true
                } else {
                    false
                }
            }
            CircuitState::Open => {
                let elapsed = inner.last_failure.map(|t| t.elapsed() >= self.reset_timeout);
                if elapsed.unwrap_or(true) {
                    inner.state = CircuitState::HalfOpen;
                    inner.probe_started = Some(Instant::now());
                    tracing::info!("Circuit Breaker [{}] moving to Half-Open", self.name);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub async fn record_success(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state != CircuitState::Closed {
            tracing::info!("Circuit Breaker [{}] recovered to Closed", self.name);
        }
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.probe_started = None;
    }

    pub async fn record_failure(&self) {
        let mut inner = self.inner.lock().await;
        inner.failure_count += 1;

        if inner.failure_count >= self.failure_threshold || inner.state == CircuitState::HalfOpen {
            inner.state = CircuitState::Open;
            inner.last_failure = Some(Instant::now());
            inner.probe_started = None;
            tracing::error!(
                "Circuit Breaker [{}] TRIPPED to Open. Failures: {}",
                self.name,
                inner.failure_count
            );
        }
    }
}
