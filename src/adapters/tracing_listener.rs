use crate::domain::event::{
    BastionErrorEvent, BastionFailureEvent, BastionFinishedEvent, BastionStartedEvent,
};
use crate::domain::ports::BastionListener;

/// Writes every lifecycle event to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl TracingListener {
    pub fn new() -> Self {
        Self
    }
}

impl BastionListener for TracingListener {
    fn call_started(&self, event: &BastionStartedEvent) {
        tracing::info!("▶️  {}", event.descriptive_text());
    }

    fn call_failed(&self, event: &BastionFailureEvent<'_>) {
        tracing::warn!("❌ {} failed: {}", event.descriptive_text(), event.cause());
    }

    fn call_error(&self, event: &BastionErrorEvent<'_>) {
        tracing::error!("💥 {} errored: {}", event.descriptive_text(), event.cause());
    }

    fn call_finished(&self, event: &BastionFinishedEvent<'_>) {
        match event.model_response() {
            Some(response) => tracing::info!(
                "🏁 {} finished with status {}",
                event.descriptive_text(),
                response.status_code()
            ),
            None => tracing::info!("🏁 {} finished without a response", event.descriptive_text()),
        }
    }
}
