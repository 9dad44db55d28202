use crate::domain::event::{BastionErrorEvent, BastionFailureEvent, BastionStartedEvent};
use crate::domain::ports::BastionListener;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Passed,
    Failed(String),
    Errored(String),
}

impl CallOutcome {
    /// 0 passed, 1 failed, 2 errored
    pub fn exit_code(&self) -> i32 {
        match self {
            CallOutcome::Passed => 0,
            CallOutcome::Failed(_) => 1,
            CallOutcome::Errored(_) => 2,
        }
    }
}

/// Remembers how the most recent call ended.
///
/// Share it through an `Arc` and read [`OutcomeRecorder::outcome`] once the
/// call has returned.
#[derive(Debug, Default)]
pub struct OutcomeRecorder {
    outcome: Mutex<Option<CallOutcome>>,
}

impl OutcomeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until a call has started.
    pub fn outcome(&self) -> Option<CallOutcome> {
        self.outcome.lock().ok().and_then(|outcome| outcome.clone())
    }

    fn record(&self, outcome: CallOutcome) {
        if let Ok(mut current) = self.outcome.lock() {
            *current = Some(outcome);
        }
    }
}

impl BastionListener for OutcomeRecorder {
    fn call_started(&self, _event: &BastionStartedEvent) {
        self.record(CallOutcome::Passed);
    }

    fn call_failed(&self, event: &BastionFailureEvent<'_>) {
        self.record(CallOutcome::Failed(event.cause().to_string()));
    }

    fn call_error(&self, event: &BastionErrorEvent<'_>) {
        self.record(CallOutcome::Errored(event.cause().to_string()));
    }
}
