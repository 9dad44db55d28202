use crate::domain::event::{
    BastionErrorEvent, BastionFailureEvent, BastionFinishedEvent, BastionStartedEvent,
};
use crate::domain::ports::BastionListener;

/// Insertion-ordered set of listeners.
///
/// Events go to every listener synchronously, in registration order. A
/// panicking listener is not isolated: the panic leaves the dispatcher and the
/// remaining listeners are skipped.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn BastionListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: impl BastionListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify_call_started(&self, event: &BastionStartedEvent) {
        self.listeners.iter().for_each(|l| l.call_started(event));
    }

    pub fn notify_call_failed(&self, event: &BastionFailureEvent<'_>) {
        self.listeners.iter().for_each(|l| l.call_failed(event));
    }

    pub fn notify_call_error(&self, event: &BastionErrorEvent<'_>) {
        self.listeners.iter().for_each(|l| l.call_error(event));
    }

    pub fn notify_call_finished(&self, event: &BastionFinishedEvent<'_>) {
        self.listeners.iter().for_each(|l| l.call_finished(event));
    }
}
