use crate::adapters::reqwest_executor::ReqwestExecutor;
use crate::core::assertions::NoAssertions;
use crate::core::callback::NoCallback;
use crate::core::decoding::{ConverterChain, JsonModelConverter};
use crate::core::dispatch::ListenerRegistry;
use crate::core::factory::BastionFactory;
use crate::domain::event::{
    BastionErrorEvent, BastionFailureEvent, BastionFinishedEvent, BastionStartedEvent,
};
use crate::domain::ports::{
    Assertions, BastionListener, Callback, RequestExecutor, ResponseModelConverter,
};
use crate::domain::request::Request;
use crate::domain::response::{DecodedResponse, ModelResponse, Response};
use crate::utils::error::{AssertionError, BastionError};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Builder state before a model type has been bound.
pub struct Unbound;

/// Builder state once the model type `M` is known.
pub struct Bound<M> {
    converters: ConverterChain<M>,
    assertions: Box<dyn Assertions<M>>,
    callback: Box<dyn Callback<M>>,
}

/// One API test call: request execution, model decoding, assertions and a
/// callback, with lifecycle events published to the registered listeners.
///
/// Start with [`Bastion::api`], [`bind`](Bastion::bind) the model type, then
/// configure assertions and callback before [`call`](Bastion::call). The
/// outcome is only observable through listeners.
pub struct Bastion<'r, S = Unbound> {
    message: String,
    request: &'r dyn Request,
    executor: Option<Arc<dyn RequestExecutor>>,
    listeners: ListenerRegistry,
    suppress_assertions: bool,
    state: S,
}

impl<'r, S> Bastion<'r, S> {
    pub fn register_listener(&mut self, listener: impl BastionListener + 'static) {
        self.listeners.register(listener);
    }

    pub fn set_executor(&mut self, executor: Arc<dyn RequestExecutor>) {
        self.executor = Some(executor);
    }

    /// When set, the assertion unit is skipped; the callback still runs.
    pub fn set_suppress_assertions(&mut self, suppress_assertions: bool) {
        self.suppress_assertions = suppress_assertions;
    }

    pub fn suppress_assertions(&self) -> bool {
        self.suppress_assertions
    }

    fn descriptive_text(&self) -> String {
        if self.message.is_empty() {
            self.request.name()
        } else {
            format!("{} - {}", self.request.name(), self.message)
        }
    }
}

impl<'r> Bastion<'r, Unbound> {
    /// Entry point using the default factory.
    pub fn api(message: impl Into<String>, request: &'r dyn Request) -> Self {
        BastionFactory::default().api(message, request)
    }

    pub(crate) fn new(message: impl Into<String>, request: &'r dyn Request) -> Self {
        Self {
            message: message.into(),
            request,
            executor: None,
            listeners: ListenerRegistry::new(),
            suppress_assertions: false,
            state: Unbound,
        }
    }

    /// Declares the model type; consumes the unbound builder.
    pub fn bind<M: 'static>(self) -> Bastion<'r, Bound<M>> {
        Bastion {
            message: self.message,
            request: self.request,
            executor: self.executor,
            listeners: self.listeners,
            suppress_assertions: self.suppress_assertions,
            state: Bound {
                converters: ConverterChain::new(),
                assertions: Box::new(NoAssertions),
                callback: Box::new(NoCallback),
            },
        }
    }
}

impl<'r, M: DeserializeOwned + 'static> Bastion<'r, Bound<M>> {
    /// Registers a [`JsonModelConverter`] for the bound model.
    pub fn with_default_converters(mut self) -> Self {
        self.register_model_converter(JsonModelConverter::<M>::new());
        self
    }
}

impl<'r, M: 'static> Bastion<'r, Bound<M>> {
    /// Appends a decoder; decoders are tried in registration order.
    pub fn register_model_converter(&mut self, converter: impl ResponseModelConverter<M> + 'static) {
        self.state.converters.register(converter);
    }

    /// Replaces the assertion unit.
    pub fn with_assertions(mut self, assertions: impl Assertions<M> + 'static) -> Self {
        self.state.assertions = Box::new(assertions);
        self
    }

    /// Replaces the callback run after the assertions.
    pub fn then_do(mut self, callback: impl Callback<M> + 'static) -> Self {
        self.state.callback = Box::new(callback);
        self
    }

    /// Runs the whole lifecycle on the current thread.
    ///
    /// Started is published first and Finished last, whatever happens in
    /// between. Assertion failures (including an undecodable response) are
    /// published as Failed, anything else as Error. A panicking listener
    /// propagates out of this method once Finished has been published. This
    /// includes a panic while publishing Started, which skips the request and
    /// is never reported as an Error event.
    pub fn call(self) {
        let mut model_response: Option<ModelResponse<M>> = None;

        let listener_panic = catch_unwind(AssertUnwindSafe(|| {
            self.listeners
                .notify_call_started(&BastionStartedEvent::new(self.descriptive_text()));
            let outcome = self.run_lifecycle(&mut model_response);
            self.publish_outcome(outcome, model_response.as_ref());
        }))
        .err();

        let decoded = model_response.as_ref().map(|r| r as &dyn DecodedResponse);
        self.listeners
            .notify_call_finished(&BastionFinishedEvent::new(self.descriptive_text(), decoded));

        if let Some(payload) = listener_panic {
            resume_unwind(payload);
        }
    }

    fn run_lifecycle(&self, slot: &mut Option<ModelResponse<M>>) -> Result<(), Interruption> {
        tracing::debug!("Executing request: {}", self.descriptive_text());
        let response = guarded(Stage::Execute, || self.execute_request())?;
        tracing::debug!("Received response with status {}", response.status_code());

        let model = guarded(Stage::Decode, || {
            self.state.converters.decode(&response).map_err(Interruption::from)
        })?;
        let model_response = &*slot.insert(ModelResponse::new(response, model));

        self.execute_assertions(model_response)?;
        self.execute_callback(model_response)
    }

    fn execute_request(&self) -> Result<Response, Interruption> {
        let response = match &self.executor {
            Some(executor) => executor.execute(self.request)?,
            None => ReqwestExecutor::new()?.execute(self.request)?,
        };
        Ok(response)
    }

    fn execute_assertions(&self, model_response: &ModelResponse<M>) -> Result<(), Interruption> {
        if self.suppress_assertions {
            tracing::debug!("Assertions suppressed for {}", self.descriptive_text());
            return Ok(());
        }
        guarded(Stage::Assertions, || {
            self.state
                .assertions
                .execute(
                    model_response.status_code(),
                    model_response,
                    model_response.model(),
                )
                .map_err(Interruption::from)
        })
    }

    fn execute_callback(&self, model_response: &ModelResponse<M>) -> Result<(), Interruption> {
        guarded(Stage::Callback, || {
            self.state
                .callback
                .execute(
                    model_response.status_code(),
                    model_response,
                    model_response.model(),
                )
                .map_err(|e| Interruption::Error(BastionError::CallbackError(e)))
        })
    }

    fn publish_outcome(
        &self,
        outcome: Result<(), Interruption>,
        model_response: Option<&ModelResponse<M>>,
    ) {
        let decoded = model_response.map(|r| r as &dyn DecodedResponse);
        match outcome {
            Ok(()) => tracing::debug!("Call passed: {}", self.descriptive_text()),
            Err(Interruption::Failed(cause)) => {
                tracing::warn!("Call failed: {}: {}", self.descriptive_text(), cause);
                self.listeners.notify_call_failed(&BastionFailureEvent::new(
                    self.descriptive_text(),
                    decoded,
                    &cause,
                ));
            }
            Err(Interruption::Error(cause)) => {
                tracing::warn!("Call errored: {}: {}", self.descriptive_text(), cause);
                self.listeners.notify_call_error(&BastionErrorEvent::new(
                    self.descriptive_text(),
                    decoded,
                    &cause,
                ));
            }
        }
    }
}

/// Why the lifecycle stopped early.
#[derive(Debug)]
enum Interruption {
    Failed(AssertionError),
    Error(BastionError),
}

impl From<AssertionError> for Interruption {
    fn from(e: AssertionError) -> Self {
        Interruption::Failed(e)
    }
}

impl From<BastionError> for Interruption {
    fn from(e: BastionError) -> Self {
        Interruption::Error(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Execute,
    Decode,
    Assertions,
    Callback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Execute => "request execution",
            Stage::Decode => "model decoding",
            Stage::Assertions => "assertions",
            Stage::Callback => "callback",
        };
        f.write_str(name)
    }
}

/// Runs one stage, turning a panic into an interruption. Panics inside the
/// assertion unit count as assertion failures, elsewhere as errors.
fn guarded<T>(
    stage: Stage,
    f: impl FnOnce() -> Result<T, Interruption>,
) -> Result<T, Interruption> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            Err(match stage {
                Stage::Assertions => Interruption::Failed(AssertionError::new(message)),
                _ => Interruption::Error(BastionError::Panic {
                    stage: stage.to_string(),
                    message,
                }),
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::GeneralRequest;

    #[test]
    fn test_descriptive_text() {
        let request = GeneralRequest::get("http://localhost/status").with_name("Status check");

        let bastion = Bastion::api("", &request);
        assert_eq!(bastion.descriptive_text(), "Status check");

        let bastion = Bastion::api("service is up", &request);
        assert_eq!(bastion.descriptive_text(), "Status check - service is up");
    }

    #[test]
    fn test_panic_in_assertions_is_a_failure() {
        let result: Result<(), Interruption> =
            guarded(Stage::Assertions, || panic!("expected 200 but was 404"));
        match result {
            Err(Interruption::Failed(e)) => assert_eq!(e.message(), "expected 200 but was 404"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_panic_elsewhere_is_an_error() {
        let result: Result<(), Interruption> =
            guarded(Stage::Callback, || panic!("{}", String::from("callback bug")));
        match result {
            Err(Interruption::Error(BastionError::Panic { stage, message })) => {
                assert_eq!(stage, "callback");
                assert_eq!(message, "callback bug");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
