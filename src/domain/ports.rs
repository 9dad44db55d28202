use crate::domain::event::{
    BastionErrorEvent, BastionFailureEvent, BastionFinishedEvent, BastionStartedEvent,
};
use crate::domain::request::Request;
use crate::domain::response::{ModelResponse, Response};
use crate::utils::error::{AssertionError, Result};
use std::any::TypeId;
use std::rc::Rc;
use std::sync::Arc;

/// Transport: turns a request into a response. Blocks until done.
pub trait RequestExecutor {
    fn execute(&self, request: &dyn Request) -> Result<Response>;
}

impl<E: RequestExecutor + ?Sized> RequestExecutor for Arc<E> {
    fn execute(&self, request: &dyn Request) -> Result<Response> {
        (**self).execute(request)
    }
}

/// Describes the model a converter is being asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodingHints {
    model_type: TypeId,
    model_type_name: &'static str,
}

impl DecodingHints {
    pub fn for_model<M: 'static>() -> Self {
        Self {
            model_type: TypeId::of::<M>(),
            model_type_name: std::any::type_name::<M>(),
        }
    }

    pub fn model_type(&self) -> TypeId {
        self.model_type
    }

    pub fn model_type_name(&self) -> &'static str {
        self.model_type_name
    }
}

/// Attempts to decode a response into `M`.
///
/// Returns `None` when the converter cannot handle the response; it never fails
/// and never modifies the response.
pub trait ResponseModelConverter<M> {
    fn decode(&self, response: &Response, hints: &DecodingHints) -> Option<M>;
}

impl<M, F> ResponseModelConverter<M> for F
where
    F: Fn(&Response, &DecodingHints) -> Option<M>,
{
    fn decode(&self, response: &Response, hints: &DecodingHints) -> Option<M> {
        self(response, hints)
    }
}

/// Checks run against the decoded response. A rejection is an expected test
/// failure, reported separately from unexpected errors.
pub trait Assertions<M> {
    fn execute(
        &self,
        status_code: u16,
        response: &ModelResponse<M>,
        model: &M,
    ) -> std::result::Result<(), AssertionError>;

    /// Runs `self`, then `other` if `self` passed.
    fn and<B>(self, other: B) -> AndAssertions<Self, B>
    where
        Self: Sized,
        B: Assertions<M>,
    {
        AndAssertions {
            first: self,
            second: other,
        }
    }
}

impl<M, F> Assertions<M> for F
where
    F: Fn(u16, &ModelResponse<M>, &M) -> std::result::Result<(), AssertionError>,
{
    fn execute(
        &self,
        status_code: u16,
        response: &ModelResponse<M>,
        model: &M,
    ) -> std::result::Result<(), AssertionError> {
        self(status_code, response, model)
    }
}

pub struct AndAssertions<A, B> {
    first: A,
    second: B,
}

impl<M, A: Assertions<M>, B: Assertions<M>> Assertions<M> for AndAssertions<A, B> {
    fn execute(
        &self,
        status_code: u16,
        response: &ModelResponse<M>,
        model: &M,
    ) -> std::result::Result<(), AssertionError> {
        self.first.execute(status_code, response, model)?;
        self.second.execute(status_code, response, model)
    }
}

/// Follow-up action run after the assertions. Any error it returns is an
/// unexpected error, not an assertion failure.
pub trait Callback<M> {
    fn execute(&self, status_code: u16, response: &ModelResponse<M>, model: &M)
        -> anyhow::Result<()>;
}

impl<M, F> Callback<M> for F
where
    F: Fn(u16, &ModelResponse<M>, &M) -> anyhow::Result<()>,
{
    fn execute(
        &self,
        status_code: u16,
        response: &ModelResponse<M>,
        model: &M,
    ) -> anyhow::Result<()> {
        self(status_code, response, model)
    }
}

/// Observer of call lifecycle events. Every method defaults to doing nothing.
pub trait BastionListener {
    fn call_started(&self, _event: &BastionStartedEvent) {}

    fn call_failed(&self, _event: &BastionFailureEvent<'_>) {}

    fn call_error(&self, _event: &BastionErrorEvent<'_>) {}

    fn call_finished(&self, _event: &BastionFinishedEvent<'_>) {}
}

macro_rules! forward_listener {
    ($ptr:ident) => {
        impl<L: BastionListener + ?Sized> BastionListener for $ptr<L> {
            fn call_started(&self, event: &BastionStartedEvent) {
                (**self).call_started(event)
            }

            fn call_failed(&self, event: &BastionFailureEvent<'_>) {
                (**self).call_failed(event)
            }

            fn call_error(&self, event: &BastionErrorEvent<'_>) {
                (**self).call_error(event)
            }

            fn call_finished(&self, event: &BastionFinishedEvent<'_>) {
                (**self).call_finished(event)
            }
        }
    };
}

forward_listener!(Arc);
forward_listener!(Rc);
