//! Lifecycle events published while a call runs.
//!
//! Events are snapshots built for one transition, handed to every listener by
//! reference and dropped afterwards.

use crate::domain::response::DecodedResponse;
use crate::utils::error::{AssertionError, BastionError};

#[derive(Debug, Clone)]
pub struct BastionStartedEvent {
    descriptive_text: String,
}

impl BastionStartedEvent {
    pub fn new(descriptive_text: impl Into<String>) -> Self {
        Self {
            descriptive_text: descriptive_text.into(),
        }
    }

    pub fn descriptive_text(&self) -> &str {
        &self.descriptive_text
    }
}

#[derive(Debug, Clone)]
pub struct BastionFailureEvent<'a> {
    descriptive_text: String,
    model_response: Option<&'a dyn DecodedResponse>,
    cause: &'a AssertionError,
}

impl<'a> BastionFailureEvent<'a> {
    pub fn new(
        descriptive_text: impl Into<String>,
        model_response: Option<&'a dyn DecodedResponse>,
        cause: &'a AssertionError,
    ) -> Self {
        Self {
            descriptive_text: descriptive_text.into(),
            model_response,
            cause,
        }
    }

    pub fn descriptive_text(&self) -> &str {
        &self.descriptive_text
    }

    pub fn model_response(&self) -> Option<&'a dyn DecodedResponse> {
        self.model_response
    }

    pub fn cause(&self) -> &'a AssertionError {
        self.cause
    }
}

#[derive(Debug, Clone)]
pub struct BastionErrorEvent<'a> {
    descriptive_text: String,
    model_response: Option<&'a dyn DecodedResponse>,
    cause: &'a BastionError,
}

impl<'a> BastionErrorEvent<'a> {
    pub fn new(
        descriptive_text: impl Into<String>,
        model_response: Option<&'a dyn DecodedResponse>,
        cause: &'a BastionError,
    ) -> Self {
        Self {
            descriptive_text: descriptive_text.into(),
            model_response,
            cause,
        }
    }

    pub fn descriptive_text(&self) -> &str {
        &self.descriptive_text
    }

    pub fn model_response(&self) -> Option<&'a dyn DecodedResponse> {
        self.model_response
    }

    pub fn cause(&self) -> &'a BastionError {
        self.cause
    }
}

#[derive(Debug, Clone)]
pub struct BastionFinishedEvent<'a> {
    descriptive_text: String,
    model_response: Option<&'a dyn DecodedResponse>,
}

impl<'a> BastionFinishedEvent<'a> {
    pub fn new(
        descriptive_text: impl Into<String>,
        model_response: Option<&'a dyn DecodedResponse>,
    ) -> Self {
        Self {
            descriptive_text: descriptive_text.into(),
            model_response,
        }
    }

    pub fn descriptive_text(&self) -> &str {
        &self.descriptive_text
    }

    pub fn model_response(&self) -> Option<&'a dyn DecodedResponse> {
        self.model_response
    }
}
