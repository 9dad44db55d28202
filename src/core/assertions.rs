use crate::domain::ports::Assertions;
use crate::domain::response::{is_json_content_type, ModelResponse};
use crate::utils::error::AssertionError;
use serde_json::Value;

/// Accepts every response.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssertions;

impl<M> Assertions<M> for NoAssertions {
    fn execute(&self, _: u16, _: &ModelResponse<M>, _: &M) -> Result<(), AssertionError> {
        Ok(())
    }
}

pub fn no_assertions() -> NoAssertions {
    NoAssertions
}

/// Wraps a closure so its argument types are inferred from the model type.
pub fn from_fn<M, F>(f: F) -> FnAssertions<F>
where
    F: Fn(u16, &ModelResponse<M>, &M) -> Result<(), AssertionError>,
{
    FnAssertions(f)
}

pub struct FnAssertions<F>(F);

impl<M, F> Assertions<M> for FnAssertions<F>
where
    F: Fn(u16, &ModelResponse<M>, &M) -> Result<(), AssertionError>,
{
    fn execute(
        &self,
        status_code: u16,
        response: &ModelResponse<M>,
        model: &M,
    ) -> Result<(), AssertionError> {
        (self.0)(status_code, response, model)
    }
}

/// Passes when the status code is one of the expected codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeAssertions {
    expected: Vec<u16>,
}

impl StatusCodeAssertions {
    pub fn expecting(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            expected: codes.into_iter().collect(),
        }
    }
}

impl<M> Assertions<M> for StatusCodeAssertions {
    fn execute(&self, status_code: u16, _: &ModelResponse<M>, _: &M) -> Result<(), AssertionError> {
        if self.expected.contains(&status_code) {
            return Ok(());
        }
        Err(AssertionError::new(format!(
            "Expected response status code to be one of {:?}, but was {}",
            self.expected, status_code
        )))
    }
}

/// Compares the response body with an expected JSON document.
///
/// The response must declare a JSON content type. Values at the JSON pointers
/// given to [`JsonResponseAssertions::ignore_value_at`] are left out of the
/// comparison on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponseAssertions {
    expected: Value,
    status_code: Option<u16>,
    ignored: Vec<String>,
}

impl JsonResponseAssertions {
    pub fn with_expected(expected: Value) -> Self {
        Self {
            expected,
            status_code: Some(200),
            ignored: Vec::new(),
        }
    }

    pub fn from_json_str(expected: &str) -> serde_json::Result<Self> {
        Ok(Self::with_expected(serde_json::from_str(expected)?))
    }

    /// Expected status code; `None` skips the check. Defaults to 200.
    pub fn with_status_code(mut self, status_code: Option<u16>) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn ignore_value_at(mut self, pointer: impl Into<String>) -> Self {
        self.ignored.push(pointer.into());
        self
    }

    fn strip_ignored(&self, mut value: Value) -> Value {
        for pointer in &self.ignored {
            if let Some(target) = value.pointer_mut(pointer) {
                *target = Value::Null;
            }
        }
        value
    }
}

impl<M> Assertions<M> for JsonResponseAssertions {
    fn execute(
        &self,
        status_code: u16,
        response: &ModelResponse<M>,
        _: &M,
    ) -> Result<(), AssertionError> {
        if let Some(expected_status) = self.status_code {
            if status_code != expected_status {
                return Err(AssertionError::new(format!(
                    "Expected response status code to be {}, but was {}",
                    expected_status, status_code
                )));
            }
        }

        let raw = response.response();
        match raw.content_type() {
            Some(content_type) if is_json_content_type(content_type) => {}
            other => {
                return Err(AssertionError::new(format!(
                    "Expected a JSON content type, but was {}",
                    other.unwrap_or("<none>")
                )))
            }
        }

        let actual: Value = raw.json().map_err(|e| {
            AssertionError::new(format!("Response body is not valid JSON: {}", e))
        })?;

        let actual = self.strip_ignored(actual);
        let expected = self.strip_ignored(self.expected.clone());
        if actual != expected {
            return Err(AssertionError::new(format!(
                "JSON response did not match.\nExpected: {}\nActual:   {}",
                expected, actual
            )));
        }
        Ok(())
    }
}
