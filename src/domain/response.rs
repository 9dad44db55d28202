use serde::de::DeserializeOwned;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;

/// The raw result of executing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status_code: u16,
    status_text: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of the header called `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn is_json(&self) -> bool {
        self.content_type().is_some_and(is_json_content_type)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// `application/json` and `+json` suffixed media types, parameters ignored.
pub fn is_json_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

/// A response paired with the model decoded from it. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse<M> {
    response: Response,
    model: M,
}

impl<M> ModelResponse<M> {
    pub fn new(response: Response, model: M) -> Self {
        Self { response, model }
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn status_code(&self) -> u16 {
        self.response.status_code
    }
}

/// Type-erased view of a [`ModelResponse`], handed to listeners which are
/// shared between calls with different model types.
pub trait DecodedResponse {
    fn response(&self) -> &Response;
    fn model_any(&self) -> &dyn Any;
    fn model_type_name(&self) -> &'static str;
}

impl<M: 'static> DecodedResponse for ModelResponse<M> {
    fn response(&self) -> &Response {
        &self.response
    }

    fn model_any(&self) -> &dyn Any {
        &self.model
    }

    fn model_type_name(&self) -> &'static str {
        std::any::type_name::<M>()
    }
}

impl dyn DecodedResponse + '_ {
    pub fn status_code(&self) -> u16 {
        self.response().status_code()
    }

    pub fn model<T: 'static>(&self) -> Option<&T> {
        self.model_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for dyn DecodedResponse + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedResponse")
            .field("response", self.response())
            .field("model_type", &self.model_type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = Response::new(200, "OK").with_header("Content-Type", "application/json; charset=utf-8");
        assert_eq!(
            response.header("content-type"),
            Some("application/json; charset=utf-8")
        );
        assert!(response.is_json());
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/problem+json"));
        assert!(is_json_content_type("Application/JSON;charset=UTF-8"));
        assert!(!is_json_content_type("text/plain"));
    }

    #[test]
    fn test_decoded_response_downcast() {
        let model_response = ModelResponse::new(Response::new(201, "Created"), 7u32);
        let decoded: &dyn DecodedResponse = &model_response;

        assert_eq!(decoded.status_code(), 201);
        assert_eq!(decoded.model::<u32>(), Some(&7));
        assert_eq!(decoded.model::<String>(), None);
        assert_eq!(decoded.model_type_name(), "u32");
    }
}
