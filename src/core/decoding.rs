use crate::domain::ports::{DecodingHints, ResponseModelConverter};
use crate::domain::response::{is_json_content_type, Response};
use crate::utils::error::AssertionError;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Ordered list of converters; the first one to produce a model wins.
pub struct ConverterChain<M> {
    converters: Vec<Box<dyn ResponseModelConverter<M>>>,
}

impl<M: 'static> ConverterChain<M> {
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    pub fn register(&mut self, converter: impl ResponseModelConverter<M> + 'static) {
        self.converters.push(Box::new(converter));
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn decode(&self, response: &Response) -> Result<M, AssertionError> {
        let hints = DecodingHints::for_model::<M>();

        for (index, converter) in self.converters.iter().enumerate() {
            if let Some(model) = converter.decode(response, &hints) {
                tracing::debug!(
                    "Converter #{} decoded response into {}",
                    index,
                    hints.model_type_name()
                );
                return Ok(model);
            }
        }

        Err(AssertionError::new(format!(
            "Could not parse response into model object of type {}",
            hints.model_type_name()
        )))
    }
}

impl<M: 'static> Default for ConverterChain<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands back the response body as text, whatever its content type.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringModelConverter;

impl ResponseModelConverter<String> for StringModelConverter {
    fn decode(&self, response: &Response, _hints: &DecodingHints) -> Option<String> {
        Some(response.body_text().into_owned())
    }
}

/// Deserializes JSON bodies with serde.
///
/// Declines responses whose declared content type is not JSON, and bodies that
/// do not deserialize into `M`. Responses without a content type are attempted.
pub struct JsonModelConverter<M> {
    _model: PhantomData<fn() -> M>,
}

impl<M> JsonModelConverter<M> {
    pub fn new() -> Self {
        Self {
            _model: PhantomData,
        }
    }
}

impl<M> Default for JsonModelConverter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: DeserializeOwned> ResponseModelConverter<M> for JsonModelConverter<M> {
    fn decode(&self, response: &Response, hints: &DecodingHints) -> Option<M> {
        if let Some(content_type) = response.content_type() {
            if !is_json_content_type(content_type) {
                tracing::trace!("Skipping JSON decoding for content type {}", content_type);
                return None;
            }
        }

        match response.json::<M>() {
            Ok(model) => Some(model),
            Err(e) => {
                tracing::debug!("Body is not a valid {}: {}", hints.model_type_name(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Status {
        code: i32,
    }

    fn json_response(body: &str) -> Response {
        Response::new(200, "OK")
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    #[test]
    fn test_first_present_result_wins() {
        let mut chain: ConverterChain<Status> = ConverterChain::new();
        chain.register(|_: &Response, _: &DecodingHints| -> Option<Status> { None });
        chain.register(|_: &Response, _: &DecodingHints| Some(Status { code: 1 }));
        chain.register(|_: &Response, _: &DecodingHints| Some(Status { code: 2 }));

        let model = chain.decode(&json_response("{}")).unwrap();
        assert_eq!(model, Status { code: 1 });
    }

    #[test]
    fn test_no_match_names_requested_type() {
        let chain: ConverterChain<Status> = ConverterChain::new();
        let err = chain.decode(&json_response("{}")).unwrap_err();
        assert!(err.message().contains("Status"));
    }

    #[test]
    fn test_json_converter() {
        let converter = JsonModelConverter::<Status>::new();
        let hints = DecodingHints::for_model::<Status>();

        assert_eq!(
            converter.decode(&json_response(r#"{"code":200}"#), &hints),
            Some(Status { code: 200 })
        );
        assert_eq!(converter.decode(&json_response("not json"), &hints), None);

        let text = Response::new(200, "OK")
            .with_header("Content-Type", "text/plain")
            .with_body(r#"{"code":200}"#);
        assert_eq!(converter.decode(&text, &hints), None);

        let untyped = Response::new(200, "OK").with_body(r#"{"code":201}"#);
        assert_eq!(converter.decode(&untyped, &hints), Some(Status { code: 201 }));
    }

    #[test]
    fn test_string_converter_accepts_anything() {
        let hints = DecodingHints::for_model::<String>();
        let response = Response::new(500, "Internal Server Error").with_body("boom");
        assert_eq!(
            StringModelConverter.decode(&response, &hints),
            Some("boom".to_string())
        );
    }
}
