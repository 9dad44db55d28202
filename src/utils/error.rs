use thiserror::Error;

#[derive(Error, Debug)]
pub enum BastionError {
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid request: {message}")]
    InvalidRequestError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Callback failed: {0}")]
    CallbackError(#[source] anyhow::Error),

    #[error("Unexpected panic during {stage}: {message}")]
    Panic { stage: String, message: String },
}

impl BastionError {
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BastionError::ConfigError { .. }
                | BastionError::InvalidConfigValueError { .. }
                | BastionError::MissingConfigError { .. }
        )
    }
}

/// Expected test failure: a decode mismatch or a rejected assertion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Result<T> = std::result::Result<T, BastionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_classified() {
        let err = BastionError::MissingConfigError {
            field: "http.base_url".to_string(),
        };
        assert!(err.is_config_error());

        let err = BastionError::InvalidRequestError {
            message: "bad".to_string(),
        };
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_assertion_error_display() {
        let err = AssertionError::new("Expected 200 but was 404");
        assert_eq!(err.to_string(), "Expected 200 but was 404");
        assert_eq!(err.message(), "Expected 200 but was 404");
    }
}
