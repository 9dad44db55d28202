use crate::domain::method::HttpMethod;
use crate::domain::request::{GeneralRequest, APPLICATION_JSON};
use crate::utils::error::{BastionError, Result};
use crate::utils::validation::Validate;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Body as plain text
    Text,
    /// Body as a JSON document
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "bastion")]
#[command(about = "Execute one HTTP API test call and report its outcome")]
pub struct CliConfig {
    #[arg(long, help = "Request URL, absolute or relative to http.base_url")]
    pub url: String,

    #[arg(long, default_value = "GET")]
    pub method: String,

    #[arg(long, help = "Request name used in reports")]
    pub name: Option<String>,

    #[arg(long, default_value = "", help = "Human-readable description of the call")]
    pub message: String,

    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    #[arg(long = "query", value_name = "NAME=VALUE")]
    pub query_params: Vec<String>,

    #[arg(long)]
    pub body: Option<String>,

    #[arg(long)]
    pub content_type: Option<String>,

    #[arg(long = "expect-status", value_delimiter = ',')]
    pub expected_status: Vec<u16>,

    #[arg(long = "expect-json", help = "Expected JSON body")]
    pub expected_json: Option<String>,

    #[arg(long, value_enum, default_value_t = ModelKind::Text)]
    pub model: ModelKind,

    #[arg(long)]
    pub suppress_assertions: bool,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn to_request(&self) -> Result<GeneralRequest> {
        let mut request = GeneralRequest::new(HttpMethod::new(self.method.to_uppercase()), &self.url);

        if let Some(name) = &self.name {
            request = request.with_name(name);
        }

        for header in &self.headers {
            let (name, value) = split_pair("header", header, ':')?;
            request = request.add_header(name, value);
        }

        for param in &self.query_params {
            let (name, value) = split_pair("query", param, '=')?;
            request = request.add_query_param(name, value);
        }

        if let Some(content_type) = &self.content_type {
            request = request.with_content_type(content_type);
        } else if self.body.is_some() && self.model == ModelKind::Json {
            request = request.with_content_type(APPLICATION_JSON);
        }

        if let Some(body) = &self.body {
            request = request.with_body(body);
        }

        Ok(request)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        crate::utils::validation::validate_non_empty_string("url", &self.url)?;
        crate::utils::validation::validate_non_empty_string("method", &self.method)?;

        if let Some(expected) = &self.expected_json {
            serde_json::from_str::<serde_json::Value>(expected).map_err(|e| {
                BastionError::InvalidConfigValueError {
                    field: "expect-json".to_string(),
                    value: expected.clone(),
                    reason: format!("Invalid JSON: {}", e),
                }
            })?;
        }
        Ok(())
    }
}

fn split_pair(field: &str, raw: &str, separator: char) -> Result<(String, String)> {
    match raw.split_once(separator) {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(BastionError::InvalidConfigValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: format!("Expected NAME{}VALUE", separator),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::Request;

    #[test]
    fn test_cli_builds_request() {
        let config = CliConfig::parse_from([
            "bastion",
            "--url",
            "http://localhost/users",
            "--method",
            "post",
            "-H",
            "X-Api-Key: secret",
            "--query",
            "page=2",
            "--body",
            r#"{"name":"sally"}"#,
            "--model",
            "json",
            "--expect-status",
            "200,201",
        ]);

        let request = config.to_request().unwrap();
        assert_eq!(request.method(), HttpMethod::POST);
        assert_eq!(request.headers(), &[("X-Api-Key".to_string(), "secret".to_string())]);
        assert_eq!(request.query_params(), &[("page".to_string(), "2".to_string())]);
        assert_eq!(request.content_type(), Some(APPLICATION_JSON));
        assert_eq!(config.expected_status, vec![200, 201]);
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        let config = CliConfig::parse_from(["bastion", "--url", "http://localhost", "-H", "broken"]);
        assert!(config.to_request().unwrap_err().is_config_error());
    }

    #[test]
    fn test_invalid_expected_json_fails_validation() {
        let config = CliConfig::parse_from([
            "bastion",
            "--url",
            "http://localhost",
            "--expect-json",
            "{oops",
        ]);
        assert!(config.validate().is_err());
    }
}
