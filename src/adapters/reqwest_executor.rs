use crate::config::toml_config::BastionConfig;
use crate::domain::ports::RequestExecutor;
use crate::domain::request::{resolve_url, Request};
use crate::domain::response::Response;
use crate::utils::error::{BastionError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = concat!("bastion/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default)]
pub struct ExecutorOptions {
    pub base_url: Option<Url>,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub default_headers: Vec<(String, String)>,
}

impl ExecutorOptions {
    pub fn from_config(config: &BastionConfig) -> Result<Self> {
        let base_url = config
            .http
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()?;

        Ok(Self {
            base_url,
            timeout: config.timeout(),
            user_agent: config.http.user_agent.clone(),
            default_headers: config
                .http
                .default_headers
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        })
    }
}

/// HTTP transport over `reqwest`.
///
/// Each call blocks the current thread on a private current-thread tokio
/// runtime, so it must not be used from inside an async context.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
    base_url: Option<Url>,
    default_headers: Vec<(String, String)>,
}

impl ReqwestExecutor {
    pub fn new() -> Result<Self> {
        Self::with_options(ExecutorOptions::default())
    }

    pub fn with_options(options: ExecutorOptions) -> Result<Self> {
        // runtimes are per call, so pooled connections would outlive them
        let mut builder = Client::builder()
            .pool_max_idle_per_host(0)
            .user_agent(options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: options.base_url,
            default_headers: options.default_headers,
        })
    }

    fn build_request(&self, request: &dyn Request) -> Result<reqwest::RequestBuilder> {
        let url = resolve_url(request, self.base_url.as_ref())?;
        let method = Method::from_bytes(request.method().value().as_bytes()).map_err(|e| {
            BastionError::InvalidRequestError {
                message: format!("Invalid HTTP method '{}': {}", request.method(), e),
            }
        })?;

        tracing::debug!("{} {}", method, url);
        let mut builder = self.client.request(method, url);

        for (name, value) in &self.default_headers {
            let overridden = request
                .headers()
                .iter()
                .any(|(header, _)| header.eq_ignore_ascii_case(name));
            if !overridden {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(content_type) = request.content_type() {
            builder = builder.header(CONTENT_TYPE, content_type);
        }

        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }

        Ok(builder)
    }
}

impl RequestExecutor for ReqwestExecutor {
    fn execute(&self, request: &dyn Request) -> Result<Response> {
        let builder = self.build_request(request)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(send(builder))
    }
}

async fn send(builder: reqwest::RequestBuilder) -> Result<Response> {
    let response = builder.send().await?;
    let status = response.status();
    tracing::debug!("API response status: {}", status);

    let mut converted = Response::new(status.as_u16(), status.canonical_reason().unwrap_or(""));
    for (name, value) in response.headers() {
        converted = converted.with_header(
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }

    let body = response.bytes().await?;
    Ok(converted.with_body(body.to_vec()))
}
