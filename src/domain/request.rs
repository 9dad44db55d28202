use crate::domain::method::HttpMethod;
use crate::utils::error::{BastionError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

pub const APPLICATION_JSON: &str = "application/json";

/// Description of a single outbound call.
///
/// Implementations are immutable once built; the orchestrator only borrows them.
pub trait Request {
    fn name(&self) -> String;
    fn method(&self) -> HttpMethod;
    fn url(&self) -> &str;
    fn headers(&self) -> &[(String, String)];
    fn query_params(&self) -> &[(String, String)];
    fn route_params(&self) -> &[(String, String)];
    fn content_type(&self) -> Option<&str>;
    fn body(&self) -> Option<&str>;
}

/// A request for any HTTP method, configured fluently.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralRequest {
    name: Option<String>,
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
    route_params: Vec<(String, String)>,
    content_type: Option<String>,
    body: Option<String>,
}

impl GeneralRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            name: None,
            method,
            url: url.into(),
            headers: Vec::new(),
            query_params: Vec::new(),
            route_params: Vec::new(),
            content_type: None,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::GET, url)
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(HttpMethod::POST, url).with_body(body)
    }

    pub fn put(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(HttpMethod::PUT, url).with_body(body)
    }

    pub fn patch(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(HttpMethod::PATCH, url).with_body(body)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::DELETE, url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::HEAD, url)
    }

    pub fn options(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::OPTIONS, url)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn add_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    pub fn add_route_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.route_params.push((name.into(), value.into()));
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl Request for GeneralRequest {
    fn name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{} {}", self.method, self.url))
    }

    fn method(&self) -> HttpMethod {
        self.method.clone()
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    fn route_params(&self) -> &[(String, String)] {
        &self.route_params
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// A request whose body is JSON, checked when the request is built.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRequest {
    inner: GeneralRequest,
}

impl JsonRequest {
    /// Serializes `value` as the request body.
    pub fn from_value<T: Serialize>(
        method: HttpMethod,
        url: impl Into<String>,
        value: &T,
    ) -> Result<Self> {
        let body = serde_json::to_string(value)?;
        Ok(Self::with_body(method, url, body))
    }

    /// Uses `json` verbatim as the body after checking that it parses.
    pub fn from_json_str(method: HttpMethod, url: impl Into<String>, json: &str) -> Result<Self> {
        serde_json::from_str::<serde_json::Value>(json)?;
        Ok(Self::with_body(method, url, json.to_string()))
    }

    pub fn post_from_value<T: Serialize>(url: impl Into<String>, value: &T) -> Result<Self> {
        Self::from_value(HttpMethod::POST, url, value)
    }

    pub fn put_from_value<T: Serialize>(url: impl Into<String>, value: &T) -> Result<Self> {
        Self::from_value(HttpMethod::PUT, url, value)
    }

    fn with_body(method: HttpMethod, url: impl Into<String>, body: String) -> Self {
        Self {
            inner: GeneralRequest::new(method, url)
                .with_content_type(APPLICATION_JSON)
                .with_body(body),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.inner = self.inner.with_name(name);
        self
    }

    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.add_header(name, value);
        self
    }

    pub fn add_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.add_query_param(name, value);
        self
    }

    pub fn add_route_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.add_route_param(name, value);
        self
    }
}

impl Request for JsonRequest {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn method(&self) -> HttpMethod {
        self.inner.method()
    }

    fn url(&self) -> &str {
        self.inner.url()
    }

    fn headers(&self) -> &[(String, String)] {
        self.inner.headers()
    }

    fn query_params(&self) -> &[(String, String)] {
        self.inner.query_params()
    }

    fn route_params(&self) -> &[(String, String)] {
        self.inner.route_params()
    }

    fn content_type(&self) -> Option<&str> {
        self.inner.content_type()
    }

    fn body(&self) -> Option<&str> {
        self.inner.body()
    }
}

/// Builds the final URL for `request`: route placeholders such as `{id}` are
/// substituted with the percent-encoded parameter value, relative URLs are joined onto `base_url`, and query parameters
/// are appended.
pub fn resolve_url(request: &dyn Request, base_url: Option<&Url>) -> Result<Url> {
    let re = Regex::new(r"\{([^{}/]+)\}").map_err(|e| BastionError::InvalidRequestError {
        message: format!("Route parameter pattern: {}", e),
    })?;

    let mut unresolved = HashSet::new();
    let substituted = re.replace_all(request.url(), |caps: &regex::Captures| {
        let param = &caps[1];
        match request.route_params().iter().find(|(name, _)| name == param) {
            Some((_, value)) => urlencoding::encode(value).into_owned(),
            None => {
                unresolved.insert(param.to_string());
                caps[0].to_string()
            }
        }
    });

    if !unresolved.is_empty() {
        let mut names: Vec<_> = unresolved.into_iter().collect();
        names.sort();
        return Err(BastionError::InvalidRequestError {
            message: format!("No value for route parameter(s): {}", names.join(", ")),
        });
    }

    let mut url = match Url::parse(&substituted) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => match base_url {
            Some(base) => base.join(&substituted)?,
            None => {
                return Err(BastionError::InvalidRequestError {
                    message: format!("Relative URL '{}' needs a base URL", substituted),
                })
            }
        },
        Err(e) => return Err(e.into()),
    };

    if !request.query_params().is_empty() {
        url.query_pairs_mut().extend_pairs(request.query_params());
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_is_method_and_url() {
        let request = GeneralRequest::get("http://localhost/users");
        assert_eq!(request.name(), "GET http://localhost/users");

        let named = request.with_name("List users");
        assert_eq!(named.name(), "List users");
    }

    #[test]
    fn test_resolve_route_and_query_params() {
        let request = GeneralRequest::get("http://localhost/users/{id}/posts")
            .add_route_param("id", "42")
            .add_query_param("page", "2")
            .add_query_param("sort", "title asc");

        let url = resolve_url(&request, None).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost/users/42/posts?page=2&sort=title+asc"
        );
    }

    #[test]
    fn test_route_param_values_stay_in_their_segment() {
        let request = GeneralRequest::get("http://localhost/files/{name}")
            .add_route_param("name", "a?b#c/d e")
            .add_query_param("page", "2");

        let url = resolve_url(&request, None).unwrap();
        assert_eq!(url.path(), "/files/a%3Fb%23c%2Fd%20e");
        assert_eq!(url.query(), Some("page=2"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_unresolved_route_param_is_rejected() {
        let request = GeneralRequest::get("http://localhost/users/{id}/{slug}");
        let err = resolve_url(&request, None).unwrap_err();
        assert!(err.to_string().contains("id, slug"));
    }

    #[test]
    fn test_relative_url_uses_base() {
        let base = Url::parse("https://api.example.com/v1/").unwrap();
        let request = GeneralRequest::get("status");
        let url = resolve_url(&request, Some(&base)).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/status");

        assert!(resolve_url(&request, None).is_err());
    }

    #[test]
    fn test_json_request_validates_body() {
        let request =
            JsonRequest::from_json_str(HttpMethod::POST, "http://localhost/users", r#"{"name":"sally"}"#)
                .unwrap();
        assert_eq!(request.content_type(), Some(APPLICATION_JSON));
        assert_eq!(request.body(), Some(r#"{"name":"sally"}"#));

        let invalid = JsonRequest::from_json_str(HttpMethod::POST, "http://localhost/users", "{name");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_json_request_from_value() {
        let request = JsonRequest::post_from_value(
            "http://localhost/users",
            &serde_json::json!({"name": "sally", "age": 30}),
        )
        .unwrap();
        let body: serde_json::Value = serde_json::from_str(request.body().unwrap()).unwrap();
        assert_eq!(body["age"], 30);
        assert_eq!(request.method(), HttpMethod::POST);
    }
}
