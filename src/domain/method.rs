//! HTTP method value type

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An HTTP verb used to tag requests.
///
/// The standard methods are available as constants such as [`HttpMethod::GET`];
/// anything else can be created with [`HttpMethod::new`]. Two methods are equal
/// when their verbs are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HttpMethod(Cow<'static, str>);

impl HttpMethod {
    pub const POST: HttpMethod = HttpMethod(Cow::Borrowed("POST"));
    pub const GET: HttpMethod = HttpMethod(Cow::Borrowed("GET"));
    pub const PUT: HttpMethod = HttpMethod(Cow::Borrowed("PUT"));
    pub const PATCH: HttpMethod = HttpMethod(Cow::Borrowed("PATCH"));
    pub const DELETE: HttpMethod = HttpMethod(Cow::Borrowed("DELETE"));
    pub const OPTIONS: HttpMethod = HttpMethod(Cow::Borrowed("OPTIONS"));
    pub const HEAD: HttpMethod = HttpMethod(Cow::Borrowed("HEAD"));

    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        Self::GET
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HttpMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_method_equals_constant() {
        assert_eq!(HttpMethod::new("GET"), HttpMethod::GET);
        assert_ne!(HttpMethod::new("get"), HttpMethod::GET);
        assert_eq!(HttpMethod::new("PROPFIND").value(), "PROPFIND");
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(HttpMethod::PATCH.to_string(), "PATCH");
        let parsed: HttpMethod = "OPTIONS".parse().unwrap();
        assert_eq!(parsed, HttpMethod::OPTIONS);
    }
}
