use std::{collections::BTreeMap, fmt, str::FromStr};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;

use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(ApiError::InvalidMethod(s.to_string())),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Caller-supplied options for one API call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    /// Merged over the default headers; entries here win.
    pub headers: BTreeMap<String, String>,
    /// Pre-serialized body. Ignored for GET and when empty.
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json_body<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(value).map_err(ApiError::Decode)?;
        Ok(self.body(body))
    }
}

/// Fully resolved outgoing request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Resolve `options` against `base_url`. The target is the literal
/// concatenation `base_url + endpoint`.
pub fn build_request(
    base_url: &str,
    endpoint: &str,
    options: &RequestOptions,
) -> Result<RequestDescriptor, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (raw_name, raw_value) in &options.headers {
        let name = HeaderName::from_bytes(raw_name.as_bytes())
            .map_err(|_| ApiError::InvalidHeader(raw_name.clone()))?;
        let mut value = HeaderValue::from_str(raw_value)
            .map_err(|_| ApiError::InvalidHeader(format!("value of {raw_name}")))?;
        if name == AUTHORIZATION {
            value.set_sensitive(true);
        }
        headers.insert(name, value);
    }

    let body = match (&options.method, &options.body) {
        (HttpMethod::Get, _) => None,
        (_, Some(body)) if !body.is_empty() => Some(body.clone()),
        _ => None,
    };

    Ok(RequestDescriptor {
        method: options.method,
        url: format!("{base_url}{endpoint}"),
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://api.example.com";

    #[test]
    fn defaults_to_get_with_json_content_type() -> Result<(), ApiError> {
        let req = build_request(BASE, "/polls", &RequestOptions::new())?;
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.example.com/polls");
        assert_eq!(req.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(req.headers.len(), 1);
        assert!(req.body.is_none());
        Ok(())
    }

    #[test]
    fn get_never_carries_body() -> Result<(), ApiError> {
        let opts = RequestOptions::new().body(r#"{"x":1}"#);
        let req = build_request(BASE, "/polls", &opts)?;
        assert!(req.body.is_none());
        Ok(())
    }

    #[test]
    fn non_get_forwards_body_unchanged() -> Result<(), ApiError> {
        let raw = r#"{ "name" : "Alice" }"#;
        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch, HttpMethod::Delete] {
            let opts = RequestOptions::new().method(method).body(raw);
            let req = build_request(BASE, "/users", &opts)?;
            assert_eq!(req.body.as_deref(), Some(raw));
            assert_eq!(req.method, method);
        }
        Ok(())
    }

    #[test]
    fn empty_body_is_dropped() -> Result<(), ApiError> {
        let opts = RequestOptions::new().method(HttpMethod::Post).body("");
        let req = build_request(BASE, "/users", &opts)?;
        assert!(req.body.is_none());
        Ok(())
    }

    #[test]
    fn caller_headers_override_defaults_case_insensitively() -> Result<(), ApiError> {
        let opts = RequestOptions::new()
            .header("content-type", "text/plain")
            .header("X-Request-Id", "42");
        let req = build_request(BASE, "/", &opts)?;
        assert_eq!(req.headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(req.headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(req.headers.get("x-request-id").unwrap(), "42");
        Ok(())
    }

    #[test]
    fn bearer_auth_is_marked_sensitive() -> Result<(), ApiError> {
        let opts = RequestOptions::new().bearer_auth("secret-token");
        let req = build_request(BASE, "/me", &opts)?;
        let value = req.headers.get(AUTHORIZATION).unwrap();
        assert_eq!(value, "Bearer secret-token");
        assert!(value.is_sensitive());
        assert!(!format!("{:?}", req.headers).contains("secret-token"));
        Ok(())
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let opts = RequestOptions::new().header("bad header", "v");
        let err = build_request(BASE, "/", &opts).unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader(name) if name == "bad header"));
    }

    #[test]
    fn json_body_serializes_value() -> Result<(), ApiError> {
        let opts = RequestOptions::new()
            .method(HttpMethod::Post)
            .json_body(&json!({"username": "bob"}))?;
        assert_eq!(opts.body.as_deref(), Some(r#"{"username":"bob"}"#));
        Ok(())
    }

    #[test]
    fn method_parsing_is_case_insensitive() {
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!(matches!("TRACE".parse::<HttpMethod>(), Err(ApiError::InvalidMethod(_))));
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(reqwest::Method::from(HttpMethod::Put), reqwest::Method::PUT);
    }
}
