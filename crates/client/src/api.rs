use std::sync::Arc;

use configs::ClientConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::{
    errors::ApiError,
    request::{build_request, RequestDescriptor, RequestOptions},
    resolver::SystemResolver,
    response::{decode_payload, error_message, unparseable_payload},
};

/// One-shot JSON API calls against a fixed base address.
///
/// Calls are independent: no retries, caching, or shared mutable state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .dns_resolver(Arc::new(SystemResolver))
            .build()?;
        Ok(Self { http, base_url: base_url.into() })
    }

    pub fn from_config(cfg: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(cfg.api.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request to `base_url + endpoint` and return the decoded payload.
    pub async fn call(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let result = match build_request(&self.base_url, endpoint, &options) {
            Ok(request) => self.execute(request).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!(event = "api_call_failed", %endpoint, error = %e, "API call failed");
        }
        result
    }

    /// Like [`ApiClient::call`], deserializing the success payload into `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let payload = self.call(endpoint, options).await?;
        serde_json::from_value(payload).map_err(ApiError::Decode)
    }

    async fn execute(&self, request: RequestDescriptor) -> Result<Value, ApiError> {
        debug!(event = "api_request", url = %request.url, "making API call");
        debug!(
            event = "api_request_config",
            method = %request.method,
            headers = ?request.headers,
            body = %render_body(request.body.as_deref()),
            "request config"
        );

        let mut builder = self
            .http
            .request(request.method.into(), &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        let payload = match response.bytes().await {
            Ok(bytes) => decode_payload(&bytes),
            Err(e) => {
                warn!(event = "api_body_read_failed", error = %e, "could not read response body");
                unparseable_payload()
            }
        };

        debug!(event = "api_response", status = status.as_u16(), %payload, "response received");

        if !status.is_success() {
            if let Some(Value::Array(entries)) = payload.get("detail") {
                error!(event = "api_validation_errors", count = entries.len(), detail = %payload["detail"], "validation errors");
            }
            let message = error_message(status, &payload);
            return Err(ApiError::Status { status, message, payload });
        }

        Ok(payload)
    }
}

// JSON bodies are logged compactly; anything else verbatim.
fn render_body(body: Option<&str>) -> String {
    match body {
        None => "No body".to_string(),
        Some(raw) => serde_json::from_str::<Value>(raw)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}
