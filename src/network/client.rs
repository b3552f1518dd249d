//! HTTP client wrapper - attaches Mini-App auth and normalizes responses

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::constants::{AUTH_SCHEME, EP_ADMIN_UPLOAD_MEDIA};
use crate::identity::IdentityProvider;
use crate::models::MediaUpload;
use crate::network::error::ApiError;

/// A successful response body.
///
/// Some endpoints answer with plain values, so a body that is not valid JSON
/// is kept as raw text instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    Json(Value),
    Text(String),
}

impl ApiPayload {
    /// Decode into the endpoint schema
    pub fn decode<T: DeserializeOwned>(self, endpoint: &str) -> Result<T, ApiError> {
        let value = match self {
            ApiPayload::Json(value) => value,
            ApiPayload::Text(text) => Value::String(text),
        };
        serde_json::from_value(value).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Concatenate the configured base with an endpoint path
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), endpoint)
}

/// Absolute request URL for `endpoint`.
///
/// A terminal has no page origin to resolve relative paths against, so an
/// empty or relative base is reported before any request is built.
pub fn request_url(base: &str, endpoint: &str) -> Result<String, ApiError> {
    let url = join_url(base, endpoint);
    match reqwest::Url::parse(&url) {
        Ok(_) => Ok(url),
        Err(_) => Err(ApiError::InvalidUrl { url }),
    }
}

/// `tma <token>` for a non-empty token, nothing otherwise
pub fn auth_header_value(token: Option<String>) -> Option<String> {
    token
        .filter(|t| !t.is_empty())
        .map(|t| format!("{} {}", AUTH_SCHEME, t))
}

/// Human-readable message from an error body's `detail` field
fn detail_message(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        // Validation errors come as a list of {loc, msg, type}
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Map a status code and textual body to a payload or an error
pub fn interpret_response(status: u16, body: &str) -> Result<ApiPayload, ApiError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(detail_message))
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ApiError::Status { status, message });
    }

    match serde_json::from_str::<Value>(body) {
        Ok(json) => Ok(ApiPayload::Json(json)),
        Err(_) => Ok(ApiPayload::Text(body.to_string())),
    }
}

/// Authenticated client for the Mini-App API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        identity: Arc<dyn IdentityProvider>,
        timeout: Duration,
    ) -> Self {
        ApiClient {
            http: create_client(timeout),
            base_url: base_url.into(),
            identity,
        }
    }

    /// Issue a JSON request against `endpoint`
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
        cancel: &CancellationToken,
    ) -> Result<ApiPayload, ApiError> {
        let url = request_url(&self.base_url, endpoint)?;
        let auth = auth_header_value(self.identity.token());
        tracing::info!(method = %method, endpoint, auth = auth.is_some(), "API request");

        let mut req_builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(value) = auth {
            req_builder = req_builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = body {
            req_builder = req_builder.body(body);
        }

        self.execute(req_builder, &method, endpoint, cancel).await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, None, cancel)
            .await?
            .decode(endpoint)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        self.post_raw(endpoint, body, cancel).await?.decode(endpoint)
    }

    /// POST whose response shape is not interpreted
    pub async fn post_raw<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<ApiPayload, ApiError> {
        let body = serde_json::to_vec(body).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        self.request(Method::POST, endpoint, Some(body), cancel).await
    }

    /// Upload a local file as multipart form data; returns the media reference
    pub async fn upload_media(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<MediaUpload, ApiError> {
        let endpoint = EP_ADMIN_UPLOAD_MEDIA;
        let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("upload"));

        let url = request_url(&self.base_url, endpoint)?;
        let auth = auth_header_value(self.identity.token());
        tracing::info!(
            method = "POST",
            endpoint,
            auth = auth.is_some(),
            bytes = bytes.len(),
            "API upload"
        );

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);
        let mut req_builder = self.http.post(&url).multipart(form);
        if let Some(value) = auth {
            req_builder = req_builder.header(AUTHORIZATION, value);
        }

        self.execute(req_builder, &Method::POST, endpoint, cancel)
            .await?
            .decode(endpoint)
    }

    async fn execute(
        &self,
        req_builder: reqwest::RequestBuilder,
        method: &Method,
        endpoint: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiPayload, ApiError> {
        let call = async {
            let resp = req_builder.send().await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            Ok::<_, ApiError>((status, body))
        };

        let outcome = tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::debug!(method = %method, endpoint, "API request cancelled");
                return Err(ApiError::Cancelled);
            }
            outcome = call => outcome,
        };

        let (status, body) = match outcome {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!(method = %method, endpoint, error = %e, "API transport failure");
                return Err(e);
            }
        };

        let result = interpret_response(status, &body);
        match &result {
            Ok(_) => tracing::debug!(method = %method, endpoint, status, "API response"),
            Err(e) => tracing::error!(method = %method, endpoint, status, detail = %e, "API error"),
        }
        result
    }
}

/// Create an HTTP client with the given timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
