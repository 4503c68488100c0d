use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::{ApiError, ApiResult};
use crate::observability::{api_metrics, OperationTimer};
use crate::session::Session;

/// Used when the backend gives neither a `message` nor a status text
const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Single chokepoint for every backend call.
///
/// Returns the decoded JSON body, or `None` for `204 No Content` and empty
/// bodies. Non-2xx responses and transport failures become `ApiError`.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn request(
        &self,
        session: Option<&Session>,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResult<Option<Value>>;
}

/// `ApiGateway` over HTTP. No retry, no cache, transport-default timeouts.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn request(
        &self,
        session: Option<&Session>,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResult<Option<Value>> {
        let timer = OperationTimer::new(&format!("{method} {path}"));
        api_metrics().record_request();

        let mut builder = self
            .client
            .request(method.clone(), self.url(path))
            .header(CONTENT_TYPE, "application/json");
        if let Some(session) = session {
            builder = builder.bearer_auth(&session.token);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        debug!(%method, path, authenticated = session.is_some(), "Sending API request");

        let response = builder.send().await.map_err(|e| {
            api_metrics().record_error();
            warn!(%method, path, error = %e, "API request failed before a response");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            api_metrics().record_error();
            let fallback = status
                .canonical_reason()
                .unwrap_or(FALLBACK_ERROR_MESSAGE)
                .to_string();
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
                .filter(|message| !message.trim().is_empty())
                .unwrap_or(fallback);
            warn!(%method, path, status = status.as_u16(), %message, "API returned an error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            timer.finish();
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
        timer.finish();
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ApiError::decode(path, e))
    }
}

/// Typed view of a gateway response: required body of type `T`
pub fn decode<T: DeserializeOwned>(path: &str, body: Option<Value>) -> ApiResult<T> {
    let body = body.ok_or_else(|| ApiError::decode(path, "expected a JSON body, got none"))?;
    serde_json::from_value(body).map_err(|e| ApiError::decode(path, e))
}
