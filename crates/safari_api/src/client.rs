// --- File: crates/safari_api/src/client.rs ---
//! Thin typed wrapper over the remote REST API.
//!
//! Responses may be the bare payload or wrapped as `{"data": ...}`. Error
//! bodies carry the reason in `message`, `error` or `error.message`.

use reqwest::{header, Client, Method, RequestBuilder, StatusCode, Url};
use safari_common::http::client::create_client;
use safari_config::ApiConfig;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Client for the remote safari API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::ConfigError(format!("invalid api.base_url {:?}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::ConfigError(format!(
                "api.base_url {} cannot be used as a base URL",
                base_url
            )));
        }
        let client = create_client(timeout_secs, true)?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.timeout_secs)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::ConfigError(format!("cannot extend base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str], token: Option<&str>) -> Result<RequestBuilder, ApiError> {
        let url = self.url(segments)?;
        debug!("{} {}", method, url);
        let builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str], token: Option<&str>) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, segments, token)?;
        decode_payload(&dispatch(builder).await?)
    }

    /// Sends `body` as JSON and decodes the response payload.
    pub async fn send<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, segments, token)?.json(body);
        decode_payload(&dispatch(builder).await?)
    }

    /// Sends `body` as JSON and ignores the response payload.
    pub async fn send_unit<B>(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
        body: &B,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(method, segments, token)?.json(body);
        dispatch(builder).await.map(|_| ())
    }

    /// Request without a body whose response payload is ignored.
    pub async fn call(&self, method: Method, segments: &[&str], token: Option<&str>) -> Result<(), ApiError> {
        let builder = self.request(method, segments, token)?;
        dispatch(builder).await.map(|_| ())
    }

    /// `POST` carrying an `Idempotency-Key`, so a retried submit does not
    /// create a second resource.
    pub async fn post_idempotent<B, T>(
        &self,
        segments: &[&str],
        token: Option<&str>,
        body: &B,
        idempotency_key: &str,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .request(Method::POST, segments, token)?
            .header(IDEMPOTENCY_HEADER, idempotency_key)
            .json(body);
        decode_payload(&dispatch(builder).await?)
    }
}

/// Sends the request and returns the body of a successful response.
async fn dispatch(builder: RequestBuilder) -> Result<String, ApiError> {
    let response = builder.send().await?;
    let status = response.status();
    let body_text = response.text().await?;

    if status.is_success() {
        return Ok(body_text);
    }

    let message = error_message(status, &body_text);
    warn!("API error: status={}, message='{}'", status.as_u16(), message);
    Err(ApiError::ApiError {
        status: status.as_u16(),
        message,
    })
}

/// Decodes a bare payload or the `data` member of an envelope.
pub fn decode_payload<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let mut value: Value = serde_json::from_str(body)?;
    if let Value::Object(map) = &mut value {
        if let Some(data) = map.remove("data") {
            return Ok(serde_json::from_value(data)?);
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Best human-readable reason from an error body.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let candidates = [
            value.get("message"),
            value.get("error"),
            value.get("error").and_then(|error| error.get("message")),
        ];
        for candidate in candidates.into_iter().flatten() {
            if let Value::String(message) = candidate {
                if !message.trim().is_empty() {
                    return message.clone();
                }
            }
        }
    }
    status.canonical_reason().unwrap_or("Request failed").to_string()
}
