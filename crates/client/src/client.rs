//! Shared HTTP plumbing: request building, error mapping and envelope
//! unwrapping. The per-resource call groups live in sibling modules.

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use ledgerdesk_core::errors::{Error, Result};
use ledgerdesk_core::shared::BlobResponse;

use crate::config::ClientConfig;

/// Query pairs; `None` values are left out of the URL.
pub(crate) type Query<'a> = &'a [(&'static str, Option<String>)];

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the bookkeeping backend.
///
/// # Example
///
/// ```ignore
/// let client = Arc::new(ApiClient::new(ClientConfig::new("http://localhost:5000"))?);
/// let session = Session::new(Gateways::from_client(client), SessionConfig::default());
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
    auth_header: Option<HeaderValue>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let auth_header = config
            .token
            .as_deref()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| Error::Config(format!("Invalid access token format: {}", e)))
            })
            .transpose()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url(),
            auth_header,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(auth) = &self.auth_header {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        headers
    }

    pub(crate) fn request(&self, method: Method, path: &str, query: Query<'_>) -> RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        debug!("{} {}", method, url);
        let pairs: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
            .collect();
        self.client
            .request(method, url)
            .headers(self.headers())
            .query(&pairs)
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("Request timed out: {}", e)
            } else {
                format!("Request failed: {}", e)
            };
            Error::Network(message)
        })?;
        Self::check_status(response).await
    }

    /// Turns a non-success status into `Error::Api`, taking the message from
    /// the body's `error` (or `message`) field.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .ok()
            .and_then(|err| err.error.or(err.message));
        debug!("API error {}: {:?}", status, message);
        Err(Error::api(status.as_u16(), message))
    }

    pub(crate) async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;
        if body.trim().is_empty() {
            return serde_json::from_str("{}").map_err(|e| Error::Decode(e.to_string()));
        }
        serde_json::from_str(&body).map_err(|e| {
            Error::Decode(format!(
                "{} - {}",
                e,
                body.chars().take(200).collect::<String>()
            ))
        })
    }

    pub(crate) async fn blob_body(response: Response) -> Result<BlobResponse> {
        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;
        Ok(BlobResponse {
            bytes: bytes.to_vec(),
            content_disposition,
        })
    }

    pub(crate) fn is_json(response: &Response) -> bool {
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verb helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> Result<T> {
        let response = self.send(self.request(Method::GET, path, query)).await?;
        Self::json_body(response).await
    }

    /// GET, then take one field of the response object.
    pub(crate) async fn get_field<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        query: Query<'_>,
        field: &str,
    ) -> Result<T> {
        let body: Value = self.get(path, query).await?;
        unwrap_field(body, field)
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path, &[]).json(body);
        let response = self.send(request).await?;
        Self::json_body(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::DELETE, path, &[])).await?;
        Self::json_body(response).await
    }

    pub(crate) async fn post_for_blob<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<BlobResponse> {
        let request = self.request(Method::POST, path, &[]).json(body);
        let response = self.send(request).await?;
        Self::blob_body(response).await
    }
}

/// Percent-encodes one path segment.
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Takes `field` out of a response object. A missing or `null` field becomes
/// `T::default()`.
pub(crate) fn unwrap_field<T: DeserializeOwned + Default>(mut body: Value, field: &str) -> Result<T> {
    match body.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| Error::Decode(format!("Invalid '{}' field: {}", field, e))),
    }
}

pub(crate) fn opt(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
