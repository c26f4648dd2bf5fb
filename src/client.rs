//! Authenticated request client for the tracking backend.
//!
//! `ApiClient` performs one HTTP round-trip per call: it asks its
//! `TokenProvider` for a bearer token (failing with
//! `ClientError::Unauthenticated` before any network I/O when there is none),
//! sends the request to the configured origin and decodes the JSON body into
//! the caller's type. Failures are logged once and always returned.
//!
//! JSON and multipart bodies go through two separate methods, `send_json` and
//! `send_form`, so the content type follows from the payload type.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::ClientError;
use crate::session::TokenProvider;

/// Backend origin used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MAX_ERROR_BODY_CHARS: usize = 300;

/// Shared HTTP client. Construct once and pass by reference to the API wrappers.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenProvider>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, tokens, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|_| ClientError::InvalidUrl(base_url.clone()))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("prodtrack/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/api/pd/3`.
    pub fn url(&self, path: &str) -> Result<reqwest::Url, ClientError> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        reqwest::Url::parse(&joined).map_err(|_| ClientError::InvalidUrl(joined))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let builder = self.authorized(Method::GET, path)?;
        self.dispatch(Method::GET, path, builder).await
    }

    /// GET with a query-string filter serialized from `query`.
    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.authorized(Method::GET, path)?.query(query);
        self.dispatch(Method::GET, path, builder).await
    }

    /// Send `body` as `application/json`.
    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body).map_err(|source| ClientError::Encode {
            path: path.to_string(),
            source,
        })?;
        let builder = self
            .authorized(method.clone(), path)?
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.dispatch(method, path, builder).await
    }

    /// Send `form` as `multipart/form-data`; the transport picks the boundary.
    pub async fn send_form<T>(&self, method: Method, path: &str, form: FormPayload) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        // Token check first: an unauthenticated call must not even read attachments.
        let builder = self.authorized(method.clone(), path)?;
        let form = form.into_multipart().await?;
        self.dispatch(method, path, builder.multipart(form)).await
    }

    /// Bodiless request (`POST /check-expired`, `PUT /:id/complete`, ...).
    pub async fn send_empty<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, ClientError> {
        let builder = self.authorized(method.clone(), path)?;
        self.dispatch(method, path, builder).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send_empty(Method::DELETE, path).await
    }

    /// GET returning the raw body (spreadsheet exports).
    pub async fn download<Q>(&self, path: &str, query: &Q) -> Result<Vec<u8>, ClientError>
    where
        Q: Serialize + ?Sized,
    {
        let builder = self.authorized(Method::GET, path)?.query(query);
        let result: Result<Vec<u8>, ClientError> = async {
            let resp = builder.send().await?;
            let resp = check_status(resp).await?;
            Ok(resp.bytes().await?.to_vec())
        }
        .await;
        if let Err(ref e) = result {
            tracing::warn!(method = "GET", path, error = %e, "download failed");
        }
        result
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = match self.tokens.access_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::warn!(%method, path, "refusing request without an access token");
                return Err(ClientError::Unauthenticated);
            }
            Err(e) => {
                tracing::warn!(%method, path, error = %e, "failed to read access token");
                return Err(e.into());
            }
        };
        let url = self.url(path)?;
        Ok(self
            .http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", token)))
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        tracing::debug!(%method, path, "sending request");
        let result: Result<T, ClientError> = async {
            let resp = builder.send().await?;
            let resp = check_status(resp).await?;
            let bytes = resp.bytes().await?;
            decode_body(path, &bytes)
        }
        .await;
        if let Err(ref e) = result {
            tracing::warn!(%method, path, error = %e, "request failed");
        }
        result
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status,
        message: error_message(&body, status),
    })
}

/// Decode a success body. An empty body decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> Result<T, ClientError> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(|source| ClientError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error", "msg"] {
            if let Some(serde_json::Value::String(msg)) = map.get(key) {
                return msg.clone();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Multipart form body: text fields plus file attachments.
#[derive(Debug, Clone, Default)]
pub struct FormPayload {
    fields: Vec<(String, String)>,
    files: Vec<(String, PathBuf)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.files.push((name.into(), path.into()));
        self
    }

    /// Flatten a JSON object into form fields. Strings are sent as-is, nulls
    /// are skipped, everything else is sent as its JSON text.
    pub fn from_json_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut form = Self::new();
        for (key, value) in object {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => form = form.text(key, s.clone()),
                other => form = form.text(key, other.to_string()),
            }
        }
        form
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    async fn into_multipart(self) -> Result<reqwest::multipart::Form, ClientError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for (name, path) in self.files {
            let data = tokio::fs::read(&path)
                .await
                .map_err(|source| ClientError::Attachment {
                    path: path.clone(),
                    source,
                })?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| name.clone());
            form = form.part(name, reqwest::multipart::Part::bytes(data).file_name(file_name));
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StaticToken;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(StaticToken::new("t"))).unwrap()
    }

    #[test]
    fn test_url_joins_paths() {
        let c = client("http://localhost:5000/");
        assert_eq!(c.base_url(), "http://localhost:5000");
        assert_eq!(
            c.url("/api/pd/3").unwrap().as_str(),
            "http://localhost:5000/api/pd/3"
        );
        assert_eq!(
            c.url("api/kickoff").unwrap().as_str(),
            "http://localhost:5000/api/kickoff"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = ApiClient::new("not a url", Arc::new(StaticToken::none())).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(error_message(r#"{"message":"bad id"}"#, status), "bad id");
        assert_eq!(error_message(r#"{"error":"nope"}"#, status), "nope");
        assert_eq!(error_message("plain failure", status), "plain failure");
        assert_eq!(error_message("", status), "Bad Request");
    }

    #[test]
    fn test_error_message_truncates_long_bodies() {
        let body = "x".repeat(1000);
        let msg = error_message(&body, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg.chars().count(), MAX_ERROR_BODY_CHARS);
    }

    #[test]
    fn test_decode_empty_body_as_null() {
        let v: Option<serde_json::Value> = decode_body("/api/pd/1", b"").unwrap();
        assert!(v.is_none());
        let v: serde_json::Value = decode_body("/api/pd/1", br#"{"id":1}"#).unwrap();
        assert_eq!(v["id"], 1);
    }

    #[test]
    fn test_decode_failure_names_path() {
        let err = decode_body::<Vec<u32>>("/api/pd", b"{}").unwrap_err();
        match err {
            ClientError::Decode { path, .. } => assert_eq!(path, "/api/pd"),
            other => panic!("Expected Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_form_from_json_object_flattens_values() {
        let value = serde_json::json!({
            "name": "OK4L",
            "count": 3,
            "details": {"check": true},
            "empty": null
        });
        let form = FormPayload::from_json_object(value.as_object().unwrap());
        assert_eq!(form.field("name"), Some("OK4L"));
        assert_eq!(form.field("count"), Some("3"));
        assert_eq!(form.field("details"), Some(r#"{"check":true}"#));
        assert_eq!(form.field("empty"), None);
        assert_eq!(form.fields().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_attachment_is_reported() {
        let form = FormPayload::new().file("file", "/definitely/not/here.pdf");
        assert_eq!(form.file_count(), 1);
        let err = form.into_multipart().await.unwrap_err();
        assert!(matches!(err, ClientError::Attachment { .. }));
    }
}
