//! Executing requests and classifying their responses.
//!
//! # Design
//! `decode_body` is the pure half: it looks at a finished `HttpResponse` and
//! decides between "failed", "no content" and "JSON value". The `Transport`
//! trait is the I/O half; `ReqwestTransport` is the production implementation
//! and tests plug in canned transports. Neither half retries, times out or
//! caches anything.

use std::future::Future;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON};

/// Maximum number of characters of a body quoted in an error.
pub const SNIPPET_LEN: usize = 200;

/// Executes one `HttpRequest` and returns whatever the server answered.
///
/// Implementations return non-2xx responses as data; only failures to get a
/// response at all become `ApiError::Transport`.
pub trait Transport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

/// First `SNIPPET_LEN` characters of `body`.
pub fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_LEN).collect()
}

/// Classify a response: error status, absent value, or parsed JSON.
///
/// JSON is accepted when the content type says so or when the trimmed body
/// opens with `{` or `[`, which covers backends that forget the header.
/// Anything else (typically an HTML page from a proxy) is a format error.
pub fn decode_body(response: &HttpResponse) -> Result<Option<Value>, ApiError> {
    if !response.is_success() {
        warn!(
            status = response.status,
            status_text = %response.status_text,
            "request failed with non-success status"
        );
        return Err(ApiError::Status {
            status: response.status,
            status_text: response.status_text.clone(),
            snippet: snippet(&response.body),
        });
    }

    if response.status == 204 || response.status == 205 {
        return Ok(None);
    }

    if response.body.is_empty() {
        return Ok(None);
    }

    let trimmed = response.body.trim();
    let looks_like_json = trimmed.starts_with('{') || trimmed.starts_with('[');
    if response.content_type().contains(APPLICATION_JSON) || looks_like_json {
        return serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::Deserialization(e.to_string()));
    }

    warn!(
        status = response.status,
        content_type = response.content_type(),
        "expected JSON response"
    );
    Err(ApiError::Format {
        snippet: snippet(&response.body),
    })
}

/// `Transport` backed by an async `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        debug!(method = request.method.as_str(), url = %request.path, "sending request");

        let mut builder = self.client.request(method, &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, url = %request.path, "request could not be sent");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        debug!(status = status.as_u16(), url = %request.path, "received response");

        // The error path only wants a diagnostic snippet, so a body that
        // cannot be read there degrades to empty.
        let body = if status.is_success() {
            response
                .text()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?
        } else {
            response.text().await.unwrap_or_default()
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_content_statuses_are_absent() {
        assert_eq!(decode_body(&HttpResponse::new(204, "")).unwrap(), None);
        assert_eq!(decode_body(&HttpResponse::new(205, "ignored")).unwrap(), None);
    }

    #[test]
    fn empty_body_is_absent() {
        let resp = HttpResponse::new(200, "").with_header("Content-Type", "application/json");
        assert_eq!(decode_body(&resp).unwrap(), None);
    }

    #[test]
    fn json_content_type_is_parsed() {
        let resp = HttpResponse::new(200, r#"{"id":1}"#)
            .with_header("content-type", "application/json; charset=utf-8");
        assert_eq!(decode_body(&resp).unwrap(), Some(json!({"id": 1})));
    }

    #[test]
    fn json_is_sniffed_without_content_type() {
        let resp = HttpResponse::new(200, "  [1, 2]\n").with_header("Content-Type", "text/html");
        assert_eq!(decode_body(&resp).unwrap(), Some(json!([1, 2])));
    }

    #[test]
    fn html_body_is_a_format_error() {
        let resp =
            HttpResponse::new(200, "<html>oops</html>").with_header("Content-Type", "text/html");
        let err = decode_body(&resp).unwrap_err();
        assert!(matches!(err, ApiError::Format { ref snippet } if snippet == "<html>oops</html>"));
    }

    #[test]
    fn malformed_json_is_a_deserialization_error() {
        let resp = HttpResponse::new(200, "{not json");
        let err = decode_body(&resp).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn error_status_embeds_status_and_snippet() {
        let resp = HttpResponse::new(500, "<html>Server Error</html>")
            .with_status_text("Internal Server Error");
        let err = decode_body(&resp).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("Internal Server Error"));
        assert!(message.contains("<html>Server Error</html>"));
    }

    #[test]
    fn snippet_is_capped_at_200_chars() {
        let body = "é".repeat(500);
        let resp = HttpResponse::new(502, body.clone());
        match decode_body(&resp).unwrap_err() {
            ApiError::Status { snippet, .. } => {
                assert_eq!(snippet.chars().count(), SNIPPET_LEN);
                assert!(body.starts_with(&snippet));
            }
            other => panic!("unexpected error: {other}"),
        }

        let resp = HttpResponse::new(200, "x".repeat(300));
        match decode_body(&resp).unwrap_err() {
            ApiError::Format { snippet } => assert_eq!(snippet.len(), SNIPPET_LEN),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn redirect_status_is_not_success() {
        let err = decode_body(&HttpResponse::new(302, "")).unwrap_err();
        assert_eq!(err.status(), Some(302));
    }
}
