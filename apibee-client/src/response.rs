//! Transport responses and dispatch outcomes.

use crate::{ApiError, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use url::Url;

/// Raw HTTP response as returned by a transport.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: Url,
}

impl Response {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>, url: Url) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            url,
        }
    }

    /// Create a response from a reqwest response.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.bytes().await.map_err(ApiError::no_response)?;

        Ok(Self {
            status,
            headers,
            body,
            url,
        })
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Check if the response was a client or server error.
    pub fn is_failure(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the final URL, after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the response body as bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| ApiError::Codec(e.to_string()))
    }

    /// Split into metadata and body.
    pub fn into_parts(self) -> (ResponseMeta, Bytes) {
        let meta = ResponseMeta {
            status: self.status,
            final_url: self.url,
            headers: self.headers,
        };
        (meta, self.body)
    }

    /// Fail with [`ApiError::RequestFailed`] on a 4xx or 5xx status.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_failure() {
            let body = String::from_utf8_lossy(&self.body).into_owned();
            Err(ApiError::failed(self.status.as_u16(), body))
        } else {
            Ok(self)
        }
    }
}

/// What is known about a response once its body has been consumed.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// Response status.
    pub status: StatusCode,
    /// URL that produced the response, after redirects.
    pub final_url: Url,
    /// Response headers.
    pub headers: HeaderMap,
}

/// Result of one dispatch.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    value: T,
    raw: String,
    meta: ResponseMeta,
}

impl<T> Outcome<T> {
    pub(crate) fn new(value: T, raw: String, meta: ResponseMeta) -> Self {
        Self { value, raw, meta }
    }

    /// The processed value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consume the outcome, keeping the processed value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// The unprocessed response body.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Response metadata.
    pub fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.meta.status
    }

    /// URL that produced the response, after redirects.
    pub fn final_url(&self) -> &Url {
        &self.meta.final_url
    }

    /// Split into value, raw body and metadata.
    pub fn into_parts(self) -> (T, String, ResponseMeta) {
        (self.value, self.raw, self.meta)
    }
}
