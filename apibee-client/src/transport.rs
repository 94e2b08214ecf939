//! HTTP transports.
//!
//! The client never talks to the network itself. It hands a
//! [`TransportRequest`] to an [`HttpTransport`] and gets a [`Response`]
//! back. [`ReqwestTransport`] is the default implementation; tests and
//! embedders can plug in their own.

use async_trait::async_trait;
use http::Method;
use url::Url;

use crate::{ApiError, ClientConfig, Params, Response, Result};

/// A single wire request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL without query string.
    pub url: Url,
    /// Query string parameters.
    pub query: Params,
    /// Form-encoded body, if any.
    pub body: Option<Params>,
}

impl TransportRequest {
    /// Final URL with the query string appended.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in self.query.iter() {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

/// Capability for performing HTTP calls.
///
/// Query-based verbs (`GET`, `HEAD`, `DELETE`) carry parameters in the query
/// string. Body-based verbs (`POST`, `PUT`) carry them as a form payload.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a request and return the raw response.
    async fn execute(&self, request: TransportRequest) -> Result<Response>;

    /// Perform a `GET`.
    async fn get(&self, url: Url, query: Params) -> Result<Response> {
        self.execute(query_request(Method::GET, url, query)).await
    }

    /// Perform a `HEAD`.
    async fn head(&self, url: Url, query: Params) -> Result<Response> {
        self.execute(query_request(Method::HEAD, url, query)).await
    }

    /// Perform a `DELETE`.
    async fn delete(&self, url: Url, query: Params) -> Result<Response> {
        self.execute(query_request(Method::DELETE, url, query)).await
    }

    /// Perform a `POST`.
    async fn post(&self, url: Url, payload: Params) -> Result<Response> {
        self.execute(body_request(Method::POST, url, payload)).await
    }

    /// Perform a `PUT`.
    async fn put(&self, url: Url, payload: Params) -> Result<Response> {
        self.execute(body_request(Method::PUT, url, payload)).await
    }
}

fn query_request(method: Method, url: Url, query: Params) -> TransportRequest {
    TransportRequest {
        method,
        url,
        query,
        body: None,
    }
}

fn body_request(method: Method, url: Url, payload: Params) -> TransportRequest {
    TransportRequest {
        method,
        url,
        query: Params::new(),
        body: Some(payload),
    }
}

/// Transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    /// Create a transport with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(config.gzip)
            .brotli(config.brotli);

        if config.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        } else {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        let inner = builder.build()?;

        Ok(Self { inner, config })
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<Response> {
        let url = request.full_url();
        let mut builder = self.inner.request(request.method, url);

        for (name, value) in &self.config.default_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(payload) = request.body {
            builder = builder
                .header(
                    http::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(payload.to_form()?);
        }

        let response = builder.send().await.map_err(ApiError::no_response)?;

        Response::from_reqwest(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url_form_encodes_query() {
        let request = TransportRequest {
            method: Method::GET,
            url: Url::parse("http://localhost:8080/tests/with_args").unwrap(),
            query: Params::from([("foo", "a b"), ("bar", "2")]),
            body: None,
        };
        assert_eq!(
            request.full_url().as_str(),
            "http://localhost:8080/tests/with_args?foo=a+b&bar=2"
        );
    }

    #[test]
    fn test_full_url_without_query_has_no_question_mark() {
        let request = body_request(
            Method::POST,
            Url::parse("http://localhost:8080/tests").unwrap(),
            Params::from([("a", "1")]),
        );
        assert_eq!(request.full_url().as_str(), "http://localhost:8080/tests");
        assert!(request.body.is_some());
    }

    #[test]
    fn test_reqwest_transport_builds() {
        let transport = ReqwestTransport::new(ClientConfig::default()).unwrap();
        assert_eq!(transport.config().max_redirects, 10);
    }
}
