//! Root API client.

use http::Method;
use parking_lot::RwLock;
use std::fmt;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::hooks::{ProcessResultFn, ShapeRequestFn, identity_process, identity_shape};
use crate::params::merge_defaults;
use crate::{
    ApiError, ClientConfig, HttpTransport, Outcome, Params, PreparedRequest, ReqwestTransport,
    Resource, Result,
};

/// Root of a REST API.
///
/// Anchors the base address, owns the default query parameters and the two
/// hooks, and is the only component that talks to the transport. Cloning is
/// cheap: clones share the same state.
pub struct ApiClient<T = String> {
    inner: Arc<ClientInner<T>>,
}

struct ClientInner<T> {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    default_query: RwLock<Params>,
    shape_request: ShapeRequestFn,
    process_result: ProcessResultFn<T>,
}

impl ApiClient<String> {
    /// Create a client with the default transport and identity hooks.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Create a client builder.
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder<String> {
        ApiClientBuilder::new(base_url.into())
    }
}

impl<T> ApiClient<T> {
    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the transport.
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.inner.transport
    }

    /// Resource for the root path `/`.
    pub fn root(&self) -> Resource<T> {
        Resource::new(self.clone(), Vec::new())
    }

    /// Resource for a single named segment.
    pub fn at(&self, name: impl Into<String>) -> Result<Resource<T>> {
        self.root().at(name)
    }

    /// Resource for a single segment given by key, e.g. an id.
    pub fn index(&self, key: impl Display) -> Result<Resource<T>> {
        self.root().index(key)
    }

    /// Resolve the root path `/` with the given parameters.
    pub fn invoke(&self, params: Params) -> Result<PreparedRequest<T>> {
        self.root().invoke(params)
    }

    /// Snapshot of the default query parameters.
    pub fn default_query(&self) -> Params {
        self.inner.default_query.read().clone()
    }

    /// Replace the default query parameters.
    pub fn set_default_query(&self, params: Params) {
        *self.inner.default_query.write() = params;
    }

    /// Set one default query parameter.
    pub fn set_default(&self, key: impl Into<String>, value: impl Display) {
        self.inner.default_query.write().insert(key, value);
    }

    /// Remove one default query parameter.
    pub fn remove_default(&self, key: &str) -> Option<String> {
        self.inner.default_query.write().remove(key)
    }

    /// Remove all default query parameters.
    pub fn clear_defaults(&self) {
        *self.inner.default_query.write() = Params::new();
    }

    /// Run the shaping hook.
    pub fn shape_request(&self, path: String, params: Params) -> Result<(String, Params)> {
        (self.inner.shape_request)(path, params)
    }

    /// Run the processing hook.
    pub fn process_result(&self, raw: String) -> Result<T> {
        (self.inner.process_result)(raw)
    }

    /// Merge call-time parameters with the defaults, shape, and prepare.
    pub(crate) fn prepare(&self, path: String, params: Params) -> Result<PreparedRequest<T>> {
        let merged = merge_defaults(params, &self.inner.default_query.read());
        let (path, query) = self.shape_request(path, merged)?;
        debug!(path = %path, params = query.len(), "Prepared request");
        Ok(PreparedRequest::new(self.clone(), path, query))
    }

    /// Absolute URL for a resolved path.
    ///
    /// The path is appended to the base URL, so a base with a path prefix
    /// keeps it. Each `/`-separated segment is percent-encoded on its own:
    /// `%` and `\` stay inside their segment and never act as escapes or
    /// separators.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base", self.inner.base_url)))?
            .pop_if_empty()
            .extend(path.strip_prefix('/').unwrap_or(path).split('/'));
        Ok(url)
    }

    /// Perform one HTTP call and process its body.
    ///
    /// `GET`, `HEAD` and `DELETE` send `params` as the query string. `POST`
    /// and `PUT` send them as a form body and attach no query string.
    pub async fn dispatch(&self, method: Method, path: &str, params: Params) -> Result<Outcome<T>> {
        let url = self.url_for(path)?;
        debug!(method = %method, url = %url, "Dispatching request");

        let transport = &self.inner.transport;
        let response = match method.as_str() {
            "GET" => transport.get(url, params).await?,
            "HEAD" => transport.head(url, params).await?,
            "DELETE" => transport.delete(url, params).await?,
            "POST" => transport.post(url, params).await?,
            "PUT" => transport.put(url, params).await?,
            _ => return Err(ApiError::UnsupportedMethod(method.clone())),
        };

        if response.is_failure() {
            warn!(
                method = %method,
                status = %response.status(),
                url = %response.url(),
                "Request failed"
            );
        }
        let (meta, body) = response.error_for_status()?.into_parts();
        debug!(status = %meta.status, final_url = %meta.final_url, "Received response");

        let raw = String::from_utf8(body.to_vec()).map_err(|e| ApiError::Codec(e.to_string()))?;
        let value = self.process_result(raw.clone())?;
        Ok(Outcome::new(value, raw, meta))
    }
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("default_query", &*self.inner.default_query.read())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder<T = String> {
    base_url: String,
    config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    default_query: Params,
    shape_request: ShapeRequestFn,
    process_result: ProcessResultFn<T>,
}

impl ApiClientBuilder<String> {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            config: ClientConfig::default(),
            transport: None,
            default_query: Params::new(),
            shape_request: identity_shape(),
            process_result: identity_process(),
        }
    }
}

impl<T> ApiClientBuilder<T> {
    /// Configure the default transport. Ignored when a custom transport is set.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom transport.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set the initial default query parameters.
    pub fn default_query(mut self, params: Params) -> Self {
        self.default_query = params;
        self
    }

    /// Add one initial default query parameter.
    pub fn default_param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.default_query.insert(key, value);
        self
    }

    /// Set the shaping hook.
    pub fn shape_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(String, Params) -> Result<(String, Params)> + Send + Sync + 'static,
    {
        self.shape_request = Arc::new(hook);
        self
    }

    /// Set the processing hook, changing the client's result type.
    pub fn process_result<U, F>(self, hook: F) -> ApiClientBuilder<U>
    where
        F: Fn(String) -> Result<U> + Send + Sync + 'static,
    {
        ApiClientBuilder {
            base_url: self.base_url,
            config: self.config,
            transport: self.transport,
            default_query: self.default_query,
            shape_request: self.shape_request,
            process_result: Arc::new(hook),
        }
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient<T>> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if base_url.cannot_be_a_base() || base_url.query().is_some() || base_url.fragment().is_some()
        {
            return Err(ApiError::InvalidUrl(format!(
                "{}: base URL must be hierarchical without query or fragment",
                self.base_url
            )));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.config)?),
        };

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                base_url,
                transport,
                default_query: RwLock::new(self.default_query),
                shape_request: self.shape_request,
                process_result: self.process_result,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use std::time::Duration;

    fn client(transport: &RecordingTransport) -> ApiClient {
        ApiClient::builder("http://localhost:8080")
            .transport(transport.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
        assert!(client.default_query().is_empty());
    }

    #[test]
    fn test_client_with_config() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(60))
            .build();
        let client = ApiClient::builder("https://api.example.com")
            .config(config)
            .build()
            .unwrap();
        assert_eq!(client.base_url().host_str(), Some("api.example.com"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("http://localhost:8080/?v=1"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_url_for_keeps_base_prefix() {
        let client = ApiClient::new("http://localhost:8080/api/v1/").unwrap();
        assert_eq!(
            client.url_for("/tests/simple").unwrap().as_str(),
            "http://localhost:8080/api/v1/tests/simple"
        );
        assert_eq!(
            client.url_for("/").unwrap().as_str(),
            "http://localhost:8080/api/v1/"
        );
    }

    #[test]
    fn test_url_for_encodes_each_segment() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        assert_eq!(
            client.url_for("/tests/a\\b/100%/with space").unwrap().as_str(),
            "http://localhost:8080/tests/a%5Cb/100%25/with%20space"
        );
        assert_eq!(client.url_for("/").unwrap().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_default_query_management() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        client.set_default("foo", 42);
        client.set_default("v", "1.0");
        assert_eq!(client.default_query().get("foo"), Some("42"));

        assert_eq!(client.remove_default("v"), Some("1.0".to_string()));
        assert_eq!(client.default_query().len(), 1);

        client.set_default_query(Params::from([("a", "1"), ("b", "2")]));
        assert_eq!(client.default_query().len(), 2);

        client.clear_defaults();
        assert!(client.default_query().is_empty());
    }

    #[test]
    fn test_clones_share_defaults() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        let other = client.clone();
        other.set_default("token", "abc");
        assert_eq!(client.default_query().get("token"), Some("abc"));
    }

    #[test]
    fn test_hooks_default_to_identity() {
        let client = ApiClient::new("http://localhost:8080").unwrap();
        let params = Params::from([("foo", "1")]);
        let (path, shaped) = client
            .shape_request("/tests".to_string(), params.clone())
            .unwrap();
        assert_eq!(path, "/tests");
        assert_eq!(shaped, params);
        assert_eq!(client.process_result("raw".to_string()).unwrap(), "raw");
    }

    #[tokio::test]
    async fn test_root_invoke_dispatches_to_slash() {
        let transport = RecordingTransport::replying(200, "root");
        let client = client(&transport);
        client.set_default("v", "1");

        let outcome = client
            .invoke(Params::from([("foo", "bar")]))
            .unwrap()
            .get()
            .await
            .unwrap();

        assert_eq!(outcome.value(), "root");
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.full_url().as_str(), "http://localhost:8080/?foo=bar&v=1");
    }

    #[tokio::test]
    async fn test_dispatch_rejects_unsupported_method() {
        let transport = RecordingTransport::replying(200, "");
        let client = client(&transport);
        let err = client
            .dispatch(Method::PATCH, "/tests", Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedMethod(m) if m == Method::PATCH));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_failure_skips_processing() {
        let transport = RecordingTransport::replying(404, "no such resource");
        let client = ApiClient::builder("http://localhost:8080")
            .transport(transport.clone())
            .process_result(|_raw| -> Result<()> { panic!("must not run on failure") })
            .build()
            .unwrap();

        let err = client
            .dispatch(Method::GET, "/missing", Params::new())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.response_body(), Some("no such resource"));
    }

    #[tokio::test]
    async fn test_process_result_hook_errors_propagate() {
        let transport = RecordingTransport::replying(200, "not json");
        let client = ApiClient::builder("http://localhost:8080")
            .transport(transport)
            .process_result(|raw| Ok(serde_json::from_str::<serde_json::Value>(&raw)?))
            .build()
            .unwrap();

        let err = client
            .dispatch(Method::GET, "/", Params::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Codec(_)));
    }

    #[test]
    fn test_debug_shows_base_and_defaults() {
        let client = ApiClient::builder("http://localhost:8080")
            .default_param("v", "1.0")
            .build()
            .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("http://localhost:8080/"));
        assert!(debug.contains("1.0"));
    }
}
