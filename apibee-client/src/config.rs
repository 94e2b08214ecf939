//! Transport configuration.

use std::time::Duration;

/// Settings for the default reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Default request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Default headers for all requests.
    pub default_headers: Vec<(String, String)>,
    /// User agent string.
    pub user_agent: String,
    /// Enable gzip decompression.
    pub gzip: bool,
    /// Enable brotli decompression.
    pub brotli: bool,
    /// Follow redirects.
    pub follow_redirects: bool,
    /// Maximum redirects to follow.
    pub max_redirects: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            default_headers: Vec::new(),
            user_agent: format!("apibee/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
            brotli: true,
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a default header for all requests.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((name.into(), value.into()));
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable gzip decompression.
    pub fn gzip(mut self, enable: bool) -> Self {
        self.config.gzip = enable;
        self
    }

    /// Enable or disable brotli decompression.
    pub fn brotli(mut self, enable: bool) -> Self {
        self.config.brotli = enable;
        self
    }

    /// Enable or disable following redirects.
    pub fn follow_redirects(mut self, enable: bool) -> Self {
        self.config.follow_redirects = enable;
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
