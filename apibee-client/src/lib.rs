//! # apibee client
//!
//! A REST client where request URLs are built by chaining path segments
//! instead of assembling strings by hand.
//!
//! ## Features
//!
//! - **Chainable paths**: `client.at("users")?.index(42)?.at("posts")?`
//! - **Two-step dispatch**: resolve a path once, fire it with any verb
//! - **Default parameters**: persistent query parameters merged into every request
//! - **Hooks**: reshape `(path, params)` before sending, post-process every body
//! - **Pluggable transport**: reqwest by default, anything implementing [`HttpTransport`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apibee_client::{ApiClient, Params};
//!
//! # tokio_test::block_on(async {
//! let client = ApiClient::new("http://localhost:8080")?;
//!
//! let outcome = client
//!     .at("tests")?
//!     .at("with_args")?
//!     .invoke(Params::from([("foo", "1"), ("bar", "2")]))?
//!     .get()
//!     .await?;
//!
//! println!("{} -> {}", outcome.final_url(), outcome.value());
//! # Ok::<(), apibee_client::ApiError>(())
//! # });
//! ```
//!
//! ## JSON APIs
//!
//! ```rust,no_run
//! use apibee_client::{ApiClient, JsonCodec, Params, hooks};
//!
//! # tokio_test::block_on(async {
//! let client = ApiClient::builder("http://localhost:8080")
//!     .default_param("v", "1.0")
//!     .shape_request(hooks::collapse_query("q", JsonCodec))
//!     .process_result(hooks::decode_with(JsonCodec))
//!     .build()?;
//!
//! let value = client
//!     .at("tests")?
//!     .at("jsonquery")?
//!     .get(Params::from([("foo", "bar"), ("eggs", "spam")]))
//!     .await?
//!     .into_value();
//!
//! assert_eq!(value["foo"], "bar");
//! # Ok::<(), apibee_client::ApiError>(())
//! # });
//! ```

mod client;
mod codec;
mod config;
mod error;
pub mod hooks;
mod params;
mod request;
mod resource;
mod response;
pub mod testing;
mod transport;

pub use client::{ApiClient, ApiClientBuilder};
pub use codec::{Codec, JsonCodec, SpacedJsonCodec};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ApiError, BoxError, Result};
pub use hooks::{ProcessResultFn, ShapeRequestFn};
pub use params::{Params, merge_defaults};
pub use request::PreparedRequest;
pub use resource::{Resource, join_path, validate_segment};
pub use response::{Outcome, Response, ResponseMeta};
pub use transport::{HttpTransport, ReqwestTransport, TransportRequest};

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, Method, StatusCode};
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use apibee_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{ApiClient, ApiClientBuilder};
    pub use crate::codec::{Codec, JsonCodec, SpacedJsonCodec};
    pub use crate::config::{ClientConfig, ClientConfigBuilder};
    pub use crate::error::{ApiError, Result};
    pub use crate::params::Params;
    pub use crate::request::PreparedRequest;
    pub use crate::resource::Resource;
    pub use crate::response::{Outcome, ResponseMeta};
    pub use crate::transport::{HttpTransport, ReqwestTransport};
    pub use http::{Method, StatusCode};
}
