//! Request-shaping and result-processing hooks.
//!
//! A client carries one shaping hook and one processing hook. The shaping
//! hook sees every resolved `(path, params)` pair before it is prepared and
//! may rewrite either side, or replace the parameters entirely. The
//! processing hook turns each raw response body into the value handed back
//! to the caller. Both default to identity.
//!
//! Hooks are plain closures. State they need at dispatch time (a format
//! suffix, an API version) should be captured behind a shared lock so the
//! hook reads the live value on every call:
//!
//! ```
//! use apibee_client::{ApiClient, Params};
//! use parking_lot::RwLock;
//! use std::sync::Arc;
//!
//! let format = Arc::new(RwLock::new("json".to_string()));
//! let hook_format = Arc::clone(&format);
//!
//! let client = ApiClient::builder("http://localhost:8080")
//!     .shape_request(move |path, params| {
//!         Ok((format!("{}.{}", path, hook_format.read()), params))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let prepared = client.at("list").unwrap().invoke(Params::new()).unwrap();
//! assert_eq!(prepared.path(), "/list.json");
//!
//! *format.write() = "xml".to_string();
//! let prepared = client.at("list").unwrap().invoke(Params::new()).unwrap();
//! assert_eq!(prepared.path(), "/list.xml");
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::{Codec, Params, Result};

/// Shaping hook: `(path, params) -> (path, params)`.
pub type ShapeRequestFn = Arc<dyn Fn(String, Params) -> Result<(String, Params)> + Send + Sync>;

/// Processing hook: raw body to caller value.
pub type ProcessResultFn<T> = Arc<dyn Fn(String) -> Result<T> + Send + Sync>;

/// The default shaping hook. Returns its inputs unchanged.
pub fn identity_shape() -> ShapeRequestFn {
    Arc::new(|path: String, params: Params| Ok((path, params)))
}

/// The default processing hook. Returns the raw body unchanged.
pub fn identity_process() -> ProcessResultFn<String> {
    Arc::new(|raw: String| Ok(raw))
}

/// Processing hook decoding every body with `codec`.
pub fn decode_with<C>(codec: C) -> impl Fn(String) -> Result<Value> + Send + Sync + 'static
where
    C: Codec + 'static,
{
    move |raw| codec.decode(&raw)
}

/// Shaping hook collapsing all parameters into a single encoded `key`.
///
/// The parameters are encoded as one object with `codec`, so
/// `foo=bar&eggs=spam` becomes `q={"eggs":"spam","foo":"bar"}` for
/// `collapse_query("q", JsonCodec)`.
pub fn collapse_query<C>(
    key: impl Into<String>,
    codec: C,
) -> impl Fn(String, Params) -> Result<(String, Params)> + Send + Sync + 'static
where
    C: Codec + 'static,
{
    let key = key.into();
    move |path, params| {
        let encoded = codec.encode(&params.to_json())?;
        Ok((path, Params::new().with(key.clone(), encoded)))
    }
}
