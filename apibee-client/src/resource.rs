//! Chainable resource paths.

use std::fmt;
use std::fmt::Display;

use crate::{ApiClient, ApiError, Outcome, Params, PreparedRequest, Result};

/// An immutable path below an [`ApiClient`].
///
/// Every [`at`](Resource::at) or [`index`](Resource::index) returns a new
/// resource one segment longer; the parent is left untouched. Nothing is
/// sent until the resource is invoked and the prepared request is fired.
///
/// ```
/// use apibee_client::ApiClient;
///
/// let client = ApiClient::new("http://localhost:8080").unwrap();
/// let tests = client.at("tests").unwrap();
/// let object = tests.at("get_object").unwrap().index(23).unwrap();
///
/// assert_eq!(tests.path(), "/tests");
/// assert_eq!(object.path(), "/tests/get_object/23");
/// ```
pub struct Resource<T = String> {
    client: ApiClient<T>,
    segments: Vec<String>,
}

impl<T> Resource<T> {
    pub(crate) fn new(client: ApiClient<T>, segments: Vec<String>) -> Self {
        Self { client, segments }
    }

    /// Append a named segment.
    pub fn at(&self, name: impl Into<String>) -> Result<Self> {
        self.push(validate_segment(name.into())?)
    }

    /// Append a segment given by key, e.g. a numeric id.
    pub fn index(&self, key: impl Display) -> Result<Self> {
        self.push(validate_segment(key.to_string())?)
    }

    fn push(&self, segment: String) -> Result<Self> {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Ok(Self::new(self.client.clone(), segments))
    }

    /// The segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The URL path: `/` followed by the segments joined with `/`.
    pub fn path(&self) -> String {
        join_path(&self.segments)
    }

    /// The owning client.
    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// Resolve this path into a prepared request.
    ///
    /// `params` are merged with the client's default query parameters
    /// (call-time values win) and then passed through the shaping hook.
    pub fn invoke(&self, params: Params) -> Result<PreparedRequest<T>> {
        self.client.prepare(self.path(), params)
    }

    /// Invoke with `params` and send a `GET`.
    pub async fn get(&self, params: Params) -> Result<Outcome<T>> {
        self.invoke(params)?.get().await
    }

    /// Invoke with `params` and send a `HEAD`.
    pub async fn head(&self, params: Params) -> Result<Outcome<T>> {
        self.invoke(params)?.head().await
    }

    /// Invoke with `params` and send a `DELETE`.
    pub async fn delete(&self, params: Params) -> Result<Outcome<T>> {
        self.invoke(params)?.delete().await
    }

    /// Invoke without call-time parameters and `POST` the payload.
    pub async fn post(&self, payload: Params) -> Result<Outcome<T>> {
        self.invoke(Params::new())?.post(payload).await
    }

    /// Invoke without call-time parameters and `PUT` the payload.
    pub async fn put(&self, payload: Params) -> Result<Outcome<T>> {
        self.invoke(Params::new())?.put(payload).await
    }
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            segments: self.segments.clone(),
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("base_url", &self.client.base_url().as_str())
            .field("segments", &self.segments)
            .finish()
    }
}

impl<T> Display for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Join segments into a URL path. No segments yields `/`.
pub fn join_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

/// Check that a segment can stand on its own between two slashes.
pub fn validate_segment(segment: String) -> Result<String> {
    let reason = if segment.is_empty() {
        Some("segment is empty")
    } else if segment == "." || segment == ".." {
        Some("dot segments are not allowed")
    } else if segment.contains(['/', '?', '#']) {
        Some("segment contains a URL delimiter")
    } else if segment.chars().any(|c| c.is_ascii_control()) {
        Some("segment contains a control character")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ApiError::InvalidSegment { segment, reason }),
        None => Ok(segment),
    }
}
