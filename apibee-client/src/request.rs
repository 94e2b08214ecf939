//! Prepared requests.

use http::Method;
use std::fmt;

use crate::{ApiClient, Outcome, Params, Result};

/// A resolved path and shaped query, ready to be sent.
///
/// Produced by [`Resource::invoke`](crate::Resource::invoke). The same
/// prepared request can be fired any number of times, with any verb.
pub struct PreparedRequest<T = String> {
    client: ApiClient<T>,
    path: String,
    query: Params,
}

impl<T> PreparedRequest<T> {
    pub(crate) fn new(client: ApiClient<T>, path: String, query: Params) -> Self {
        Self {
            client,
            path,
            query,
        }
    }

    /// The shaped path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The shaped query parameters.
    pub fn query(&self) -> &Params {
        &self.query
    }

    /// The owning client.
    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    /// Split into path and query.
    pub fn into_parts(self) -> (String, Params) {
        (self.path, self.query)
    }

    /// Send with an arbitrary verb.
    ///
    /// `POST` and `PUT` send `payload` (empty when `None`) as the body and
    /// drop the shaped query. Every other verb sends the shaped query and
    /// ignores `payload`.
    pub async fn send(&self, method: Method, payload: Option<Params>) -> Result<Outcome<T>> {
        let params = if method == Method::POST || method == Method::PUT {
            payload.unwrap_or_default()
        } else {
            self.query.clone()
        };
        self.client.dispatch(method, &self.path, params).await
    }

    /// Send a `GET`.
    pub async fn get(&self) -> Result<Outcome<T>> {
        self.send(Method::GET, None).await
    }

    /// Send a `HEAD`.
    pub async fn head(&self) -> Result<Outcome<T>> {
        self.send(Method::HEAD, None).await
    }

    /// Send a `DELETE`.
    pub async fn delete(&self) -> Result<Outcome<T>> {
        self.send(Method::DELETE, None).await
    }

    /// Send a `POST` with a form payload.
    pub async fn post(&self, payload: Params) -> Result<Outcome<T>> {
        self.send(Method::POST, Some(payload)).await
    }

    /// Send a `PUT` with a form payload.
    pub async fn put(&self, payload: Params) -> Result<Outcome<T>> {
        self.send(Method::PUT, Some(payload)).await
    }
}

impl<T> Clone for PreparedRequest<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            query: self.query.clone(),
        }
    }
}

impl<T> fmt::Debug for PreparedRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedRequest")
            .field("path", &self.path)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}
