//! Transports that move `HttpRequest`/`HttpResponse` values over the wire.
//!
//! Each transport owns exactly one connection pool for its client. The pool
//! sits behind a [`Pool`] handle: requests check out a clone of the pooled
//! agent (the agents are internally reference counted and safe to share
//! across threads), and `close` removes it so later requests fail with
//! [`Error::Closed`]. A request already in flight keeps its own clone and
//! finishes normally; the sockets are released once the last clone drops.

mod blocking;
mod nonblocking;

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

pub use blocking::BlockingTransport;
pub use nonblocking::AsyncTransport;

use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};

pub(crate) struct Pool<C> {
    inner: RwLock<Option<C>>,
}

impl<C: Clone> Pool<C> {
    pub(crate) fn new(client: C) -> Self {
        Self {
            inner: RwLock::new(Some(client)),
        }
    }

    pub(crate) fn checkout(&self) -> Result<C, Error> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::Closed)
    }

    /// Returns `true` if this call closed the pool.
    pub(crate) fn close(&self) -> bool {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

fn timeout_error(timeout: Duration) -> Error {
    Error::RequestTimeout {
        timeout_ms: timeout.as_millis() as u64,
    }
}

/// Pre-send trace: method and URL (without query) at debug, query pairs and
/// body at trace. Headers are never logged.
pub(crate) fn log_request(request: &HttpRequest) {
    let mut endpoint = request.url.clone();
    endpoint.set_query(None);
    tracing::debug!(
        method = %request.method,
        url = %endpoint,
        has_body = request.body.is_some(),
        "http.request"
    );
    let query: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
    tracing::trace!(
        ?query,
        body = request.body.as_deref().unwrap_or(""),
        "http.request.detail"
    );
}

pub(crate) fn log_response(response: &HttpResponse, elapsed: Duration) {
    tracing::debug!(
        status = response.status,
        duration_ms = elapsed.as_millis() as u64,
        body_len = response.body.len(),
        "http.response"
    );
}

pub(crate) fn log_decoded(value: &serde_json::Value) {
    tracing::trace!(body = %value, "http.response.body");
}
