//! Error types for the API client.
//!
//! # Design
//! Remote failures are split by how much the remote told us. A status with a
//! documented error code for that status becomes `ClientRequest`; any other
//! failure status becomes `HttpResponse` with the raw body for debugging. The
//! classification depends only on the `(status, code)` pair, see
//! [`crate::codes`]. Local problems (timeouts, decode mismatches, a closed
//! pool) get their own variants so callers can decide retry policy per kind.

use thiserror::Error;

use crate::options::OptionsError;

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum Error {
    /// The remote reported a documented error code for this status.
    #[error("API error {status} ({code}): {message}")]
    ClientRequest {
        status: u16,
        code: String,
        message: String,
    },

    /// The remote returned a failure status with an unknown, absent or
    /// undecodable error code.
    #[error("HTTP {status}: {body}")]
    HttpResponse { status: u16, body: String },

    /// No response arrived within the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    RequestTimeout { timeout_ms: u64 },

    /// A success body did not match the shape expected by the caller.
    #[error("response decode failed: {message}, body_snippet: {body_snippet}")]
    Decode {
        message: String,
        body_snippet: String,
    },

    /// The request payload could not be serialized to JSON.
    #[error("request serialization failed: {0}")]
    Serialization(String),

    /// Connection-level failure other than a timeout.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A required parameter was empty; the request was never sent.
    #[error("required parameter {0} is empty")]
    InvalidParameter(&'static str),

    #[error(transparent)]
    Options(#[from] OptionsError),

    /// The connection pool was closed before this request was issued.
    #[error("client is closed")]
    Closed,
}

/// Fieldless view of [`Error`] for matching on the taxonomy alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientRequest,
    HttpResponse,
    RequestTimeout,
    Decode,
    Serialization,
    Transport,
    InvalidUrl,
    InvalidParameter,
    Options,
    Closed,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ClientRequest { .. } => ErrorKind::ClientRequest,
            Error::HttpResponse { .. } => ErrorKind::HttpResponse,
            Error::RequestTimeout { .. } => ErrorKind::RequestTimeout,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::Transport(_) => ErrorKind::Transport,
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Error::Options(_) => ErrorKind::Options,
            Error::Closed => ErrorKind::Closed,
        }
    }

    /// HTTP status of a remote-reported failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ClientRequest { status, .. } | Error::HttpResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Recognized error code, only present on `ClientRequest`.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::ClientRequest { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True for failures reported by the remote (as opposed to local ones).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::ClientRequest { .. } | Error::HttpResponse { .. }
        )
    }
}

pub(crate) fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).into_owned();
    if snip.len() > 500 {
        let mut end = 500;
        while !snip.is_char_boundary(end) {
            end -= 1;
        }
        snip.truncate(end);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_accessors() {
        let err = Error::ClientRequest {
            status: 404,
            code: "resource_not_found".into(),
            message: "gone".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ClientRequest);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.code(), Some("resource_not_found"));
        assert!(err.is_remote());

        let err = Error::RequestTimeout { timeout_ms: 1 };
        assert_eq!(err.kind(), ErrorKind::RequestTimeout);
        assert_eq!(err.status(), None);
        assert!(!err.is_remote());
    }

    #[test]
    fn display_includes_detail() {
        let err = Error::HttpResponse {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
        assert_eq!(
            Error::RequestTimeout { timeout_ms: 250 }.to_string(),
            "request timed out after 250 ms"
        );
    }

    #[test]
    fn snip_body_truncates_on_char_boundary() {
        let body = "é".repeat(400);
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert!(snip.len() <= 503);
    }
}
