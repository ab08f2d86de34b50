use std::io;
use std::time::{Duration, Instant};

use ureq::typestate::WithBody;
use ureq::Agent;

use super::{log_request, log_response, timeout_error, Pool};
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Transport that blocks the calling thread for the whole round-trip.
///
/// Wraps one `ureq::Agent`. Status codes are returned as data (never as
/// transport errors) so classification stays in `ApiCore::parse`.
pub struct BlockingTransport {
    pool: Pool<Agent>,
    timeout: Duration,
}

impl BlockingTransport {
    pub fn open(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            pool: Pool::new(agent),
            timeout,
        }
    }

    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let agent = self.pool.checkout()?;
        log_request(&request);
        let started = Instant::now();

        let url = request.url.as_str();
        let result = match request.method {
            HttpMethod::Get => with_headers(agent.get(url), &request.headers).call(),
            HttpMethod::Delete => with_headers(agent.delete(url), &request.headers).call(),
            HttpMethod::Post => send_body(
                with_headers(agent.post(url), &request.headers),
                request.body.as_deref(),
            ),
            HttpMethod::Put => send_body(
                with_headers(agent.put(url), &request.headers),
                request.body.as_deref(),
            ),
        };

        let mut response = result.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| self.map_error(e))?;

        let response = HttpResponse {
            status,
            headers,
            body,
        };
        log_response(&response, started.elapsed());
        Ok(response)
    }

    pub fn close(&self) -> bool {
        self.pool.close()
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    fn map_error(&self, err: ureq::Error) -> Error {
        let mapped = match err {
            ureq::Error::Timeout(_) => timeout_error(self.timeout),
            ureq::Error::Io(e) if e.kind() == io::ErrorKind::TimedOut => {
                timeout_error(self.timeout)
            }
            other => Error::Transport(other.to_string()),
        };
        tracing::warn!(error = %mapped, "http.transport_error");
        mapped
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: ureq::RequestBuilder<WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
