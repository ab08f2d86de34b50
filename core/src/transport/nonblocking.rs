use std::time::{Duration, Instant};

use super::{log_request, log_response, timeout_error, Pool};
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};

/// Transport whose requests suspend the calling task instead of the thread.
///
/// Wraps one `reqwest::Client`. Dropping a `send` future cancels the request
/// and returns its connection to (or removes it from) the pool.
pub struct AsyncTransport {
    pool: Pool<reqwest::Client>,
    timeout: Duration,
}

impl AsyncTransport {
    pub fn open(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self {
            pool: Pool::new(client),
            timeout,
        })
    }

    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        let client = self.pool.checkout()?;
        log_request(&request);
        let started = Instant::now();

        let mut builder = client.request(request.method.into(), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
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
            .bytes()
            .await
            .map_err(|e| self.map_error(e))?
            .to_vec();

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

    fn map_error(&self, err: reqwest::Error) -> Error {
        let mapped = if err.is_timeout() {
            timeout_error(self.timeout)
        } else {
            Error::Transport(err.to_string())
        };
        tracing::warn!(error = %mapped, "http.transport_error");
        mapped
    }
}
