//! Blocking client: every operation holds the calling thread until the
//! response arrives or the timeout fires.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::call::Call;
use crate::client::{decode, ApiCore};
use crate::endpoints::{Accounts, Hosted, Messages, Search, Users};
use crate::error::Error;
use crate::execute::Execute;
use crate::http::{HttpMethod, HttpRequest, Query};
use crate::options::ClientOptions;
use crate::transport::{log_decoded, BlockingTransport};

/// Blocking client for the messaging API.
///
/// Clones share one connection pool. The pool stays open until [`close`]
/// is called (or the scope of [`Client::scope`] ends); after that every
/// request fails with [`Error::Closed`].
///
/// [`close`]: Client::close
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    core: ApiCore,
    transport: BlockingTransport,
}

impl Inner {
    fn run(&self, request: HttpRequest) -> Result<Value, Error> {
        let response = self.transport.send(request)?;
        let value = self.core.parse(&response)?;
        log_decoded(&value);
        Ok(value)
    }
}

impl Client {
    pub fn open(options: ClientOptions) -> Result<Self, Error> {
        let core = ApiCore::new(options)?;
        let transport = BlockingTransport::open(core.options().timeout());
        tracing::debug!(prefix = core.prefix(), "client.open");
        Ok(Self {
            inner: Arc::new(Inner { core, transport }),
        })
    }

    /// Open a client, run `f`, and close the pool on every way out of `f`
    /// (return, error, or unwinding panic).
    pub fn scope<R, F>(options: ClientOptions, f: F) -> Result<R, Error>
    where
        F: FnOnce(&Client) -> Result<R, Error>,
    {
        let client = Client::open(options)?;
        let _guard = CloseOnDrop(&client);
        f(&client)
    }

    pub fn options(&self) -> &ClientOptions {
        self.inner.core.options()
    }

    pub fn core(&self) -> &ApiCore {
        &self.inner.core
    }

    /// Close the connection pool. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let closed = self.inner.transport.close();
        if closed {
            tracing::debug!("client.close");
        }
        closed
    }

    pub fn is_closed(&self) -> bool {
        self.inner.transport.is_closed()
    }

    /// Untyped access to any route.
    pub fn request_json(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let request = self.inner.core.build(method, path, query, body)?;
        self.inner.run(request)
    }

    pub fn accounts(&self) -> Accounts<'_, Self> {
        Accounts::new(self)
    }

    pub fn users(&self) -> Users<'_, Self> {
        Users::new(self)
    }

    pub fn messages(&self) -> Messages<'_, Self> {
        Messages::new(self)
    }

    pub fn hosted(&self) -> Hosted<'_, Self> {
        Hosted::new(self)
    }

    pub fn search(&self) -> Search<'_, Self> {
        Search::new(self)
    }
}

impl Execute for Client {
    type Output<T> = Result<T, Error>
    where
        T: DeserializeOwned + Send + 'static;

    fn execute<T>(&self, call: Call<T>) -> Self::Output<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let request = self.inner.core.build_call(&call)?;
        decode(self.inner.run(request)?)
    }
}

struct CloseOnDrop<'a>(&'a Client);

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn open_rejects_invalid_options() {
        let err = Client::open(ClientOptions::default().with_timeout_ms(0)).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Options);
    }

    #[test]
    fn closed_client_refuses_requests_without_network() {
        let client = Client::open(ClientOptions::new("http://127.0.0.1:9")).unwrap();
        assert!(client.close());
        assert!(client.is_closed());
        let err = client
            .request_json(HttpMethod::Get, "accounts", &Query::new(), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Closed);
        assert!(!client.close());
    }

    #[test]
    fn scope_closes_after_error() {
        let mut leaked = None;
        let result: Result<(), Error> =
            Client::scope(ClientOptions::new("http://127.0.0.1:9"), |client| {
                leaked = Some(client.clone());
                Err(Error::Transport("boom".into()))
            });
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Transport);
        assert!(leaked.unwrap().is_closed());
    }

    #[test]
    fn clones_share_the_pool() {
        let client = Client::open(ClientOptions::new("http://127.0.0.1:9")).unwrap();
        let other = client.clone();
        client.close();
        assert!(other.is_closed());
    }
}
