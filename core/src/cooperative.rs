//! Cooperative client: operations are futures that suspend the calling task
//! while a request is outstanding, so other tasks keep running.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::call::Call;
use crate::client::{decode, ApiCore};
use crate::endpoints::{Accounts, Hosted, Messages, Search, Users};
use crate::error::Error;
use crate::execute::Execute;
use crate::http::{HttpMethod, HttpRequest, Query};
use crate::options::ClientOptions;
use crate::transport::{log_decoded, AsyncTransport};

/// Cooperative client for the messaging API.
///
/// Operations return `'static` futures that own a handle to the client, so
/// they can be spawned. Cancelling one (dropping the future, or aborting the
/// task driving it) cancels the request without affecting the pool.
#[derive(Clone)]
pub struct AsyncClient {
    inner: Arc<Inner>,
}

struct Inner {
    core: ApiCore,
    transport: AsyncTransport,
}

impl Inner {
    async fn run(&self, request: HttpRequest) -> Result<Value, Error> {
        let response = self.transport.send(request).await?;
        let value = self.core.parse(&response)?;
        log_decoded(&value);
        Ok(value)
    }
}

impl AsyncClient {
    pub fn open(options: ClientOptions) -> Result<Self, Error> {
        let core = ApiCore::new(options)?;
        let transport = AsyncTransport::open(core.options().timeout())?;
        tracing::debug!(prefix = core.prefix(), "client.open");
        Ok(Self {
            inner: Arc::new(Inner { core, transport }),
        })
    }

    /// Open a client, await `f`, and close the pool however the future ends:
    /// completion, error, panic, or being dropped before completion.
    pub async fn scope<R, F, Fut>(options: ClientOptions, f: F) -> Result<R, Error>
    where
        F: FnOnce(AsyncClient) -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let client = AsyncClient::open(options)?;
        let _guard = CloseOnDrop(client.clone());
        f(client).await
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
    pub async fn request_json(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let request = self.inner.core.build(method, path, query, body)?;
        self.inner.run(request).await
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

impl Execute for AsyncClient {
    type Output<T> = BoxFuture<'static, Result<T, Error>>
    where
        T: DeserializeOwned + Send + 'static;

    fn execute<T>(&self, call: Call<T>) -> Self::Output<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let request = inner.core.build_call(&call)?;
            decode(inner.run(request).await?)
        })
    }
}

struct CloseOnDrop(AsyncClient);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn scope_closes_after_error() {
        let mut leaked = None;
        let result: Result<(), Error> =
            AsyncClient::scope(ClientOptions::new("http://127.0.0.1:9"), |client| {
                leaked = Some(client.clone());
                async move { Err(Error::Transport("boom".into())) }
            })
            .await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Transport);
        assert!(leaked.unwrap().is_closed());
    }

    #[tokio::test]
    async fn closed_client_refuses_requests() {
        let client = AsyncClient::open(ClientOptions::new("http://127.0.0.1:9")).unwrap();
        client.close();
        let err = client
            .request_json(HttpMethod::Get, "accounts", &Query::new(), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Closed);
    }

    #[tokio::test]
    async fn dropped_scope_future_still_closes() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let scope = AsyncClient::scope(ClientOptions::new("http://127.0.0.1:9"), |client| {
            let _ = tx.send(client.clone());
            async move {
                futures::future::pending::<()>().await;
                Ok(())
            }
        });
        let _ = tokio::time::timeout(std::time::Duration::from_millis(10), scope).await;
        let client = rx.await.unwrap();
        assert!(client.is_closed());
    }
}
