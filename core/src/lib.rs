//! Typed client for the Unipile messaging and social-network API.
//!
//! # Overview
//! Every remote operation goes through the same pipeline: a [`Call`] is
//! built into an [`HttpRequest`] by the pure [`ApiCore`], sent by a
//! transport, and the [`HttpResponse`] is parsed back into JSON (or
//! classified into an [`Error`]) before being decoded into the call's
//! target type. List endpoints are walked lazily with [`paginate`] or
//! [`paginate_stream`].
//!
//! # Design
//! - `ApiCore` never touches the network; request building and response
//!   classification are deterministic and unit-tested without a server.
//! - Two client flavors share that core: [`Client`] blocks the calling
//!   thread (ureq), [`AsyncClient`] returns futures (reqwest). Both
//!   implement [`Execute`], so the endpoint facades are written once.
//! - Each client owns one connection pool; [`Client::close`] /
//!   [`AsyncClient::close`] release it, and the `scope` constructors close it
//!   on every exit path.
//! - Logging goes through `tracing`; installing a subscriber is left to the
//!   application.
//!
//! ```no_run
//! use comm_core::{Client, ClientOptions};
//!
//! # fn main() -> Result<(), comm_core::Error> {
//! let options = ClientOptions::default().with_api_key("secret");
//! Client::scope(options, |client| {
//!     let me = client.users().me("acc_123")?;
//!     println!("{:?} {:?}", me.first_name, me.last_name);
//!     Ok(())
//! })
//! # }
//! ```

pub mod call;
pub mod client;
pub mod codes;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod models;
pub mod options;
pub mod pagination;
pub mod transport;

mod blocking;
mod cooperative;
mod execute;

pub use blocking::Client;
pub use call::Call;
pub use client::{classify, decode, ApiCore};
pub use cooperative::AsyncClient;
pub use error::{Error, ErrorKind};
pub use execute::Execute;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Query, QueryValue};
pub use options::{ClientOptions, OptionsError, OptionsLoader};
pub use pagination::{paginate, paginate_stream, Cursor, CursorPage, Page, Paginator};
