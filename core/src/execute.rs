//! The single interface both client flavors implement.
//!
//! Facades are written once against [`Execute`]; what a call returns depends
//! on the implementation: `Result<T, Error>` from the blocking [`Client`],
//! a `'static` boxed future from the cooperative [`AsyncClient`].
//!
//! [`Client`]: crate::Client
//! [`AsyncClient`]: crate::AsyncClient

use serde::de::DeserializeOwned;

use crate::call::Call;

pub trait Execute {
    /// What running a `Call<T>` produces.
    type Output<T>
    where
        T: DeserializeOwned + Send + 'static;

    fn execute<T>(&self, call: Call<T>) -> Self::Output<T>
    where
        T: DeserializeOwned + Send + 'static;
}
