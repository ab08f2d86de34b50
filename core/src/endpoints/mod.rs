//! Endpoint facades, one per resource group.
//!
//! Each facade is a thin borrow of a client that turns typed parameters into
//! a [`Call`](crate::Call) and hands it to [`Execute`](crate::Execute). The
//! same facade code serves both client flavors; only the return type differs.
//!
//! List operations take the page cursor as their `cursor` argument, so they
//! plug straight into [`paginate`](crate::paginate):
//!
//! ```no_run
//! use comm_core::{paginate, Client, ClientOptions};
//!
//! # fn main() -> Result<(), comm_core::Error> {
//! let client = Client::open(ClientOptions::from_env()?)?;
//! for account in paginate(|cursor| client.accounts().list(cursor, Some(50)), Some(200)) {
//!     println!("{}", account?.id);
//! }
//! # Ok(())
//! # }
//! ```

mod accounts;
mod hosted;
mod messages;
mod search;
mod users;

pub use accounts::Accounts;
pub use hosted::Hosted;
pub use messages::Messages;
pub use search::{Search, SearchLimits};
pub use users::Users;

#[cfg(test)]
pub(crate) mod describe {
    use serde::de::DeserializeOwned;

    use crate::call::Call;
    use crate::execute::Execute;

    /// Executor that returns the call it was given instead of running it.
    pub(crate) struct Describe;

    impl Execute for Describe {
        type Output<T> = Call<T>
        where
            T: DeserializeOwned + Send + 'static;

        fn execute<T>(&self, call: Call<T>) -> Self::Output<T>
        where
            T: DeserializeOwned + Send + 'static,
        {
            call
        }
    }

    /// Rendered query pairs, `Null` values dropped.
    pub(crate) fn query<T>(call: &Call<T>) -> Vec<(String, String)> {
        call.query_params()
            .present()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    pub(crate) fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}
