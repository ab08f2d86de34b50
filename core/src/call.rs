//! Typed descriptions of remote operations.
//!
//! A `Call<T>` carries everything needed to build one request (method, path,
//! query, JSON body) plus the type its success body decodes into. Facades
//! produce calls; an [`Execute`](crate::Execute) implementation runs them.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;

use crate::http::{HttpMethod, Query, QueryValue};

pub struct Call<T> {
    method: HttpMethod,
    path: String,
    query: Query,
    body: Body,
    missing: Option<&'static str>,
    _output: PhantomData<fn() -> T>,
}

#[derive(Debug, Clone, PartialEq)]
enum Body {
    Empty,
    Json(Value),
    // Serialization failures surface when the request is built.
    Invalid(String),
}

impl<T> Call<T> {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::new(),
            body: Body::Empty,
            missing: None,
            _output: PhantomData,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, name: &str, value: impl Into<QueryValue>) -> Self {
        self.query.push(name, value);
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = match serde_json::to_value(body) {
            Ok(value) => Body::Json(value),
            Err(e) => Body::Invalid(e.to_string()),
        };
        self
    }

    /// Record `name` as missing unless `present`. The first missing
    /// parameter is reported when the request is built; nothing is sent.
    pub fn require(mut self, name: &'static str, present: bool) -> Self {
        if !present && self.missing.is_none() {
            self.missing = Some(name);
        }
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &Query {
        &self.query
    }

    /// The JSON body, if one was attached and serialized.
    pub fn body(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn body_error(&self) -> Option<&str> {
        match &self.body {
            Body::Invalid(message) => Some(message),
            _ => None,
        }
    }

    /// First required parameter that was empty, if any.
    pub fn missing_parameter(&self) -> Option<&'static str> {
        self.missing
    }

    /// Reinterpret the expected output type.
    pub fn expecting<U>(self) -> Call<U> {
        Call {
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body,
            missing: self.missing,
            _output: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Call<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("missing", &self.missing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use std::collections::HashMap;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn builder_collects_parts() {
        let mut payload = HashMap::new();
        payload.insert("text", "hi");
        let call: Call<Value> = Call::post("chats/c1/messages")
            .query("account_id", "acc")
            .json(&payload);
        assert_eq!(call.method(), HttpMethod::Post);
        assert_eq!(call.path(), "chats/c1/messages");
        assert_eq!(call.query_params().present(), vec![("account_id", "acc".to_string())]);
        assert_eq!(call.body().unwrap()["text"], "hi");
        assert!(call.body_error().is_none());
    }

    #[test]
    fn first_missing_parameter_wins() {
        let call: Call<Value> = Call::get("users/me")
            .require("account_id", false)
            .require("identifier", false);
        assert_eq!(call.missing_parameter(), Some("account_id"));

        let call: Call<Value> = Call::get("users/me").require("account_id", true);
        assert_eq!(call.missing_parameter(), None);
    }

    #[test]
    fn serialization_failure_is_deferred() {
        let call: Call<Value> = Call::post("x").json(&Unserializable);
        assert!(call.body().is_none());
        assert!(call.body_error().unwrap().contains("refusing"));
    }
}
