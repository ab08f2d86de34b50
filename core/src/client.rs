//! Stateless request builder and response parser.
//!
//! # Design
//! `ApiCore` holds only the validated options and the resolved path prefix.
//! `build` produces an `HttpRequest` and `parse` consumes an `HttpResponse`;
//! neither performs I/O. Both client flavors run every call through the same
//! `ApiCore`, so what is sent and how failures are classified never depends
//! on how the caller waits.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::call::Call;
use crate::codes;
use crate::error::{snip_body, Error};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Query};
use crate::options::ClientOptions;

#[derive(Debug, Clone)]
pub struct ApiCore {
    options: ClientOptions,
    prefix: String,
}

impl ApiCore {
    pub fn new(options: ClientOptions) -> Result<Self, Error> {
        options.validate()?;
        let prefix = options.api_prefix();
        Url::parse(&prefix).map_err(|e| Error::InvalidUrl(format!("{prefix}: {e}")))?;
        Ok(Self { options, prefix })
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// `{base_url}/api/{api_version}/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build a transport-ready request.
    ///
    /// `path` is appended to the prefix verbatim: no slash is added or
    /// removed, so routes that need a trailing slash keep it. Query entries
    /// whose value is null are dropped.
    pub fn build(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<HttpRequest, Error> {
        let mut url = Url::parse(&format!("{}{}", self.prefix, path))
            .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))?;

        let pairs = query.present();
        if !pairs.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (name, value) in &pairs {
                serializer.append_pair(name, value);
            }
        }

        let mut headers = vec![
            ("user-agent".to_string(), self.options.user_agent.clone()),
            ("accept".to_string(), "application/json".to_string()),
        ];
        if let Some(key) = &self.options.api_key {
            headers.push(("x-api-key".to_string(), key.clone()));
        }

        let body = match body {
            Some(value) => {
                let encoded = serde_json::to_string(value)
                    .map_err(|e| Error::Serialization(e.to_string()))?;
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Some(encoded)
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    pub fn build_call<T>(&self, call: &Call<T>) -> Result<HttpRequest, Error> {
        if let Some(name) = call.missing_parameter() {
            return Err(Error::InvalidParameter(name));
        }
        if let Some(message) = call.body_error() {
            return Err(Error::Serialization(message.to_string()));
        }
        self.build(call.method(), call.path(), call.query_params(), call.body())
    }

    /// Map a raw response to its JSON body or a classified error.
    ///
    /// An empty success body (e.g. 204) decodes to `null`.
    pub fn parse(&self, response: &HttpResponse) -> Result<Value, Error> {
        if !response.is_success() {
            return Err(classify(response.status, &response.body));
        }
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(|e| Error::Decode {
            message: e.to_string(),
            body_snippet: snip_body(&response.body),
        })
    }
}

/// Classify a failure status and body.
///
/// `ClientRequest` only when the body is a JSON object whose code (from
/// `code`, else `type`) is documented for exactly this status; everything
/// else is `HttpResponse` carrying the raw body text.
pub fn classify(status: u16, body: &[u8]) -> Error {
    let raw = || Error::HttpResponse {
        status,
        body: snip_body(body),
    };
    let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) else {
        return raw();
    };
    let code = ["code", "type"]
        .iter()
        .find_map(|field| map.get(*field).and_then(Value::as_str))
        .map(codes::normalize);
    match code {
        Some(code) if codes::is_known(status, code) => Error::ClientRequest {
            status,
            code: code.to_string(),
            message: error_message(&map),
        },
        _ => raw(),
    }
}

fn error_message(body: &Map<String, Value>) -> String {
    ["message", "detail", "title"]
        .iter()
        .filter_map(|field| body.get(*field).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Decode a parsed body into the caller's model type.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    let snippet = || snip_body(value.to_string().as_bytes());
    T::deserialize(&value).map_err(|e| Error::Decode {
        message: e.to_string(),
        body_snippet: snippet(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde::Deserialize;

    fn core() -> ApiCore {
        ApiCore::new(ClientOptions::new("http://localhost:3000").with_api_key("test-key"))
            .unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn build_drops_null_query_entries() {
        let query = Query::new().with("cursor", None::<String>).with("limit", 10);
        let req = core()
            .build(HttpMethod::Get, "chats/abc/messages", &query, None)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url.as_str(),
            "http://localhost:3000/api/v1/chats/abc/messages?limit=10"
        );
        assert_eq!(req.url.query(), Some("limit=10"));
        assert!(req.body.is_none());
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn build_without_present_query_has_no_question_mark() {
        let query = Query::new().with("cursor", None::<String>);
        let req = core().build(HttpMethod::Get, "accounts", &query, None).unwrap();
        assert_eq!(req.url.as_str(), "http://localhost:3000/api/v1/accounts");
    }

    #[test]
    fn build_preserves_trailing_slash() {
        let req = core()
            .build(HttpMethod::Get, "users/john-doe/", &Query::new(), None)
            .unwrap();
        assert_eq!(req.url.path(), "/api/v1/users/john-doe/");
    }

    #[test]
    fn build_does_not_add_leading_slash() {
        let req = core().build(HttpMethod::Get, "/accounts", &Query::new(), None).unwrap();
        assert_eq!(req.url.path(), "/api/v1//accounts");
    }

    #[test]
    fn build_sets_auth_and_agent_headers() {
        let req = core().build(HttpMethod::Get, "accounts", &Query::new(), None).unwrap();
        assert_eq!(req.header("x-api-key"), Some("test-key"));
        assert!(req.header("user-agent").unwrap().starts_with("comm-client/"));
    }

    #[test]
    fn build_omits_auth_header_without_key() {
        let core = ApiCore::new(ClientOptions::new("http://localhost:3000")).unwrap();
        let req = core.build(HttpMethod::Get, "accounts", &Query::new(), None).unwrap();
        assert!(req.header("x-api-key").is_none());
        assert!(req.header("user-agent").is_some());
    }

    #[test]
    fn build_serializes_body() {
        let body = serde_json::json!({"account_id": "acc", "text": "hello"});
        let req = core()
            .build(HttpMethod::Post, "chats/c1/messages", &Query::new(), Some(&body))
            .unwrap();
        assert_eq!(req.header("content-type"), Some("application/json"));
        let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn build_call_surfaces_serialization_error() {
        struct Broken;
        impl serde::Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("no"))
            }
        }
        let call: Call<Value> = Call::post("x").json(&Broken);
        let err = core().build_call(&call).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn build_call_rejects_empty_required_parameter() {
        let call: Call<Value> = Call::delete("accounts/").require("account_id", false);
        match core().build_call(&call).unwrap_err() {
            Error::InvalidParameter(name) => assert_eq!(name, "account_id"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn new_rejects_invalid_options() {
        let err = ApiCore::new(ClientOptions::default().with_timeout_ms(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Options);
    }

    #[test]
    fn parse_success_returns_json() {
        let value = core().parse(&response(200, r#"{"object":"AccountList"}"#)).unwrap();
        assert_eq!(value["object"], "AccountList");
    }

    #[test]
    fn parse_empty_success_is_null() {
        assert_eq!(core().parse(&response(204, "")).unwrap(), Value::Null);
    }

    #[test]
    fn parse_bad_success_json_is_decode_error() {
        let err = core().parse(&response(200, "not json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn recognized_code_is_client_request_error() {
        let err = core()
            .parse(&response(
                404,
                r#"{"code":"resource_not_found","message":"Account not found"}"#,
            ))
            .unwrap_err();
        match err {
            Error::ClientRequest {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, "resource_not_found");
                assert_eq!(message, "Account not found");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unknown_code_is_http_response_error() {
        let err = classify(404, br#"{"code":"some_unknown_code","message":"?"}"#);
        assert!(matches!(err, Error::HttpResponse { status: 404, .. }));
    }

    #[test]
    fn unexpected_error_under_500_is_recognized() {
        let err = classify(500, br#"{"code":"unexpected_error","message":"boom"}"#);
        assert_eq!(err.kind(), ErrorKind::ClientRequest);
    }

    #[test]
    fn unparsable_500_is_http_response_error() {
        let err = classify(500, b"<html>Internal Server Error</html>");
        match err {
            Error::HttpResponse { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("Internal Server Error"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn code_is_matched_per_status() {
        let err = classify(400, br#"{"code":"limit_exceeded","message":"x"}"#);
        assert_eq!(err.kind(), ErrorKind::HttpResponse);
        let err = classify(422, br#"{"code":"limit_exceeded","message":"x"}"#);
        assert_eq!(err.kind(), ErrorKind::ClientRequest);
    }

    #[test]
    fn provider_shaped_body_uses_type_and_detail() {
        let err = classify(
            401,
            br#"{"status":401,"type":"errors/missing_credentials","title":"Missing credentials","detail":"No API key"}"#,
        );
        assert_eq!(err.code(), Some("missing_credentials"));
        assert!(err.to_string().contains("No API key"));
    }

    #[test]
    fn missing_code_is_http_response_error() {
        let err = classify(404, br#"{"message":"nope"}"#);
        assert_eq!(err.kind(), ErrorKind::HttpResponse);
        let err = classify(404, br#"["resource_not_found"]"#);
        assert_eq!(err.kind(), ErrorKind::HttpResponse);
    }

    #[test]
    fn decode_mismatch_is_decode_error() {
        #[derive(Debug, Deserialize)]
        struct Account {
            id: String,
        }
        let ok: Account = decode(serde_json::json!({"id": "a1"})).unwrap();
        assert_eq!(ok.id, "a1");
        let err = decode::<Account>(serde_json::json!({"name": "x"})).unwrap_err();
        match err {
            Error::Decode { body_snippet, .. } => assert!(body_snippet.contains("name")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
