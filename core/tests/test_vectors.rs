//! Verify request building and response classification against the JSON
//! vectors in `test-vectors/`.
//!
//! Bodies are compared as parsed JSON, not raw strings, so field order does
//! not matter.

use comm_core::{
    ApiCore, ClientOptions, Error, ErrorKind, HttpMethod, HttpResponse, Query, QueryValue,
};
use serde_json::Value;

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn query_value(value: &Value) -> QueryValue {
    match value {
        Value::Null => QueryValue::Null,
        Value::Bool(b) => QueryValue::Bool(*b),
        Value::Number(n) if n.is_i64() => QueryValue::Int(n.as_i64().unwrap()),
        Value::Number(n) => QueryValue::Float(n.as_f64().unwrap()),
        Value::String(s) => QueryValue::Text(s.clone()),
        other => panic!("unsupported query value: {other}"),
    }
}

fn options(case: &Value) -> ClientOptions {
    let raw = &case["options"];
    let mut options = ClientOptions::new(raw["base_url"].as_str().unwrap());
    if let Some(key) = raw["api_key"].as_str() {
        options = options.with_api_key(key);
    }
    if let Some(version) = raw["api_version"].as_str() {
        options = options.with_api_version(version);
    }
    options
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let core = ApiCore::new(options(case)).unwrap();

        let mut query = Query::new();
        for pair in case["query"].as_array().unwrap() {
            query.push(pair[0].as_str().unwrap(), query_value(&pair[1]));
        }
        let body = (!case["body"].is_null()).then(|| case["body"].clone());

        let request = core
            .build(
                parse_method(case["method"].as_str().unwrap()),
                case["path"].as_str().unwrap(),
                &query,
                body.as_ref(),
            )
            .unwrap();

        let expected = &case["expected"];
        assert_eq!(request.url.as_str(), expected["url"].as_str().unwrap(), "{name}: url");

        for (header, value) in expected["headers"].as_object().unwrap() {
            assert_eq!(
                request.header(header),
                value.as_str(),
                "{name}: header {header}"
            );
        }

        let sent: Option<Value> = request
            .body
            .as_deref()
            .map(|body| serde_json::from_str(body).unwrap());
        let expected_body = (!expected["body"].is_null()).then(|| expected["body"].clone());
        assert_eq!(sent, expected_body, "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn classify_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let core = ApiCore::new(ClientOptions::new("http://localhost:3000")).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().as_bytes().to_vec(),
        };
        let expected = &case["expected"];
        let result = core.parse(&response);

        match expected["kind"].as_str().unwrap() {
            "ok" => assert_eq!(result.unwrap(), expected["value"], "{name}"),
            "decode" => assert_eq!(result.unwrap_err().kind(), ErrorKind::Decode, "{name}"),
            "client_request" => match result.unwrap_err() {
                Error::ClientRequest { status, code, message } => {
                    assert_eq!(status, response.status, "{name}: status");
                    assert_eq!(code, expected["code"].as_str().unwrap(), "{name}: code");
                    assert_eq!(message, expected["message"].as_str().unwrap(), "{name}: message");
                }
                other => panic!("{name}: expected ClientRequest, got {other:?}"),
            },
            "http_response" => match result.unwrap_err() {
                Error::HttpResponse { status, body } => {
                    assert_eq!(status, response.status, "{name}: status");
                    if let Some(expected_body) = expected["body"].as_str() {
                        assert_eq!(body, expected_body, "{name}: body");
                    }
                }
                other => panic!("{name}: expected HttpResponse, got {other:?}"),
            },
            other => panic!("{name}: unknown expected kind {other}"),
        }
    }
}
