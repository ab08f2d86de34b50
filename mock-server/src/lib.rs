//! In-memory emulation of the messaging API for end-to-end tests.
//!
//! Everything lives under `/api/v1` behind an `x-api-key` check, list routes
//! paginate with opaque cursors, and failures use the provider's error body
//! (`type: "errors/<code>"`, `title`, `detail`, `status`). A few auxiliary
//! routes (`slow`, `errors/{status}`, `empty`, `echo`) exist only to drive
//! client edge cases.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

mod routes;
mod store;

pub use store::{Account, Attendee, Chat, Message, RecordedRequest, Store};

pub const API_KEY: &str = "test-key";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 250;

/// Shared server state: the data store and the request log.
#[derive(Clone)]
pub struct MockState {
    store: Arc<RwLock<Store>>,
    api_key: Arc<str>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MockState {
    pub fn seeded() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::seeded())),
            api_key: Arc::from(API_KEY),
        }
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Arc::from(key);
        self
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.store.read().await.requests.clone()
    }

    /// Requests whose path ends with `suffix`.
    pub async fn requests_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|request| request.path.ends_with(suffix))
            .collect()
    }

    pub(crate) fn store(&self) -> &RwLock<Store> {
        &self.store
    }
}

/// A provider-shaped error response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "resource_not_found", detail)
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_parameters", detail)
    }

    pub fn missing(parameter: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "missing_parameters",
            format!("{parameter} is required"),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let title = self
            .status
            .canonical_reason()
            .unwrap_or("Error")
            .to_string();
        let body = json!({
            "title": title,
            "detail": self.detail,
            "instance": null,
            "status": self.status.as_u16(),
            "type": format!("errors/{}", self.code),
        });
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    app_with_state(MockState::seeded())
}

pub fn app_with_state(state: MockState) -> Router {
    let api = Router::new()
        .route("/accounts", get(routes::list_accounts).post(routes::connect_account))
        .route(
            "/accounts/{id}",
            get(routes::get_account).delete(routes::delete_account),
        )
        .route("/users/me", get(routes::me))
        .route("/users/invite", post(routes::invite))
        .route("/users/relations", get(routes::relations))
        .route("/users/{identifier}", get(routes::profile_redirect))
        .route("/users/{identifier}/", get(routes::profile))
        .route("/chat_attendees", get(routes::list_attendees))
        .route("/chat_attendees/{id}/chats", get(routes::chats_by_attendee))
        .route("/chats", post(routes::start_chat))
        .route(
            "/chats/{id}/messages",
            get(routes::list_messages).post(routes::send_message),
        )
        .route("/hosted/accounts/link", post(routes::hosted_link))
        .route("/linkedin/search", post(routes::search))
        .route("/linkedin/search/parameters", get(routes::search_parameters))
        .route("/linkedin/company/{identifier}", get(routes::company))
        .route("/slow", get(routes::slow))
        .route("/errors/{status}", get(routes::error))
        .route("/empty", any(routes::empty))
        .route("/echo", any(routes::echo))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::seeded()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

/// Record the request, then reject it unless it carries the expected key.
async fn authenticate(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return ApiError::new(StatusCode::BAD_REQUEST, "malformed_request", err.to_string())
                .into_response()
        }
    };

    let api_key = parts
        .headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        api_key: api_key.clone(),
        body: serde_json::from_slice::<Value>(&bytes).ok(),
    };
    tracing::debug!(method = %recorded.method, path = %recorded.path, "mock.request");
    state.store().write().await.requests.push(recorded);

    match api_key {
        None => {
            return ApiError::new(StatusCode::UNAUTHORIZED, "missing_credentials", "Missing API key")
                .into_response()
        }
        Some(key) if key.as_str() != &*state.api_key => {
            return ApiError::new(StatusCode::UNAUTHORIZED, "invalid_credentials", "Invalid API key")
                .into_response()
        }
        Some(_) => {}
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn error_body_is_provider_shaped() {
        let response = ApiError::not_found("Account not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["type"], "errors/resource_not_found");
        assert_eq!(body["title"], "Not Found");
        assert_eq!(body["detail"], "Account not found");
        assert_eq!(body["status"], 404);
    }

    #[test]
    fn missing_parameter_names_it() {
        let err = ApiError::missing("account_id");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "missing_parameters");
        assert_eq!(err.detail, "account_id is required");
    }
}
