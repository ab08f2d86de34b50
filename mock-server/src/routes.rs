use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::store::{Account, Chat, Message, Source, Store};
use crate::{ApiError, MockState, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

type ApiResult = Result<Json<Value>, ApiError>;

const SALES_SEARCH_URL_PREFIX: &str = "https://www.linkedin.com/sales/search";
const SEARCH_HITS: usize = 7;
const CLASSIC_SEARCH_MAX: usize = 50;
const SALES_SEARCH_MAX: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub account_id: Option<String>,
    pub cursor: Option<String>,
    pub limit: Option<usize>,
    pub filter: Option<String>,
    pub sender_id: Option<String>,
}

fn decode_cursor(cursor: Option<&str>) -> Result<usize, ApiError> {
    match cursor {
        None => Ok(0),
        Some(raw) => raw
            .strip_prefix("cur_")
            .and_then(|offset| offset.parse().ok())
            .ok_or_else(|| ApiError::invalid(format!("Invalid cursor: {raw}"))),
    }
}

fn page_size(limit: Option<usize>) -> Result<usize, ApiError> {
    match limit.unwrap_or(DEFAULT_PAGE_SIZE) {
        0 => Err(ApiError::invalid("limit must be at least 1")),
        n if n > MAX_PAGE_SIZE => Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "limit_too_high",
            format!("limit must not exceed {MAX_PAGE_SIZE}"),
        )),
        n => Ok(n),
    }
}

/// Slice `items` at the cursor offset and attach the next cursor, if any.
fn page<T: Serialize>(object: &str, items: &[T], params: &ListParams) -> ApiResult {
    let start = decode_cursor(params.cursor.as_deref())?.min(items.len());
    let end = (start + page_size(params.limit)?).min(items.len());
    let cursor = (end < items.len()).then(|| format!("cur_{end}"));
    Ok(Json(json!({
        "object": object,
        "items": &items[start..end],
        "cursor": cursor,
    })))
}

fn require_account<'s>(
    store: &'s Store,
    account_id: Option<&str>,
) -> Result<&'s Account, ApiError> {
    let id = account_id.ok_or_else(|| ApiError::missing("account_id"))?;
    store
        .account(id)
        .ok_or_else(|| ApiError::not_found(format!("Account {id} not found")))
}

fn now() -> String {
    "2024-03-01T10:00:00.000Z".to_string()
}

// --- accounts ---

pub async fn list_accounts(
    State(state): State<MockState>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let store = state.store().read().await;
    page("AccountList", &store.accounts, &params)
}

pub async fn get_account(State(state): State<MockState>, Path(id): Path<String>) -> ApiResult {
    let store = state.store().read().await;
    let account = require_account(&store, Some(&id))?;
    Ok(Json(json!(account)))
}

#[derive(Debug, Deserialize)]
pub struct ConnectAccount {
    pub provider: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
}

pub async fn connect_account(
    State(state): State<MockState>,
    Json(input): Json<ConnectAccount>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = match (&input.username, &input.password, &input.access_token) {
        (Some(username), Some(password), _) if password == "wrong" => {
            return Err(ApiError::new(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                format!("Invalid credentials for {username}"),
            ))
        }
        (Some(username), Some(_), _) => username.clone(),
        (_, _, Some(_)) => "cookie session".to_string(),
        _ => return Err(ApiError::missing("username/password or access_token")),
    };

    let id = format!("acc_{}", Uuid::new_v4().simple());
    state.store().write().await.accounts.push(Account {
        object: "Account",
        id: id.clone(),
        name: name.clone(),
        provider: input.provider,
        created_at: now(),
        sources: vec![Source {
            id: format!("{id}_MESSAGING"),
            status: "OK",
        }],
    });
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "object": "AccountCreated",
            "account_id": id,
            "status": "CREATION_SUCCESS",
            "name": name,
        })),
    ))
}

pub async fn delete_account(State(state): State<MockState>, Path(id): Path<String>) -> ApiResult {
    let mut store = state.store().write().await;
    let before = store.accounts.len();
    store.accounts.retain(|account| account.id != id);
    if store.accounts.len() == before {
        return Err(ApiError::not_found(format!("Account {id} not found")));
    }
    Ok(Json(json!({"object": "AccountDeleted"})))
}

// --- users ---

pub async fn me(State(state): State<MockState>, Query(params): Query<ListParams>) -> ApiResult {
    let store = state.store().read().await;
    let account = require_account(&store, params.account_id.as_deref())?;
    let (first, last) = account
        .name
        .split_once(' ')
        .unwrap_or((account.name.as_str(), ""));
    Ok(Json(json!({
        "object": "AccountOwnerProfile",
        "provider": account.provider,
        "provider_id": format!("me_{}", account.id),
        "first_name": first,
        "last_name": last,
        "email": format!("{}@example.com", first.to_lowercase()),
        "premium": false,
        "open_profile": true,
    })))
}

/// Without the trailing slash the real API answers with a redirect.
pub async fn profile_redirect(
    Path(identifier): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let target = match query {
        Some(query) => format!("/api/v1/users/{identifier}/?{query}"),
        None => format!("/api/v1/users/{identifier}/"),
    };
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]).into_response()
}

pub async fn profile(
    State(state): State<MockState>,
    Path(identifier): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let store = state.store().read().await;
    require_account(&store, params.account_id.as_deref())?;
    if identifier == "unknown" {
        return Err(ApiError::not_found(format!("User {identifier} not found")));
    }
    Ok(Json(json!({
        "object": "UserProfile",
        "provider": "LINKEDIN",
        "provider_id": format!("ACo_{identifier}"),
        "public_identifier": identifier,
        "first_name": "Jane",
        "last_name": "Doe",
        "headline": "Engineer",
        "connections_count": 500,
        "follower_count": 1200,
        "network_distance": "DISTANCE_2",
        "is_open_profile": false,
    })))
}

#[derive(Debug, Deserialize)]
pub struct InviteInput {
    pub provider_id: String,
    pub account_id: String,
    pub message: Option<String>,
}

pub async fn invite(State(state): State<MockState>, Json(input): Json<InviteInput>) -> ApiResult {
    let mut store = state.store().write().await;
    require_account(&store, Some(&input.account_id))?;
    if input.message.as_ref().is_some_and(|m| m.chars().count() > 300) {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "too_many_characters",
            "Invitation message exceeds 300 characters",
        ));
    }
    let key = (input.account_id, input.provider_id);
    if !store.invited.insert(key) {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "already_invited_recently",
            "An invitation was already sent to this user",
        ));
    }
    Ok(Json(json!({
        "object": "UserInvitationSent",
        "invitation_id": Uuid::new_v4().to_string(),
    })))
}

pub async fn relations(
    State(state): State<MockState>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let store = state.store().read().await;
    let account = require_account(&store, params.account_id.as_deref())?;
    let needle = params.filter.as_deref().map(str::to_lowercase);
    let relations: Vec<Value> = store
        .attendees
        .iter()
        .filter(|a| a.account_id == account.id)
        .filter(|a| needle.as_ref().map_or(true, |n| a.name.to_lowercase().contains(n)))
        .map(|a| {
            let (first, last) = a.name.split_once(' ').unwrap_or((a.name.as_str(), ""));
            json!({
                "object": "UserRelation",
                "member_id": a.provider_id,
                "public_identifier": a.provider_id,
                "first_name": first,
                "last_name": last,
                "headline": "Kernel hacker",
                "created_at": 1_700_000_000_000i64,
            })
        })
        .collect();
    page("UserRelationsList", &relations, &params)
}

// --- messaging ---

pub async fn list_attendees(
    State(state): State<MockState>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let store = state.store().read().await;
    let attendees: Vec<_> = store
        .attendees
        .iter()
        .filter(|a| params.account_id.as_ref().map_or(true, |id| &a.account_id == id))
        .collect();
    page("ChatAttendeeList", &attendees, &params)
}

pub async fn chats_by_attendee(
    State(state): State<MockState>,
    Path(attendee_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let store = state.store().read().await;
    let attendee = store
        .attendees
        .iter()
        .find(|a| a.id == attendee_id || a.provider_id == attendee_id)
        .ok_or_else(|| ApiError::not_found(format!("Attendee {attendee_id} not found")))?;
    let chats: Vec<&Chat> = store
        .chats
        .iter()
        .filter(|chat| chat.attendee_ids.contains(&attendee.id))
        .filter(|chat| params.account_id.as_ref().map_or(true, |id| &chat.account_id == id))
        .collect();
    page("ChatList", &chats, &params)
}

pub async fn list_messages(
    State(state): State<MockState>,
    Path(chat_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let store = state.store().read().await;
    if !store.chats.iter().any(|chat| chat.id == chat_id) {
        return Err(ApiError::not_found(format!("Chat {chat_id} not found")));
    }
    let messages: Vec<&Message> = store
        .messages
        .iter()
        .filter(|m| m.chat_id == chat_id)
        .filter(|m| params.sender_id.as_ref().map_or(true, |s| &m.sender_id == s))
        .collect();
    page("MessageList", &messages, &params)
}

#[derive(Debug, Deserialize)]
pub struct SendMessageInput {
    pub account_id: String,
    pub text: Option<String>,
}

pub async fn send_message(
    State(state): State<MockState>,
    Path(chat_id): Path<String>,
    Json(input): Json<SendMessageInput>,
) -> ApiResult {
    let mut store = state.store().write().await;
    require_account(&store, Some(&input.account_id))?;
    if !store.chats.iter().any(|chat| chat.id == chat_id) {
        return Err(ApiError::not_found(format!("Chat {chat_id} not found")));
    }
    let text = input
        .text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::missing("text"))?;
    let id = format!("msg_{}", Uuid::new_v4().simple());
    store.messages.push(Message {
        object: "Message",
        id: id.clone(),
        chat_id,
        sender_id: "me".to_string(),
        text,
        timestamp: now(),
    });
    Ok(Json(json!({"object": "MessageSent", "message_id": id})))
}

#[derive(Debug, Deserialize)]
pub struct StartChatInput {
    pub account_id: String,
    #[serde(default)]
    pub attendees_ids: Vec<String>,
    pub text: Option<String>,
}

pub async fn start_chat(
    State(state): State<MockState>,
    Json(input): Json<StartChatInput>,
) -> ApiResult {
    let mut store = state.store().write().await;
    let account_id = require_account(&store, Some(&input.account_id))?.id.clone();
    if input.attendees_ids.is_empty() {
        return Err(ApiError::missing("attendees_ids"));
    }
    let attendee_ids = input
        .attendees_ids
        .iter()
        .map(|provider_id| {
            store
                .attendees
                .iter()
                .find(|a| &a.provider_id == provider_id)
                .map(|a| a.id.clone())
                .ok_or_else(|| {
                    ApiError::new(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "invalid_recipient",
                        format!("Unknown recipient {provider_id}"),
                    )
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let chat_id = format!("chat_{}", Uuid::new_v4().simple());
    let message_id = format!("msg_{}", Uuid::new_v4().simple());
    store.chats.push(Chat {
        object: "Chat",
        id: chat_id.clone(),
        account_id,
        provider_id: format!("{chat_id}_provider"),
        name: None,
        timestamp: now(),
        unread_count: 0,
        attendee_ids,
    });
    store.messages.push(Message {
        object: "Message",
        id: message_id.clone(),
        chat_id: chat_id.clone(),
        sender_id: "me".to_string(),
        text: input.text.unwrap_or_default(),
        timestamp: now(),
    });
    Ok(Json(json!({
        "object": "ChatStarted",
        "chat_id": chat_id,
        "message_id": message_id,
    })))
}

// --- hosted auth ---

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`
fn is_expiry_format(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 24
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 | 16 => *b == b':',
            19 => *b == b'.',
            23 => *b == b'Z',
            _ => b.is_ascii_digit(),
        })
}

pub async fn hosted_link(Json(input): Json<Value>) -> ApiResult {
    let expires_on = input
        .get("expiresOn")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::missing("expiresOn"))?;
    if !is_expiry_format(expires_on) {
        return Err(ApiError::invalid(format!("Invalid expiresOn: {expires_on}")));
    }
    for field in ["type", "providers", "api_url"] {
        if input.get(field).is_none() {
            return Err(ApiError::missing(field));
        }
    }
    Ok(Json(json!({
        "object": "HostedAuthURL",
        "url": format!("https://account.unipile.com/{}", Uuid::new_v4()),
    })))
}

// --- search ---

pub async fn search(
    State(state): State<MockState>,
    Query(params): Query<ListParams>,
    Json(input): Json<Value>,
) -> ApiResult {
    let store = state.store().read().await;
    require_account(&store, params.account_id.as_deref())?;

    let api = input
        .get("api")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::missing("api"))?;
    let sales = match api {
        "classic" => false,
        "sales_navigator" => true,
        "url" => input
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::missing("url"))?
            .starts_with(SALES_SEARCH_URL_PREFIX),
        other => return Err(ApiError::invalid(format!("Unknown api: {other}"))),
    };
    let max = if sales { SALES_SEARCH_MAX } else { CLASSIC_SEARCH_MAX };
    let limit = params.limit.unwrap_or(10);
    if limit > max {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "limit_too_high",
            format!("limit must not exceed {max} for this search"),
        ));
    }
    let category = input.get("category").and_then(Value::as_str).unwrap_or("people");

    let hits: Vec<Value> = (1..=SEARCH_HITS)
        .map(|n| {
            if category == "companies" {
                json!({
                    "object": "SearchResult",
                    "type": "COMPANY",
                    "id": format!("co_{n}"),
                    "name": format!("Company {n}"),
                    "profile_url": format!("https://www.linkedin.com/company/{n}"),
                    "industry": "Software",
                    "followers_count": n * 100,
                    "headcount": "11-50",
                })
            } else {
                json!({
                    "object": "SearchResult",
                    "type": "PEOPLE",
                    "id": format!("p_{n}"),
                    "public_identifier": format!("person-{n}"),
                    "first_name": "Person",
                    "last_name": format!("{n}"),
                    "headline": "Engineer",
                    "network_distance": "DISTANCE_2",
                    "premium": n % 2 == 0,
                })
            }
        })
        .collect();

    let start = decode_cursor(params.cursor.as_deref())?.min(hits.len());
    let end = (start + limit.max(1)).min(hits.len());
    let cursor = (end < hits.len()).then(|| format!("cur_{end}"));
    Ok(Json(json!({
        "object": "LinkedinSearch",
        "items": &hits[start..end],
        "config": {"api": api, "category": category, "limit": limit},
        "paging": {"start": start, "page_count": end - start, "total_count": hits.len()},
        "cursor": cursor,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ParameterQuery {
    pub account_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub keywords: Option<String>,
}

const PARAMETER_TYPES: &[&str] = &[
    "LOCATION",
    "PEOPLE",
    "COMPANY",
    "SCHOOL",
    "INDUSTRY",
    "SERVICE",
    "JOB_FUNCTION",
    "JOB_TITLE",
    "EMPLOYMENT_TYPE",
    "SKILL",
];

pub async fn search_parameters(
    State(state): State<MockState>,
    Query(query): Query<ParameterQuery>,
) -> ApiResult {
    let store = state.store().read().await;
    require_account(&store, query.account_id.as_deref())?;
    let kind = query.kind.ok_or_else(|| ApiError::missing("type"))?;
    if !PARAMETER_TYPES.contains(&kind.as_str()) {
        return Err(ApiError::invalid(format!("Unknown parameter type: {kind}")));
    }
    let keywords = query.keywords.unwrap_or_default();
    let items: Vec<Value> = (1..=2)
        .map(|n| {
            json!({
                "object": "LinkedinSearchParameter",
                "id": format!("{}_{n}", kind.to_lowercase()),
                "title": format!("{keywords} {n}"),
            })
        })
        .collect();
    Ok(Json(json!({
        "object": "LinkedinSearchParametersList",
        "items": items,
        "paging": {"page_count": 1},
    })))
}

pub async fn company(
    State(state): State<MockState>,
    Path(identifier): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let store = state.store().read().await;
    require_account(&store, params.account_id.as_deref())?;
    if identifier != "unipile" && identifier != "co_1" {
        return Err(ApiError::not_found(format!("Company {identifier} not found")));
    }
    Ok(Json(json!({
        "object": "CompanyProfile",
        "id": "co_1",
        "name": "Unipile",
        "public_identifier": "unipile",
        "profile_url": "https://www.linkedin.com/company/unipile",
        "description": "Messaging API",
        "employee_count": 42,
    })))
}

// --- test helpers ---

#[derive(Debug, Deserialize)]
pub struct SlowQuery {
    #[serde(default)]
    pub ms: u64,
}

pub async fn slow(Query(query): Query<SlowQuery>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(query.ms)).await;
    Json(json!({"object": "Slow", "ms": query.ms}))
}

#[derive(Debug, Deserialize)]
pub struct ErrorQuery {
    pub code: Option<String>,
    pub field: Option<String>,
    pub message: Option<String>,
}

/// Respond with `status`. With `code`, the body is a provider error whose
/// code sits in `field` (default `type`); without it, plain text.
pub async fn error(Path(status): Path<u16>, Query(query): Query<ErrorQuery>) -> Response {
    let Ok(status) = StatusCode::from_u16(status) else {
        return ApiError::invalid("status out of range").into_response();
    };
    match query.code {
        Some(code) => {
            let field = query.field.unwrap_or_else(|| "type".to_string());
            let mut body = json!({
                "title": status.canonical_reason().unwrap_or("Error"),
                "status": status.as_u16(),
            });
            body[field] = json!(code);
            if let Some(message) = query.message {
                body["detail"] = json!(message);
            }
            (status, Json(body)).into_response()
        }
        None => (status, "upstream failure").into_response(),
    }
}

pub async fn empty() -> StatusCode {
    StatusCode::OK
}

/// Reflect what the client sent, minus the API key.
pub async fn echo(
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Json<Value> {
    let value_of = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "headers": {
            "user-agent": value_of(header::USER_AGENT),
            "accept": value_of(header::ACCEPT),
            "content-type": value_of(header::CONTENT_TYPE),
        },
        "body": serde_json::from_slice::<Value>(&body).ok(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursors_are_offsets() {
        assert_eq!(decode_cursor(None).unwrap(), 0);
        assert_eq!(decode_cursor(Some("cur_4")).unwrap(), 4);
        assert!(decode_cursor(Some("4")).is_err());
    }

    #[test]
    fn page_emits_cursor_until_exhausted() {
        let items = [1, 2, 3];
        let params = ListParams {
            limit: Some(2),
            ..ListParams::default()
        };
        let Json(first) = page("List", &items, &params).unwrap();
        assert_eq!(first["items"], json!([1, 2]));
        assert_eq!(first["cursor"], "cur_2");

        let params = ListParams {
            limit: Some(2),
            cursor: Some("cur_2".into()),
            ..ListParams::default()
        };
        let Json(last) = page("List", &items, &params).unwrap();
        assert_eq!(last["items"], json!([3]));
        assert!(last["cursor"].is_null());
    }

    #[test]
    fn page_size_bounds() {
        assert_eq!(page_size(None).unwrap(), DEFAULT_PAGE_SIZE);
        assert!(page_size(Some(0)).is_err());
        assert!(page_size(Some(MAX_PAGE_SIZE + 1)).is_err());
    }

    #[test]
    fn expiry_format() {
        assert!(is_expiry_format("2025-03-02T01:30:05.123Z"));
        assert!(!is_expiry_format("2025-03-02T01:30:05Z"));
        assert!(!is_expiry_format("2025-03-02 01:30:05.123Z"));
    }
}
