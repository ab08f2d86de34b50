use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

/// A linked account as listed by `GET /accounts`.
#[derive(Clone, Debug, Serialize)]
pub struct Account {
    pub object: &'static str,
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub provider: String,
    pub created_at: String,
    pub sources: Vec<Source>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Source {
    pub id: String,
    pub status: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct Attendee {
    pub object: &'static str,
    pub id: String,
    pub account_id: String,
    pub provider_id: String,
    pub name: String,
    pub profile_url: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Chat {
    pub object: &'static str,
    pub id: String,
    pub account_id: String,
    pub provider_id: String,
    pub name: Option<String>,
    pub timestamp: String,
    pub unread_count: u64,
    #[serde(skip)]
    pub attendee_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub object: &'static str,
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub text: String,
    pub timestamp: String,
}

/// One request as seen by the server, before authentication.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub api_key: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// Decoded value of the first query parameter called `name`.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url_pairs(query)
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

fn url_pairs(query: &str) -> Vec<(String, String)> {
    serde_urlencoded::from_str(query).unwrap_or_default()
}

#[derive(Debug, Default)]
pub struct Store {
    pub accounts: Vec<Account>,
    pub attendees: Vec<Attendee>,
    pub chats: Vec<Chat>,
    pub messages: Vec<Message>,
    pub invited: HashSet<(String, String)>,
    pub requests: Vec<RecordedRequest>,
}

const ACCOUNTS: &[(&str, &str, &str)] = &[
    ("acc_1", "Ada Lovelace", "LINKEDIN"),
    ("acc_2", "Grace Hopper", "LINKEDIN"),
    ("acc_3", "Alan Turing", "WHATSAPP"),
    ("acc_4", "Edsger Dijkstra", "LINKEDIN"),
    ("acc_5", "Barbara Liskov", "LINKEDIN"),
];

const ATTENDEES: &[(&str, &str, &str)] = &[
    ("att_1", "prov_1", "Linus Torvalds"),
    ("att_2", "prov_2", "Ken Thompson"),
    ("att_3", "prov_3", "Dennis Ritchie"),
];

const CHATS: &[(&str, &[&str], usize)] = &[
    ("chat_1", &["att_1"], 5),
    ("chat_2", &["att_1", "att_2"], 2),
    ("chat_3", &["att_3"], 0),
];

impl Store {
    /// Deterministic fixture data; every attendee and chat belongs to `acc_1`.
    pub fn seeded() -> Self {
        let accounts = ACCOUNTS
            .iter()
            .map(|(id, name, provider)| Account {
                object: "Account",
                id: id.to_string(),
                name: name.to_string(),
                provider: provider.to_string(),
                created_at: "2024-01-15T09:30:00.000Z".to_string(),
                sources: vec![Source {
                    id: format!("{id}_MESSAGING"),
                    status: "OK",
                }],
            })
            .collect();

        let attendees = ATTENDEES
            .iter()
            .map(|(id, provider_id, name)| Attendee {
                object: "ChatAttendee",
                id: id.to_string(),
                account_id: "acc_1".to_string(),
                provider_id: provider_id.to_string(),
                name: name.to_string(),
                profile_url: format!("https://www.linkedin.com/in/{provider_id}"),
            })
            .collect();

        let mut chats = Vec::new();
        let mut messages = Vec::new();
        for (chat_id, attendee_ids, message_count) in CHATS {
            chats.push(Chat {
                object: "Chat",
                id: chat_id.to_string(),
                account_id: "acc_1".to_string(),
                provider_id: format!("{chat_id}_provider"),
                name: None,
                timestamp: "2024-02-01T12:00:00.000Z".to_string(),
                unread_count: 0,
                attendee_ids: attendee_ids.iter().map(|id| id.to_string()).collect(),
            });
            for n in 1..=*message_count {
                let sender = if n % 2 == 1 { "prov_1" } else { "me" };
                messages.push(Message {
                    object: "Message",
                    id: format!("msg_{chat_id}_{n}"),
                    chat_id: chat_id.to_string(),
                    sender_id: sender.to_string(),
                    text: format!("message {n}"),
                    timestamp: format!("2024-02-01T12:{n:02}:00.000Z"),
                });
            }
        }

        Self {
            accounts,
            attendees,
            chats,
            messages,
            invited: HashSet::new(),
            requests: Vec::new(),
        }
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_is_consistent() {
        let store = Store::seeded();
        assert_eq!(store.accounts.len(), 5);
        assert!(store.account("acc_1").is_some());
        for chat in &store.chats {
            for attendee in &chat.attendee_ids {
                assert!(store.attendees.iter().any(|a| &a.id == attendee));
            }
        }
        assert_eq!(
            store.messages.iter().filter(|m| m.chat_id == "chat_1").count(),
            5
        );
    }

    #[test]
    fn chat_attendee_ids_are_not_serialized() {
        let store = Store::seeded();
        let json = serde_json::to_value(&store.chats[0]).unwrap();
        assert!(json.get("attendee_ids").is_none());
        assert_eq!(json["object"], "Chat");
    }

    #[test]
    fn recorded_query_params_are_decoded() {
        let request = RecordedRequest {
            method: "GET".into(),
            path: "/api/v1/accounts".into(),
            query: Some("cursor=cur_2&keywords=a%20b".into()),
            api_key: None,
            body: None,
        };
        assert_eq!(request.query_param("keywords").as_deref(), Some("a b"));
        assert_eq!(request.query_param("cursor").as_deref(), Some("cur_2"));
        assert_eq!(request.query_param("limit"), None);
    }
}
