use serde::{Deserialize, Serialize};

use super::Extra;

/// Messaging provider an account belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountProvider {
    Linkedin,
    Whatsapp,
    Instagram,
    Messenger,
    Telegram,
    Twitter,
    Google,
    Outlook,
    Mail,
}

/// An account linked to the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Provider name as reported by the remote, e.g. `LINKEDIN`.
    #[serde(rename = "type", default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub sources: Vec<AccountSource>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Synchronisation source of an account and its status (`OK`, `CREDENTIALS`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSource {
    pub id: String,
    pub status: String,
}

/// Body of `POST accounts`: link an account by credentials or by session cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectAccount {
    pub provider: AccountProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ConnectAccount {
    pub fn with_credentials(
        provider: AccountProvider,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            username: Some(username.into()),
            password: Some(password.into()),
            access_token: None,
            user_agent: None,
            country: None,
        }
    }

    pub fn with_cookie(
        provider: AccountProvider,
        access_token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            username: None,
            password: None,
            access_token: Some(access_token.into()),
            user_agent: Some(user_agent.into()),
            country: None,
        }
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Result of linking an account. `status` is `CREATION_SUCCESS` or
/// `RECONNECTED`; a provider checkpoint (2FA, captcha) comes back in
/// `checkpoint` instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectAccountResponse {
    #[serde(default)]
    pub object: Option<String>,
    pub account_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub checkpoint: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connect_body_omits_unset_fields() {
        let body = serde_json::to_value(ConnectAccount::with_cookie(
            AccountProvider::Linkedin,
            "li_at",
            "Mozilla/5.0",
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({"provider": "LINKEDIN", "access_token": "li_at", "user_agent": "Mozilla/5.0"})
        );
    }

    #[test]
    fn account_keeps_unknown_fields() {
        let account: Account = serde_json::from_value(json!({
            "object": "Account",
            "id": "acc_1",
            "name": "Jane",
            "type": "LINKEDIN",
            "sources": [{"id": "acc_1_MESSAGING", "status": "OK"}],
            "connection_params": {"im": {"username": "jane"}}
        }))
        .unwrap();
        assert_eq!(account.provider.as_deref(), Some("LINKEDIN"));
        assert_eq!(account.sources[0].status, "OK");
        assert!(account.extra.contains_key("connection_params"));
    }
}
