use serde::{Deserialize, Serialize, Serializer};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use super::AccountProvider;

/// Whether a hosted link creates a new account or reconnects an existing one.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HostedLinkType {
    #[default]
    Create,
    Reconnect,
}

/// Body of `POST hosted/accounts/link`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HostedLinkRequest {
    #[serde(rename = "type")]
    pub kind: HostedLinkType,
    pub providers: Vec<AccountProvider>,
    pub api_url: String,
    #[serde(rename = "expiresOn", serialize_with = "serialize_expires_on")]
    pub expires_on: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_redirect_url: Option<String>,
    /// Account to reconnect; only meaningful with [`HostedLinkType::Reconnect`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconnect_account: Option<String>,
}

impl HostedLinkRequest {
    /// A `create` link for LinkedIn accounts.
    pub fn new(api_url: impl Into<String>, expires_on: OffsetDateTime) -> Self {
        Self {
            kind: HostedLinkType::Create,
            providers: vec![AccountProvider::Linkedin],
            api_url: api_url.into(),
            expires_on,
            name: None,
            notify_url: None,
            success_redirect_url: None,
            failure_redirect_url: None,
            reconnect_account: None,
        }
    }

    pub fn reconnect(mut self, account_id: impl Into<String>) -> Self {
        self.kind = HostedLinkType::Reconnect;
        self.reconnect_account = Some(account_id.into());
        self
    }

    pub fn providers(mut self, providers: Vec<AccountProvider>) -> Self {
        self.providers = providers;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    pub fn success_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.success_redirect_url = Some(url.into());
        self
    }

    pub fn failure_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.failure_redirect_url = Some(url.into());
        self
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`, always in UTC.
fn serialize_expires_on<S: Serializer>(
    value: &OffsetDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    let rendered = value
        .to_offset(UtcOffset::UTC)
        .format(&format)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&rendered)
}

/// The hosted authentication URL to hand to the end user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostedLink {
    #[serde(default)]
    pub object: Option<String>,
    pub url: String,
}
