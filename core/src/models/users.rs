use serde::{Deserialize, Serialize};

use super::Extra;

/// Profile of the person who owns a linked account (`users/me`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerProfile {
    #[serde(default)]
    pub provider: Option<String>,
    pub provider_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub premium: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Public profile of any user, looked up by identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub provider_id: String,
    #[serde(default)]
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub connections_count: Option<u64>,
    #[serde(default)]
    pub follower_count: Option<u64>,
    #[serde(default)]
    pub network_distance: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// One connection of the account owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRelation {
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body of `POST users/invite`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvitePayload {
    pub provider_id: String,
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InvitePayload {
    pub fn new(account_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            account_id: account_id.into(),
            message: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvitationSent {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub invitation_id: Option<String>,
}
