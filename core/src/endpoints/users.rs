use crate::call::Call;
use crate::execute::Execute;
use crate::models::{InvitationSent, InvitePayload, OwnerProfile, UserProfile, UserRelation};
use crate::pagination::{Cursor, CursorPage};

/// Profiles, invitations and relations.
pub struct Users<'a, E> {
    exec: &'a E,
}

impl<'a, E: Execute> Users<'a, E> {
    pub fn new(exec: &'a E) -> Self {
        Self { exec }
    }

    /// Profile of the account owner.
    pub fn me(&self, account_id: &str) -> E::Output<OwnerProfile> {
        self.exec.execute(
            Call::get("users/me")
                .require("account_id", !account_id.is_empty())
                .query("account_id", account_id),
        )
    }

    /// Profile of any user, by public identifier or provider ID.
    pub fn retrieve(&self, account_id: &str, identifier: &str) -> E::Output<UserProfile> {
        // The route answers 301 without the trailing slash, and the redirect
        // drops the API key.
        self.exec.execute(
            Call::get(format!("users/{identifier}/"))
                .require("account_id", !account_id.is_empty())
                .require("identifier", !identifier.is_empty())
                .query("account_id", account_id),
        )
    }

    pub fn invite(&self, payload: &InvitePayload) -> E::Output<InvitationSent> {
        self.exec.execute(
            Call::post("users/invite")
                .require("account_id", !payload.account_id.is_empty())
                .require("provider_id", !payload.provider_id.is_empty())
                .json(payload),
        )
    }

    pub fn relations(
        &self,
        account_id: &str,
        filter: Option<&str>,
        cursor: Option<Cursor>,
        limit: Option<u32>,
    ) -> E::Output<CursorPage<UserRelation>> {
        self.exec.execute(
            Call::get("users/relations")
                .require("account_id", !account_id.is_empty())
                .query("account_id", account_id)
                .query("filter", filter)
                .query("cursor", cursor)
                .query("limit", limit),
        )
    }
}
