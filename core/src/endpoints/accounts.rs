use crate::call::Call;
use crate::execute::Execute;
use crate::models::{Account, ConnectAccount, ConnectAccountResponse, Deleted};
use crate::pagination::{Cursor, CursorPage};

/// Accounts linked to the API.
pub struct Accounts<'a, E> {
    exec: &'a E,
}

impl<'a, E: Execute> Accounts<'a, E> {
    pub fn new(exec: &'a E) -> Self {
        Self { exec }
    }

    pub fn list(
        &self,
        cursor: Option<Cursor>,
        limit: Option<u32>,
    ) -> E::Output<CursorPage<Account>> {
        self.exec.execute(
            Call::get("accounts")
                .query("cursor", cursor)
                .query("limit", limit),
        )
    }

    pub fn retrieve(&self, account_id: &str) -> E::Output<Account> {
        self.exec.execute(
            Call::get(format!("accounts/{account_id}"))
                .require("account_id", !account_id.is_empty()),
        )
    }

    /// Link a new account by credentials or session cookie.
    pub fn connect(&self, payload: &ConnectAccount) -> E::Output<ConnectAccountResponse> {
        self.exec.execute(Call::post("accounts").json(payload))
    }

    pub fn delete(&self, account_id: &str) -> E::Output<Deleted> {
        self.exec.execute(
            Call::delete(format!("accounts/{account_id}"))
                .require("account_id", !account_id.is_empty()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::describe::{pairs, query, Describe};
    use crate::http::HttpMethod;
    use crate::models::AccountProvider;
    use serde_json::json;

    #[test]
    fn list_sends_only_present_parameters() {
        let call = Accounts::new(&Describe).list(None, Some(25));
        assert_eq!(call.method(), HttpMethod::Get);
        assert_eq!(call.path(), "accounts");
        assert_eq!(query(&call), pairs(&[("limit", "25")]));

        let call = Accounts::new(&Describe).list(Some("c2".into()), None);
        assert_eq!(query(&call), pairs(&[("cursor", "c2")]));
    }

    #[test]
    fn connect_posts_payload() {
        let payload =
            ConnectAccount::with_credentials(AccountProvider::Linkedin, "jane@example.com", "pw");
        let call = Accounts::new(&Describe).connect(&payload);
        assert_eq!(call.method(), HttpMethod::Post);
        assert_eq!(call.path(), "accounts");
        assert_eq!(
            call.body(),
            Some(&json!({"provider": "LINKEDIN", "username": "jane@example.com", "password": "pw"}))
        );
    }

    #[test]
    fn empty_account_id_is_rejected() {
        let accounts = Accounts::new(&Describe);
        assert_eq!(accounts.retrieve("").missing_parameter(), Some("account_id"));
        assert_eq!(accounts.delete("").missing_parameter(), Some("account_id"));
        assert_eq!(accounts.delete("acc_1").missing_parameter(), None);
    }

    #[test]
    fn delete_targets_account() {
        let call = Accounts::new(&Describe).delete("acc_9");
        assert_eq!(call.method(), HttpMethod::Delete);
        assert_eq!(call.path(), "accounts/acc_9");
        assert!(call.body().is_none());
    }
}
