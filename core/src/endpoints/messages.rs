use serde::Serialize;

use crate::call::Call;
use crate::execute::Execute;
use crate::models::{Chat, ChatAttendee, ChatStarted, Message, MessageSent};
use crate::pagination::{Cursor, CursorPage};

/// Chats, attendees and messages.
pub struct Messages<'a, E> {
    exec: &'a E,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    account_id: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct StartChat<'a> {
    account_id: &'a str,
    attendees_ids: &'a [&'a str],
    text: &'a str,
}

impl<'a, E: Execute> Messages<'a, E> {
    pub fn new(exec: &'a E) -> Self {
        Self { exec }
    }

    pub fn chat_attendees(
        &self,
        account_id: &str,
        cursor: Option<Cursor>,
        limit: Option<u32>,
    ) -> E::Output<CursorPage<ChatAttendee>> {
        self.exec.execute(
            Call::get("chat_attendees")
                .require("account_id", !account_id.is_empty())
                .query("account_id", account_id)
                .query("cursor", cursor)
                .query("limit", limit),
        )
    }

    /// Chats in which `attendee_id` takes part.
    pub fn chats_by_attendee(
        &self,
        attendee_id: &str,
        account_id: &str,
        cursor: Option<Cursor>,
        limit: Option<u32>,
    ) -> E::Output<CursorPage<Chat>> {
        self.exec.execute(
            Call::get(format!("chat_attendees/{attendee_id}/chats"))
                .require("attendee_id", !attendee_id.is_empty())
                .require("account_id", !account_id.is_empty())
                .query("account_id", account_id)
                .query("cursor", cursor)
                .query("limit", limit),
        )
    }

    /// Messages of a chat, optionally only those sent by `sender_id`.
    pub fn messages(
        &self,
        chat_id: &str,
        sender_id: Option<&str>,
        cursor: Option<Cursor>,
        limit: Option<u32>,
    ) -> E::Output<CursorPage<Message>> {
        self.exec.execute(
            Call::get(format!("chats/{chat_id}/messages"))
                .require("chat_id", !chat_id.is_empty())
                .query("sender_id", sender_id)
                .query("cursor", cursor)
                .query("limit", limit),
        )
    }

    pub fn send_message(
        &self,
        chat_id: &str,
        account_id: &str,
        text: &str,
    ) -> E::Output<MessageSent> {
        self.exec.execute(
            Call::post(format!("chats/{chat_id}/messages"))
                .require("chat_id", !chat_id.is_empty())
                .require("account_id", !account_id.is_empty())
                .json(&SendMessage { account_id, text }),
        )
    }

    /// Open a new chat with one or more attendees (by provider ID).
    pub fn start_chat(
        &self,
        attendee_ids: &[&str],
        account_id: &str,
        text: &str,
    ) -> E::Output<ChatStarted> {
        self.exec.execute(
            Call::post("chats")
                .require("account_id", !account_id.is_empty())
                .require("attendees_ids", !attendee_ids.is_empty())
                .json(&StartChat {
                    account_id,
                    attendees_ids: attendee_ids,
                    text,
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::describe::{pairs, query, Describe};
    use crate::http::HttpMethod;
    use serde_json::json;

    #[test]
    fn chats_by_attendee_path() {
        let call = Messages::new(&Describe).chats_by_attendee("att_1", "acc_1", None, Some(10));
        assert_eq!(call.path(), "chat_attendees/att_1/chats");
        assert_eq!(query(&call), pairs(&[("account_id", "acc_1"), ("limit", "10")]));
    }

    #[test]
    fn messages_without_sender_filter() {
        let call = Messages::new(&Describe).messages("chat_1", None, None, None);
        assert_eq!(call.method(), HttpMethod::Get);
        assert_eq!(call.path(), "chats/chat_1/messages");
        assert!(query(&call).is_empty());
    }

    #[test]
    fn send_message_posts_to_chat() {
        let call = Messages::new(&Describe).send_message("chat_1", "acc_1", "hello");
        assert_eq!(call.method(), HttpMethod::Post);
        assert_eq!(call.path(), "chats/chat_1/messages");
        assert_eq!(call.body(), Some(&json!({"account_id": "acc_1", "text": "hello"})));
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let messages = Messages::new(&Describe);
        assert_eq!(
            messages.chat_attendees("", None, None).missing_parameter(),
            Some("account_id")
        );
        assert_eq!(
            messages.chats_by_attendee("", "acc_1", None, None).missing_parameter(),
            Some("attendee_id")
        );
        assert_eq!(
            messages.messages("", None, None, None).missing_parameter(),
            Some("chat_id")
        );
        assert_eq!(
            messages.send_message("chat_1", "", "hi").missing_parameter(),
            Some("account_id")
        );
        assert_eq!(
            messages.start_chat(&[], "acc_1", "hi").missing_parameter(),
            Some("attendees_ids")
        );
        assert_eq!(
            messages.send_message("chat_1", "acc_1", "hi").missing_parameter(),
            None
        );
    }

    #[test]
    fn start_chat_lists_attendees() {
        let call = Messages::new(&Describe).start_chat(&["p1", "p2"], "acc_1", "hi");
        assert_eq!(call.path(), "chats");
        assert_eq!(
            call.body(),
            Some(&json!({"account_id": "acc_1", "attendees_ids": ["p1", "p2"], "text": "hi"}))
        );
    }
}
