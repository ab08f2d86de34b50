//! Documented error codes, keyed by HTTP status.
//!
//! The remote namespaces codes as `errors/<name>`; the table stores bare
//! names and [`normalize`] strips the namespace before lookup. A code is
//! only recognized under the status it is documented for.

const BAD_REQUEST: &[&str] = &[
    "invalid_parameters",
    "malformed_request",
    "content_too_large",
    "invalid_url",
    "too_many_characters",
    "unescaped_characters",
    "missing_parameters",
];

const UNAUTHORIZED: &[&str] = &[
    "missing_credentials",
    "multiple_sessions",
    "invalid_checkpoint_solution",
    "checkpoint_error",
    "invalid_credentials",
    "expired_credentials",
    "insufficient_privileges",
    "disconnected_account",
    "disconnected_feature",
    "invalid_credentials_but_valid_account_imap",
    "expired_link",
    "wrong_account",
];

const PAYMENT_REQUIRED: &[&str] = &["subscription_required"];

const FORBIDDEN: &[&str] = &[
    "account_restricted",
    "account_mismatch",
    "unknown_authentication_context",
    "session_mismatch",
    "feature_not_subscribed",
    "subscription_required",
    "resource_access_restricted",
    "action_required",
    "insufficient_permissions",
];

const NOT_FOUND: &[&str] = &["resource_not_found", "invalid_resource_identifier"];

const UNSUPPORTED_MEDIA_TYPE: &[&str] = &["unsupported_media_type"];

const UNPROCESSABLE_ENTITY: &[&str] = &[
    "invalid_account",
    "invalid_recipient",
    "no_connection_with_recipient",
    "blocked_recipient",
    "user_unreachable",
    "unprocessable_entity",
    "action_already_performed",
    "invalid_message",
    "invalid_post",
    "not_allowed_inmail",
    "insufficient_credits",
    "cannot_resend_yet",
    "cannot_resend_within_24hrs",
    "limit_exceeded",
    "already_invited_recently",
    "cannot_invite_attendee",
    "parent_mail_not_found",
    "invalid_reply_subject",
    "invalid_headers",
    "send_as_denied",
    "invalid_folder",
    "invalid_thread",
    "limit_too_high",
    "unauthorized",
    "sender_rejected",
    "recipient_rejected",
    "ip_rejected_by_server",
    "provider_unreachable",
    "account_configuration_error",
];

const TOO_MANY_REQUESTS: &[&str] = &["too_many_requests"];

const INTERNAL_SERVER_ERROR: &[&str] = &[
    "unexpected_error",
    "provider_error",
    "authentication_intent_error",
];

const SERVICE_UNAVAILABLE: &[&str] = &[
    "no_client_session",
    "no_channel",
    "handler_missing",
    "network_down",
    "service_unavailable",
];

const GATEWAY_TIMEOUT: &[&str] = &["request_timeout"];

/// Codes documented for `status`. Empty for undocumented statuses.
pub fn known_codes(status: u16) -> &'static [&'static str] {
    match status {
        400 => BAD_REQUEST,
        401 => UNAUTHORIZED,
        402 => PAYMENT_REQUIRED,
        403 => FORBIDDEN,
        404 => NOT_FOUND,
        415 => UNSUPPORTED_MEDIA_TYPE,
        422 => UNPROCESSABLE_ENTITY,
        429 => TOO_MANY_REQUESTS,
        500 => INTERNAL_SERVER_ERROR,
        503 => SERVICE_UNAVAILABLE,
        504 => GATEWAY_TIMEOUT,
        _ => &[],
    }
}

/// Strip the `errors/` namespace the remote puts in front of codes.
pub fn normalize(code: &str) -> &str {
    code.strip_prefix("errors/").unwrap_or(code)
}

/// Whether `code` is documented for `status`.
pub fn is_known(status: u16, code: &str) -> bool {
    known_codes(status).contains(&normalize(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_documented_pairs() {
        assert!(is_known(404, "resource_not_found"));
        assert!(is_known(404, "invalid_resource_identifier"));
        assert!(is_known(500, "unexpected_error"));
        assert!(is_known(401, "errors/missing_credentials"));
    }

    #[test]
    fn code_under_other_status_is_not_recognized() {
        assert!(is_known(422, "limit_exceeded"));
        assert!(!is_known(400, "limit_exceeded"));
        assert!(!is_known(404, "unexpected_error"));
    }

    #[test]
    fn unknown_status_has_no_codes() {
        assert!(known_codes(418).is_empty());
        assert!(!is_known(418, "resource_not_found"));
    }

    #[test]
    fn normalize_only_strips_namespace() {
        assert_eq!(normalize("errors/no_channel"), "no_channel");
        assert_eq!(normalize("no_channel"), "no_channel");
        assert_eq!(normalize("other/no_channel"), "other/no_channel");
    }
}
