use serde::{Deserialize, Serialize};

/// `/check_session` answer. `username` is only present while logged in.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStatus {
    pub logged_in: bool,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Serialize)]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `/signup` and `/login` both answer `{success, message}`, also on non-2xx
/// statuses (400/401/409 carry the human-readable reason).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub title: String,
}

/// One transcript entry as served by `/get_messages/{id}`. The role stays a
/// raw string here; normalization happens in [`crate::core::message::Role`].
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub conversation_id: Option<i64>,
}

/// `/chat` answer. `conversation_id` is echoed for a freshly created
/// conversation; `error` flags a reply that is itself an error message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub conversation_id: Option<i64>,
    #[serde(default)]
    pub error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_status_tolerates_missing_username() {
        let status: SessionStatus = serde_json::from_str(r#"{"logged_in": false}"#)
            .expect("logged-out payload should parse");
        assert!(!status.logged_in);
        assert_eq!(status.username, None);
    }

    #[test]
    fn chat_reply_defaults_optional_fields() {
        let reply: ChatReply = serde_json::from_str(r#"{"reply": "hello"}"#)
            .expect("minimal reply should parse");
        assert_eq!(reply.reply, "hello");
        assert_eq!(reply.conversation_id, None);
        assert!(!reply.error);
    }

    #[test]
    fn chat_reply_parses_error_channel() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"reply": "rate limited", "error": true}"#)
                .expect("error reply should parse");
        assert!(reply.error);
        assert_eq!(reply.reply, "rate limited");
    }

    #[test]
    fn auth_response_tolerates_bare_success() {
        let resp: AuthResponse = serde_json::from_str(r#"{"success": true}"#)
            .expect("bare success should parse");
        assert!(resp.success);
        assert_eq!(resp.message, None);
    }
}
