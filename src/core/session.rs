use crate::api::payloads::SessionStatus;

/// Server-derived authentication state plus the active-conversation pointer.
///
/// The login flag is never cached beyond the latest `/check_session` answer;
/// it is re-derived after every auth action. A `None` pointer means an
/// unsaved conversation that does not exist server-side yet; the pointer is
/// adopted from the server exactly once after the first exchange.
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub logged_in: bool,
    pub username: Option<String>,
    pub active_conversation: Option<i64>,
}

impl Session {
    pub fn apply_status(&mut self, status: SessionStatus) {
        self.logged_in = status.logged_in;
        self.username = if status.logged_in {
            status.username
        } else {
            None
        };
    }

    /// Adopt a server-assigned conversation id after the first exchange.
    /// Returns false (and changes nothing) when a conversation is already
    /// active.
    pub fn adopt_conversation(&mut self, id: i64) -> bool {
        if self.active_conversation.is_some() {
            return false;
        }
        self.active_conversation = Some(id);
        true
    }
}
