//! Runtime state and the pure transitions driven by UI and network events.
//!
//! Network completions arrive as [`NetEvent`]s; applying one returns the
//! [`Effect`]s the event loop should run next (spawned HTTP calls). All
//! mutation happens on the loop thread, one event at a time.

use crate::api::payloads::{AuthResponse, ChatReply, Conversation, SessionStatus, WireMessage};
use crate::api::ConversationsOutcome;
use crate::core::message::{Message, Role};
use crate::core::session::Session;
use crate::ui::modal::{ModalController, ModalKind};
use crate::ui::notice::Notices;
use crate::ui::theme::Theme;
use std::time::Instant;
use tui_textarea::TextArea;

pub const APP_TITLE: &str = "Spice AI";

const LOAD_MESSAGES_FAILED: &str = "Sorry, I couldn't load this conversation.";
const SEND_FAILED: &str = "Désolé, une erreur est survenue.";
const NETWORK_ERROR_NOTICE: &str = "A network error occurred. Please try again.";
const LOGIN_FAILED_NOTICE: &str = "Login failed. Please check your credentials.";
const SIGNUP_FAILED_NOTICE: &str = "Signup failed. Please try again.";
const LOGIN_OK_NOTICE: &str = "Logged in successfully.";
const SIGNUP_OK_NOTICE: &str = "Account created and logged in!";
const LOGGED_OUT_NOTICE: &str = "You have been logged out.";

/// What the sidebar shows instead of (or as) the conversation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarContent {
    /// "Please log in to see your chat history."
    LoggedOut,
    /// "No chat history yet."
    Empty,
    /// "Could not load history."
    LoadError,
    Listing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Composer,
    Sidebar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Signup,
}

/// Follow-up work an event handler asks the loop to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckSession,
    LoadConversations,
    LoadMessages { conversation_id: i64 },
    SendChat {
        text: String,
        conversation_id: Option<i64>,
    },
    Login { email: String, password: String },
    Signup {
        username: String,
        email: String,
        password: String,
    },
    Logout,
}

/// One completed network call, shipped to the loop over the event channel.
#[derive(Debug)]
pub enum NetEvent {
    SessionChecked(Result<SessionStatus, String>),
    AuthFinished {
        kind: AuthKind,
        result: Result<AuthResponse, String>,
    },
    LoggedOut(Result<(), String>),
    ConversationsLoaded(Result<ConversationsOutcome, String>),
    MessagesLoaded {
        conversation_id: i64,
        result: Result<Vec<WireMessage>, String>,
    },
    ChatCompleted(Result<ChatReply, String>),
}

pub struct App {
    pub session: Session,
    pub conversations: Vec<Conversation>,
    pub sidebar_content: SidebarContent,
    pub sidebar_cursor: usize,
    /// Index of the exclusively-marked sidebar entry, if any.
    pub selected_conversation: Option<usize>,
    pub messages: Vec<Message>,
    pub header_title: String,
    pub show_welcome: bool,
    pub composer: TextArea<'static>,
    pub awaiting_reply: bool,
    pub pulse_start: Instant,
    pub modals: ModalController,
    pub notices: Notices,
    pub focus: Focus,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub theme: Theme,
    pub syntax_enabled: bool,
    pub exit_requested: bool,
}

impl App {
    pub fn new(theme: Theme, syntax_enabled: bool) -> Self {
        let mut app = Self {
            session: Session::default(),
            conversations: Vec::new(),
            sidebar_content: SidebarContent::LoggedOut,
            sidebar_cursor: 0,
            selected_conversation: None,
            messages: Vec::new(),
            header_title: APP_TITLE.to_string(),
            show_welcome: true,
            composer: TextArea::default(),
            awaiting_reply: false,
            pulse_start: Instant::now(),
            modals: ModalController::default(),
            notices: Notices::default(),
            focus: Focus::Composer,
            scroll_offset: 0,
            auto_scroll: true,
            theme,
            syntax_enabled,
            exit_requested: false,
        };
        app.reset_composer();
        app
    }

    pub fn composer_text(&self) -> String {
        self.composer.lines().join("\n")
    }

    pub fn reset_composer(&mut self) {
        let mut composer = TextArea::default();
        composer.set_cursor_line_style(ratatui::style::Style::default());
        self.composer = composer;
    }

    fn show_welcome_screen(&mut self) {
        self.messages.clear();
        self.show_welcome = true;
        self.header_title = APP_TITLE.to_string();
        self.scroll_offset = 0;
        self.auto_scroll = true;
    }

    // --- Session Tracker ---

    pub fn apply_session_status(&mut self, status: SessionStatus) -> Vec<Effect> {
        self.session.apply_status(status);
        if self.session.logged_in {
            vec![Effect::LoadConversations]
        } else {
            self.conversations.clear();
            self.selected_conversation = None;
            self.sidebar_content = SidebarContent::LoggedOut;
            self.show_welcome_screen();
            Vec::new()
        }
    }

    fn handle_auth_result(
        &mut self,
        kind: AuthKind,
        result: Result<AuthResponse, String>,
    ) -> Vec<Effect> {
        match result {
            Ok(response) if response.success => {
                let fallback = match kind {
                    AuthKind::Login => LOGIN_OK_NOTICE,
                    AuthKind::Signup => SIGNUP_OK_NOTICE,
                };
                self.notices
                    .success(response.message.unwrap_or_else(|| fallback.to_string()));
                match kind {
                    AuthKind::Login => {
                        self.modals.hide(ModalKind::Login);
                        self.modals.login_form.reset();
                    }
                    AuthKind::Signup => {
                        self.modals.hide(ModalKind::Signup);
                        self.modals.signup_form.reset();
                    }
                }
                vec![Effect::CheckSession]
            }
            Ok(response) => {
                let fallback = match kind {
                    AuthKind::Login => LOGIN_FAILED_NOTICE,
                    AuthKind::Signup => SIGNUP_FAILED_NOTICE,
                };
                self.notices
                    .error(response.message.unwrap_or_else(|| fallback.to_string()));
                Vec::new()
            }
            Err(error) => {
                tracing::error!(%error, "auth request failed");
                self.notices.error(NETWORK_ERROR_NOTICE);
                Vec::new()
            }
        }
    }

    fn handle_logged_out(&mut self, result: Result<(), String>) -> Vec<Effect> {
        if let Err(error) = result {
            tracing::error!(%error, "logout request failed");
        }
        self.session.active_conversation = None;
        self.notices.success(LOGGED_OUT_NOTICE);
        vec![Effect::CheckSession]
    }

    // --- Conversation Loader ---

    pub fn apply_conversations(&mut self, outcome: ConversationsOutcome) {
        // Rebuilding the list always drops the selection mark, like the
        // rebuilt entry widgets it stands for.
        self.selected_conversation = None;
        match outcome {
            ConversationsOutcome::Unauthorized => {
                self.conversations.clear();
                self.sidebar_content = SidebarContent::LoggedOut;
            }
            ConversationsOutcome::Listing(listing) => {
                self.sidebar_content = if listing.is_empty() {
                    SidebarContent::Empty
                } else {
                    SidebarContent::Listing
                };
                self.conversations = listing;
                if self.sidebar_cursor >= self.conversations.len() {
                    self.sidebar_cursor = self.conversations.len().saturating_sub(1);
                }
            }
        }
    }

    fn conversations_load_failed(&mut self, error: &str) {
        tracing::error!(%error, "loading conversations failed");
        self.conversations.clear();
        self.selected_conversation = None;
        self.sidebar_content = SidebarContent::LoadError;
    }

    pub fn sidebar_move_up(&mut self) {
        if self.conversations.is_empty() {
            return;
        }
        if self.sidebar_cursor == 0 {
            self.sidebar_cursor = self.conversations.len() - 1;
        } else {
            self.sidebar_cursor -= 1;
        }
    }

    pub fn sidebar_move_down(&mut self) {
        if self.conversations.is_empty() {
            return;
        }
        self.sidebar_cursor = (self.sidebar_cursor + 1) % self.conversations.len();
    }

    // --- Message Pipeline ---

    /// Select a sidebar entry and start loading its transcript. The pointer
    /// and header update immediately; the fetch completes later.
    pub fn open_conversation(&mut self, index: usize) -> Option<Effect> {
        let conversation = self.conversations.get(index)?;
        let id = conversation.id;
        self.header_title = conversation.title.clone();
        self.selected_conversation = Some(index);
        self.sidebar_cursor = index;
        self.session.active_conversation = Some(id);
        self.messages.clear();
        self.show_welcome = false;
        self.scroll_offset = 0;
        self.auto_scroll = true;
        Some(Effect::LoadMessages {
            conversation_id: id,
        })
    }

    fn apply_loaded_messages(&mut self, result: Result<Vec<WireMessage>, String>) {
        match result {
            Ok(listing) => {
                for wire in listing {
                    self.messages
                        .push(Message::new(Role::from_wire(&wire.role), wire.content));
                }
            }
            Err(error) => {
                tracing::error!(%error, "loading messages failed");
                self.messages.push(Message::assistant(LOAD_MESSAGES_FAILED));
            }
        }
        self.auto_scroll = true;
    }

    /// Local reset to an unsaved conversation. No network call; idempotent.
    pub fn start_new_chat(&mut self) {
        self.session.active_conversation = None;
        self.selected_conversation = None;
        self.show_welcome_screen();
        self.reset_composer();
        self.focus = Focus::Composer;
    }

    /// The send flow up to the network call. Returns the effect to run, or
    /// `None` when the send was aborted (logged out, or empty input).
    pub fn begin_send(&mut self) -> Option<Effect> {
        if !self.session.logged_in {
            self.modals.show(ModalKind::Login);
            return None;
        }
        let text = self.composer_text();
        let message = text.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();
        if self.session.active_conversation.is_none() {
            // New-conversation framing: drop the welcome screen (or any
            // stale transcript) before the optimistic echo.
            self.messages.clear();
        }
        self.show_welcome = false;
        self.messages.push(Message::user(message.clone()));
        self.reset_composer();
        self.awaiting_reply = true;
        self.pulse_start = Instant::now();
        self.auto_scroll = true;
        Some(Effect::SendChat {
            text: message,
            conversation_id: self.session.active_conversation,
        })
    }

    fn apply_chat_outcome(&mut self, result: Result<ChatReply, String>) -> Vec<Effect> {
        let mut effects = Vec::new();
        match result {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply.reply));
                // An error-flagged reply is surfaced as a normal assistant
                // message and nothing else changes.
                if !reply.error && self.session.active_conversation.is_none() {
                    if let Some(id) = reply.conversation_id {
                        self.session.adopt_conversation(id);
                        effects.push(Effect::LoadConversations);
                    }
                }
            }
            Err(error) => {
                tracing::error!(%error, "sending message failed");
                self.messages.push(Message::assistant(SEND_FAILED));
            }
        }
        // Hidden unconditionally, success or failure.
        self.awaiting_reply = false;
        self.auto_scroll = true;
        effects
    }

    // --- Event dispatch ---

    pub fn handle_net_event(&mut self, event: NetEvent) -> Vec<Effect> {
        match event {
            NetEvent::SessionChecked(Ok(status)) => self.apply_session_status(status),
            NetEvent::SessionChecked(Err(error)) => {
                // Stale-but-safe: keep whatever the UI showed before.
                tracing::error!(%error, "session check failed");
                Vec::new()
            }
            NetEvent::AuthFinished { kind, result } => self.handle_auth_result(kind, result),
            NetEvent::LoggedOut(result) => self.handle_logged_out(result),
            NetEvent::ConversationsLoaded(Ok(outcome)) => {
                self.apply_conversations(outcome);
                Vec::new()
            }
            NetEvent::ConversationsLoaded(Err(error)) => {
                self.conversations_load_failed(&error);
                Vec::new()
            }
            NetEvent::MessagesLoaded { result, .. } => {
                // Applied even when a newer view superseded the request; a
                // late arrival can overwrite, exactly like the original.
                self.apply_loaded_messages(result);
                Vec::new()
            }
            NetEvent::ChatCompleted(result) => self.apply_chat_outcome(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in_app() -> App {
        let mut app = App::new(Theme::dark_default(), false);
        app.handle_net_event(NetEvent::SessionChecked(Ok(SessionStatus {
            logged_in: true,
            username: Some("ada".into()),
        })));
        app
    }

    fn listing(titles: &[(i64, &str)]) -> ConversationsOutcome {
        ConversationsOutcome::Listing(
            titles
                .iter()
                .map(|(id, title)| Conversation {
                    id: *id,
                    title: (*title).to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn session_check_gates_the_conversation_loader() {
        let mut app = App::new(Theme::dark_default(), false);
        let effects = app.handle_net_event(NetEvent::SessionChecked(Ok(SessionStatus {
            logged_in: true,
            username: None,
        })));
        assert_eq!(effects, vec![Effect::LoadConversations]);

        let effects = app.handle_net_event(NetEvent::SessionChecked(Ok(SessionStatus {
            logged_in: false,
            username: None,
        })));
        assert!(effects.is_empty());
        assert_eq!(app.sidebar_content, SidebarContent::LoggedOut);
        assert!(app.show_welcome);
    }

    #[test]
    fn session_check_failure_leaves_state_unchanged() {
        let mut app = logged_in_app();
        app.apply_conversations(listing(&[(1, "first")]));
        let effects = app.handle_net_event(NetEvent::SessionChecked(Err("offline".into())));
        assert!(effects.is_empty());
        assert!(app.session.logged_in);
        assert_eq!(app.sidebar_content, SidebarContent::Listing);
        assert_eq!(app.conversations.len(), 1);
    }

    #[test]
    fn empty_listing_shows_the_no_history_placeholder() {
        let mut app = logged_in_app();
        app.apply_conversations(ConversationsOutcome::Listing(Vec::new()));
        assert_eq!(app.sidebar_content, SidebarContent::Empty);
    }

    #[test]
    fn selecting_marks_exactly_one_entry() {
        let mut app = logged_in_app();
        app.apply_conversations(listing(&[(1, "first"), (2, "second")]));
        app.open_conversation(0);
        assert_eq!(app.selected_conversation, Some(0));
        app.open_conversation(1);
        assert_eq!(app.selected_conversation, Some(1));
        assert_eq!(app.session.active_conversation, Some(2));
        assert_eq!(app.header_title, "second");
    }

    #[test]
    fn reloading_the_listing_drops_the_selection_mark() {
        let mut app = logged_in_app();
        app.apply_conversations(listing(&[(1, "first")]));
        app.open_conversation(0);
        app.apply_conversations(listing(&[(1, "first"), (2, "second")]));
        assert_eq!(app.selected_conversation, None);
    }

    #[test]
    fn failed_message_load_appends_synthetic_reply_and_keeps_pointer() {
        let mut app = logged_in_app();
        app.apply_conversations(listing(&[(5, "maths")]));
        app.open_conversation(0);
        app.handle_net_event(NetEvent::MessagesLoaded {
            conversation_id: 5,
            result: Err("boom".into()),
        });
        assert_eq!(app.session.active_conversation, Some(5));
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].role, Role::Assistant);
        assert_eq!(app.messages[0].content, LOAD_MESSAGES_FAILED);
    }

    #[test]
    fn start_new_chat_is_idempotent() {
        let mut app = logged_in_app();
        app.apply_conversations(listing(&[(1, "first")]));
        app.open_conversation(0);
        app.composer.insert_str("draft");

        app.start_new_chat();
        let once = (
            app.session.active_conversation,
            app.selected_conversation,
            app.show_welcome,
            app.messages.len(),
            app.composer_text(),
            app.header_title.clone(),
        );
        app.start_new_chat();
        let twice = (
            app.session.active_conversation,
            app.selected_conversation,
            app.show_welcome,
            app.messages.len(),
            app.composer_text(),
            app.header_title.clone(),
        );
        assert_eq!(once, twice);
        assert_eq!(once.0, None);
        assert_eq!(once.4, "");
    }

    #[test]
    fn send_while_logged_out_opens_the_login_dialog() {
        let mut app = App::new(Theme::dark_default(), false);
        app.composer.insert_str("hello");
        assert_eq!(app.begin_send(), None);
        assert!(app.modals.login_open);
        // The draft stays in the composer.
        assert_eq!(app.composer_text(), "hello");
    }

    #[test]
    fn empty_input_aborts_silently() {
        let mut app = logged_in_app();
        app.composer.insert_str("   ");
        assert_eq!(app.begin_send(), None);
        assert!(!app.awaiting_reply);
    }

    #[test]
    fn send_in_fresh_conversation_clears_the_display_first() {
        let mut app = logged_in_app();
        app.messages.push(Message::assistant("stale"));
        app.composer.insert_str("  hi there  ");
        let effect = app.begin_send().expect("send should start");
        assert_eq!(
            effect,
            Effect::SendChat {
                text: "hi there".into(),
                conversation_id: None,
            }
        );
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].content, "hi there");
        assert!(app.awaiting_reply);
        assert_eq!(app.composer_text(), "");
    }

    #[test]
    fn first_reply_adopts_the_server_id_exactly_once() {
        let mut app = logged_in_app();
        app.composer.insert_str("hi");
        app.begin_send();
        let effects = app.handle_net_event(NetEvent::ChatCompleted(Ok(ChatReply {
            reply: "hello!".into(),
            conversation_id: Some(9),
            error: false,
        })));
        assert_eq!(effects, vec![Effect::LoadConversations]);
        assert_eq!(app.session.active_conversation, Some(9));
        assert!(!app.awaiting_reply);

        // A later reply must not move the pointer.
        let effects = app.handle_net_event(NetEvent::ChatCompleted(Ok(ChatReply {
            reply: "again".into(),
            conversation_id: Some(10),
            error: false,
        })));
        assert!(effects.is_empty());
        assert_eq!(app.session.active_conversation, Some(9));
    }

    #[test]
    fn error_flagged_reply_is_rendered_and_pointer_unchanged() {
        let mut app = logged_in_app();
        app.composer.insert_str("hi");
        app.begin_send();
        let effects = app.handle_net_event(NetEvent::ChatCompleted(Ok(ChatReply {
            reply: "rate limited".into(),
            conversation_id: Some(3),
            error: true,
        })));
        assert!(effects.is_empty());
        assert_eq!(app.session.active_conversation, None);
        let last = app.messages.last().expect("reply appended");
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "rate limited");
        assert!(!app.awaiting_reply);
    }

    #[test]
    fn transport_failure_appends_the_localized_message() {
        let mut app = logged_in_app();
        app.composer.insert_str("hi");
        app.begin_send();
        app.handle_net_event(NetEvent::ChatCompleted(Err("connection reset".into())));
        assert_eq!(app.messages.last().map(|m| m.content.as_str()), Some(SEND_FAILED));
        assert!(!app.awaiting_reply);
    }

    #[test]
    fn logging_out_clears_pointer_and_shows_placeholder() {
        let mut app = logged_in_app();
        app.apply_conversations(listing(&[(4, "notes")]));
        app.open_conversation(0);

        let effects = app.handle_net_event(NetEvent::LoggedOut(Ok(())));
        assert_eq!(effects, vec![Effect::CheckSession]);
        assert_eq!(app.session.active_conversation, None);

        app.handle_net_event(NetEvent::SessionChecked(Ok(SessionStatus {
            logged_in: false,
            username: None,
        })));
        assert_eq!(app.sidebar_content, SidebarContent::LoggedOut);
        assert!(app.show_welcome);
    }

    #[test]
    fn successful_login_hides_the_dialog_and_rechecks_the_session() {
        let mut app = App::new(Theme::dark_default(), false);
        app.modals.show(ModalKind::Login);
        let effects = app.handle_net_event(NetEvent::AuthFinished {
            kind: AuthKind::Login,
            result: Ok(AuthResponse {
                success: true,
                message: Some("Logged in successfully.".into()),
            }),
        });
        assert_eq!(effects, vec![Effect::CheckSession]);
        assert!(!app.modals.login_open);
        assert_eq!(app.notices.len(), 1);
    }

    #[test]
    fn failed_signup_surfaces_the_server_message() {
        let mut app = App::new(Theme::dark_default(), false);
        app.modals.show(ModalKind::Signup);
        let effects = app.handle_net_event(NetEvent::AuthFinished {
            kind: AuthKind::Signup,
            result: Ok(AuthResponse {
                success: false,
                message: Some("Username or email already exists.".into()),
            }),
        });
        assert!(effects.is_empty());
        assert!(app.modals.signup_open);
        assert_eq!(
            app.notices.iter().next().map(|n| n.message.as_str()),
            Some("Username or email already exists.")
        );
    }

    #[test]
    fn late_message_load_still_applies() {
        let mut app = logged_in_app();
        app.apply_conversations(listing(&[(1, "a"), (2, "b")]));
        app.open_conversation(0);
        app.open_conversation(1);
        // The older fetch completes after the newer view took over.
        app.handle_net_event(NetEvent::MessagesLoaded {
            conversation_id: 1,
            result: Ok(vec![WireMessage {
                role: "assistant".into(),
                content: "old".into(),
            }]),
        });
        assert_eq!(app.messages.len(), 1);
        assert_eq!(app.messages[0].content, "old");
    }
}
