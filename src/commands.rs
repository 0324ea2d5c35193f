//! Slash commands typed into the composer.

use crate::core::app::{App, Effect};
use crate::ui::modal::ModalKind;

pub enum CommandResult {
    /// Handled locally; nothing further to do.
    Continue,
    /// Handled; the loop should run this effect.
    Effect(Effect),
    /// Not a command; send as a regular chat message.
    ProcessAsMessage(String),
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let command = trimmed.split_whitespace().next().unwrap_or(trimmed);
    match command {
        "/new" => {
            app.start_new_chat();
            CommandResult::Continue
        }
        "/login" => {
            app.modals.show(ModalKind::Login);
            CommandResult::Continue
        }
        "/signup" => {
            app.modals.show(ModalKind::Signup);
            CommandResult::Continue
        }
        "/profile" => {
            app.modals.show(ModalKind::Profile);
            CommandResult::Continue
        }
        "/subscribe" => {
            app.modals.show(ModalKind::Subscription);
            CommandResult::Continue
        }
        "/about" | "/help" => {
            app.modals.show(ModalKind::About);
            CommandResult::Continue
        }
        "/logout" => CommandResult::Effect(Effect::Logout),
        "/quit" | "/exit" => {
            app.exit_requested = true;
            CommandResult::Continue
        }
        _ => {
            app.notices
                .error(format!("Unknown command: {command} (try /help)"));
            CommandResult::Continue
        }
    }
}
