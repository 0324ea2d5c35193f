//! Main chat event loop.
//!
//! The loop owns the [`App`] state outright. Network calls run on spawned
//! tasks that never touch state; each sends one [`NetEvent`] back over the
//! channel and the loop applies it in a single synchronous continuation.
//! In-flight requests are never cancelled — a superseded completion still
//! applies when it arrives.

use crate::api::ChatServerClient;
use crate::commands::{process_input, CommandResult};
use crate::core::app::{App, AuthKind, Effect, Focus, NetEvent, SidebarContent};
use crate::ui::layout::{conversation_row_at, is_backdrop_click, modal_area, notice_at};
use crate::ui::modal::ModalKind;
use crate::ui::renderer::{layout_for, transcript_max_scroll, ui};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, layout::Size, Terminal};
use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

type NetSender = mpsc::UnboundedSender<NetEvent>;

pub async fn run_chat(mut app: App, client: ChatServerClient) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (net_tx, mut net_rx) = mpsc::unbounded_channel::<NetEvent>();

    // Initial load: the session answer gates everything else.
    run_effect(&client, &net_tx, Effect::CheckSession);

    let result = event_loop(&mut terminal, &mut app, &client, &net_tx, &mut net_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ChatServerClient,
    net_tx: &NetSender,
    net_rx: &mut mpsc::UnboundedReceiver<NetEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            let size = terminal.size()?;
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(app, client, net_tx, key, size);
                }
                Event::Mouse(mouse) => handle_mouse_event(app, client, net_tx, mouse, size),
                _ => {}
            }
        }

        while let Ok(net_event) = net_rx.try_recv() {
            for effect in app.handle_net_event(net_event) {
                run_effect(client, net_tx, effect);
            }
        }

        app.notices.expire(Instant::now());

        if app.exit_requested {
            return Ok(());
        }
    }
}

/// Spawn the HTTP call an effect stands for. The task owns its own client
/// clone and reports back through the channel; errors cross the channel as
/// strings.
fn run_effect(client: &ChatServerClient, net_tx: &NetSender, effect: Effect) {
    let client = client.clone();
    let net_tx = net_tx.clone();
    tokio::spawn(async move {
        let net_event = match effect {
            Effect::CheckSession => NetEvent::SessionChecked(
                client.check_session().await.map_err(|e| e.to_string()),
            ),
            Effect::LoadConversations => NetEvent::ConversationsLoaded(
                client.conversations().await.map_err(|e| e.to_string()),
            ),
            Effect::LoadMessages { conversation_id } => NetEvent::MessagesLoaded {
                conversation_id,
                result: client
                    .messages(conversation_id)
                    .await
                    .map_err(|e| e.to_string()),
            },
            Effect::SendChat {
                text,
                conversation_id,
            } => NetEvent::ChatCompleted(
                client
                    .send_chat(&text, conversation_id)
                    .await
                    .map_err(|e| e.to_string()),
            ),
            Effect::Login { email, password } => NetEvent::AuthFinished {
                kind: AuthKind::Login,
                result: client
                    .login(&email, &password)
                    .await
                    .map_err(|e| e.to_string()),
            },
            Effect::Signup {
                username,
                email,
                password,
            } => NetEvent::AuthFinished {
                kind: AuthKind::Signup,
                result: client
                    .signup(&username, &email, &password)
                    .await
                    .map_err(|e| e.to_string()),
            },
            Effect::Logout => {
                NetEvent::LoggedOut(client.logout().await.map_err(|e| e.to_string()))
            }
        };
        let _ = net_tx.send(net_event);
    });
}

fn handle_key_event(
    app: &mut App,
    client: &ChatServerClient,
    net_tx: &NetSender,
    key: KeyEvent,
    size: Size,
) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.exit_requested = true;
        return;
    }

    if app.modals.any_open() {
        handle_modal_key(app, client, net_tx, key);
        return;
    }

    match key.code {
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.start_new_chat();
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Composer if app.sidebar_content == SidebarContent::Listing => {
                    Focus::Sidebar
                }
                Focus::Composer => Focus::Composer,
                Focus::Sidebar => Focus::Composer,
            };
        }
        KeyCode::Esc => {
            if let Some(id) = app.notices.iter().last().map(|n| n.id) {
                app.notices.dismiss(id);
            }
        }
        KeyCode::PageUp => scroll_transcript(app, -5, size),
        KeyCode::PageDown => scroll_transcript(app, 5, size),
        _ => match app.focus {
            Focus::Sidebar => match key.code {
                KeyCode::Up => app.sidebar_move_up(),
                KeyCode::Down => app.sidebar_move_down(),
                KeyCode::Enter => {
                    if let Some(effect) = app.open_conversation(app.sidebar_cursor) {
                        run_effect(client, net_tx, effect);
                    }
                }
                _ => {}
            },
            Focus::Composer => match key.code {
                KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                    app.composer.insert_newline();
                }
                KeyCode::Enter => submit_composer(app, client, net_tx),
                _ => {
                    app.composer.input(tui_textarea::Input::from(key));
                }
            },
        },
    }
}

fn submit_composer(app: &mut App, client: &ChatServerClient, net_tx: &NetSender) {
    let text = app.composer_text();
    match process_input(app, &text) {
        CommandResult::Continue => app.reset_composer(),
        CommandResult::Effect(effect) => {
            app.reset_composer();
            run_effect(client, net_tx, effect);
        }
        CommandResult::ProcessAsMessage(_) => {
            if let Some(effect) = app.begin_send() {
                run_effect(client, net_tx, effect);
            }
        }
    }
}

fn handle_modal_key(
    app: &mut App,
    client: &ChatServerClient,
    net_tx: &NetSender,
    key: KeyEvent,
) {
    let Some(kind) = app.modals.topmost() else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.modals.hide(kind),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            if let Some(form) = app.modals.active_form_mut() {
                form.focus_prev();
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.modals.active_form_mut() {
                form.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.modals.active_form_mut() {
                form.focus_prev();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.modals.active_form_mut() {
                form.backspace();
            }
        }
        KeyCode::Enter => match kind {
            ModalKind::Login => {
                let (email, password) = app.modals.login_values();
                if email.is_empty() || password.is_empty() {
                    app.notices.error("Email and password are required.");
                } else {
                    run_effect(client, net_tx, Effect::Login { email, password });
                }
            }
            ModalKind::Signup => {
                let (username, email, password) = app.modals.signup_values();
                if username.is_empty() || email.is_empty() || password.is_empty() {
                    app.notices.error("All fields are required.");
                } else {
                    run_effect(
                        client,
                        net_tx,
                        Effect::Signup {
                            username,
                            email,
                            password,
                        },
                    );
                }
            }
            // The static dialogs close on any confirm.
            _ => app.modals.hide(kind),
        },
        KeyCode::Char(c) => {
            if let Some(form) = app.modals.active_form_mut() {
                form.insert_char(c);
            }
        }
        _ => {}
    }
}

fn handle_mouse_event(
    app: &mut App,
    client: &ChatServerClient,
    net_tx: &NetSender,
    mouse: MouseEvent,
    size: Size,
) {
    match mouse.kind {
        MouseEventKind::ScrollUp => scroll_transcript(app, -3, size),
        MouseEventKind::ScrollDown => scroll_transcript(app, 3, size),
        MouseEventKind::Down(MouseButton::Left) => {
            let area = Rect::new(0, 0, size.width, size.height);
            let (column, row) = (mouse.column, mouse.row);

            if let Some(kind) = app.modals.topmost() {
                let content = modal_area(kind, area);
                if is_backdrop_click(content, area, column, row) {
                    app.modals.hide(kind);
                }
                return;
            }

            let layout = layout_for(app, area);
            if let Some(index) = notice_at(layout.chat, app.notices.len(), column, row) {
                let id = app.notices.iter().nth(index).map(|n| n.id);
                if let Some(id) = id {
                    app.notices.dismiss(id);
                }
                return;
            }
            if app.sidebar_content == SidebarContent::Listing {
                if let Some(index) =
                    conversation_row_at(&layout, app.conversations.len(), column, row)
                {
                    app.focus = Focus::Sidebar;
                    if let Some(effect) = app.open_conversation(index) {
                        run_effect(client, net_tx, effect);
                    }
                }
            }
        }
        _ => {}
    }
}

fn scroll_transcript(app: &mut App, delta: i32, size: Size) {
    let area = Rect::new(0, 0, size.width, size.height);
    let layout = layout_for(app, area);
    let max = transcript_max_scroll(app, layout.chat);
    if delta < 0 {
        app.auto_scroll = false;
        app.scroll_offset = app.scroll_offset.saturating_sub((-delta) as u16);
    } else {
        app.scroll_offset = app.scroll_offset.saturating_add(delta as u16).min(max);
        if app.scroll_offset >= max {
            app.auto_scroll = true;
        }
    }
}
