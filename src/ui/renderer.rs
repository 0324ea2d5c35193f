use crate::core::app::{App, Focus, SidebarContent};
use crate::core::message::Role;
use crate::core::segment::{segment_text, Segment};
use crate::ui::layout::{
    composer_height, compute_layout, modal_area, notice_area, ScreenLayout,
};
use crate::ui::modal::{AuthForm, ModalKind, MODAL_ORDER};
use crate::ui::notice::NoticeKind;
use crate::utils::syntax::highlight_code_block;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

pub fn ui(f: &mut Frame, app: &mut App) {
    let theme = app.theme.clone();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background_color)),
        f.area(),
    );

    let layout = compute_layout(f.area(), composer_height(app.composer.lines().len()));

    render_sidebar(f, app, layout.sidebar);
    render_transcript(f, app, layout.chat);
    render_composer(f, app, layout.input);
    render_notices(f, app, layout.chat);
    render_modals(f, app);
}

/// Upper bound for the transcript scroll offset at the given chat rect.
/// Shared with the event loop so wheel scrolling clamps consistently.
pub fn transcript_max_scroll(app: &App, chat: Rect) -> u16 {
    let total = build_display_lines(app).len().min(u16::MAX as usize) as u16;
    let available = chat.height.saturating_sub(1);
    total.saturating_sub(available)
}

/// The event loop needs the same rects the renderer used; recompute them
/// from the current terminal size.
pub fn layout_for(app: &App, area: Rect) -> ScreenLayout {
    compute_layout(area, composer_height(app.composer.lines().len()))
}

fn render_transcript(f: &mut Frame, app: &mut App, chat: Rect) {
    let theme = &app.theme;
    let header = Line::from(Span::styled(app.header_title.clone(), theme.title_style));

    if app.show_welcome {
        let paragraph = Paragraph::new(welcome_lines(app))
            .block(Block::default().title(header))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, chat);
        return;
    }

    let lines = build_display_lines(app);
    let max_offset = transcript_max_scroll(app, chat);
    if app.auto_scroll {
        app.scroll_offset = max_offset;
    }
    let offset = app.scroll_offset.min(max_offset);

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(header))
        .wrap(Wrap { trim: true })
        .scroll((offset, 0));
    f.render_widget(paragraph, chat);
}

pub fn build_display_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut lines = Vec::new();

    for msg in &app.messages {
        let (text_style, prefix) = match msg.role {
            Role::User => (
                theme.user_text_style,
                Some(Span::styled("You: ", theme.user_prefix_style)),
            ),
            Role::Assistant => (theme.assistant_text_style, None),
        };
        let mut first = true;
        for segment in segment_text(&msg.content) {
            match segment {
                Segment::Plain(text) => {
                    for content_line in text.split('\n') {
                        let mut spans = Vec::new();
                        if first {
                            if let Some(prefix) = prefix.clone() {
                                spans.push(prefix);
                            }
                            first = false;
                        }
                        spans.push(Span::styled(content_line.to_string(), text_style));
                        lines.push(Line::from(spans));
                    }
                }
                Segment::Code { language, content } => {
                    first = false;
                    let highlighted = if app.syntax_enabled {
                        highlight_code_block(&language, &content, theme)
                    } else {
                        None
                    };
                    match highlighted {
                        Some(code_lines) => lines.extend(code_lines),
                        None => {
                            let mut style = theme.codeblock_text_style;
                            if let Some(bg) = theme.codeblock_bg_color() {
                                style = style.bg(bg);
                            }
                            for code_line in content.split('\n') {
                                lines.push(Line::from(Span::styled(
                                    code_line.to_string(),
                                    style,
                                )));
                            }
                        }
                    }
                }
            }
        }
        lines.push(Line::from(""));
    }

    if app.awaiting_reply {
        lines.push(typing_indicator_line(app));
    }
    lines
}

fn typing_indicator_line(app: &App) -> Line<'static> {
    // Pulse over one second, like a breathing cursor.
    let elapsed = app.pulse_start.elapsed().as_millis() as f32 / 1000.0;
    let phase = (elapsed * 2.0) % 2.0;
    let intensity = if phase < 1.0 { phase } else { 2.0 - phase };
    let symbol = if intensity < 0.33 {
        "○"
    } else if intensity < 0.66 {
        "◐"
    } else {
        "●"
    };
    Line::from(Span::styled(
        format!("{symbol} thinking…"),
        app.theme.typing_indicator_style,
    ))
}

fn welcome_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let headline = theme
        .assistant_text_style
        .add_modifier(ratatui::style::Modifier::BOLD);
    vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("Welcome to Spice AI 🌶️", headline)),
        Line::from(""),
        Line::from(Span::styled(
            "Your intelligent partner for coding and more.",
            theme.system_text_style,
        )),
        Line::from(Span::styled(
            "What can I help you with today?",
            theme.system_text_style,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Code Generation — functions, classes, or entire scripts",
            theme.system_text_style,
        )),
        Line::from(Span::styled(
            "Bug Fixing — paste broken code and find the error",
            theme.system_text_style,
        )),
        Line::from(Span::styled(
            "Concept Explanation — APIs, async, anything",
            theme.system_text_style,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Type a message below to get started.",
            theme.system_text_style,
        )),
    ]
}

fn render_sidebar(f: &mut Frame, app: &App, sidebar: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled("Conversations", theme.sidebar_title_style));

    let inner_width = sidebar.width.saturating_sub(2) as usize;
    let lines: Vec<Line<'static>> = match app.sidebar_content {
        SidebarContent::LoggedOut => placeholder_lines(
            "Please log in to see your chat history.",
            theme.system_text_style,
        ),
        SidebarContent::Empty => {
            placeholder_lines("No chat history yet.", theme.system_text_style)
        }
        SidebarContent::LoadError => placeholder_lines(
            "Could not load history.",
            Style::default().fg(Color::Red),
        ),
        SidebarContent::Listing => app
            .conversations
            .iter()
            .enumerate()
            .map(|(index, conversation)| {
                let selected = app.selected_conversation == Some(index);
                let under_cursor =
                    app.focus == Focus::Sidebar && app.sidebar_cursor == index;
                let marker = if selected { "▸ " } else { "  " };
                let mut style = theme.sidebar_item_style;
                if selected {
                    style = theme.sidebar_selected_style;
                }
                if under_cursor {
                    style = theme.sidebar_cursor_style;
                }
                let title = truncate_to_width(
                    &conversation.title,
                    inner_width.saturating_sub(marker.len()),
                );
                Line::from(Span::styled(format!("{marker}{title}"), style))
            })
            .collect(),
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, sidebar);
}

fn placeholder_lines(text: &str, style: Style) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(text.to_string(), style)),
    ]
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0usize;
    for (i, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            let mut out = text[..i].to_string();
            // Make room for the ellipsis itself.
            while width + 1 > max_width {
                match out.pop() {
                    Some(popped) => width -= popped.width().unwrap_or(0),
                    None => break,
                }
            }
            out.push('…');
            return out;
        }
        width += w;
    }
    text.to_string()
}

fn render_composer(f: &mut Frame, app: &mut App, input: Rect) {
    let theme = app.theme.clone();
    // The gated navigation pair: login/signup while logged out,
    // profile/logout while logged in.
    let title = if app.session.logged_in {
        "Enter to send · Alt+Enter newline · /profile · /logout · /help"
    } else {
        "Enter to send · /login · /signup · /help"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(title, theme.input_title_style));
    app.composer.set_block(block);
    app.composer.set_style(theme.input_text_style);
    f.render_widget(&app.composer, input);
}

fn render_notices(f: &mut Frame, app: &App, chat: Rect) {
    let theme = &app.theme;
    for (index, notice) in app.notices.iter().enumerate() {
        let area = notice_area(chat, index);
        if area.height == 0 || area.width == 0 {
            continue;
        }
        let style = match notice.kind {
            NoticeKind::Success => theme.notice_success_style,
            NoticeKind::Error => theme.notice_error_style,
        };
        let text = truncate_to_width(&notice.message, area.width.saturating_sub(4) as usize);
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(Span::styled(format!(" {text} ×"), style)).style(style),
            area,
        );
    }
}

fn render_modals(f: &mut Frame, app: &App) {
    // Draw lower-priority dialogs first so the one receiving input sits on
    // top when several are open at once.
    for kind in MODAL_ORDER.iter().rev() {
        if app.modals.is_open(*kind) {
            render_modal(f, app, *kind);
        }
    }
}

fn render_modal(f: &mut Frame, app: &App, kind: ModalKind) {
    let theme = &app.theme;
    let area = modal_area(kind, f.area());
    let (title, lines) = match kind {
        ModalKind::Login => ("Log in", form_lines(&app.modals.login_form, theme)),
        ModalKind::Signup => ("Sign up", form_lines(&app.modals.signup_form, theme)),
        ModalKind::Subscription => (
            "Subscription",
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Spice AI Free — unlimited conversations.",
                    theme.modal_text_style,
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Spice AI Pro — faster replies and bigger",
                    theme.modal_text_style,
                )),
                Line::from(Span::styled("models. Coming soon.", theme.modal_text_style)),
            ],
        ),
        ModalKind::About => (
            "About",
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("Spicechat v{}", env!("CARGO_PKG_VERSION")),
                    theme.modal_text_style,
                )),
                Line::from(Span::styled(
                    "A terminal client for Spice AI chat servers.",
                    theme.system_text_style,
                )),
                Line::from(""),
                Line::from(Span::styled("Commands:", theme.modal_text_style)),
                Line::from(Span::styled(
                    "  /new /login /signup /logout /profile",
                    theme.system_text_style,
                )),
                Line::from(Span::styled(
                    "  /subscribe /about /help /quit",
                    theme.system_text_style,
                )),
                Line::from(""),
                Line::from(Span::styled("Keys:", theme.modal_text_style)),
                Line::from(Span::styled(
                    "  Enter send · Alt+Enter newline · Tab focus",
                    theme.system_text_style,
                )),
                Line::from(Span::styled(
                    "  Ctrl+N new chat · Ctrl+C quit · Esc close",
                    theme.system_text_style,
                )),
            ],
        ),
        ModalKind::Profile => {
            let line = match &app.session.username {
                Some(username) => format!("Signed in as {username}."),
                None => "Not signed in.".to_string(),
            };
            (
                "Profile",
                vec![
                    Line::from(""),
                    Line::from(Span::styled(line, theme.modal_text_style)),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Log out with /logout.",
                        theme.system_text_style,
                    )),
                ],
            )
        }
    };

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.modal_border_style)
        .title(Span::styled(title, theme.title_style));
    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(theme.background_color)),
        area,
    );

    // Text cursor at the end of the focused form field.
    if matches!(kind, ModalKind::Login | ModalKind::Signup) && app.modals.topmost() == Some(kind)
    {
        let form = match kind {
            ModalKind::Login => &app.modals.login_form,
            _ => &app.modals.signup_form,
        };
        if let Some(field) = form.fields.get(form.focus) {
            let shown = if field.masked {
                field.value.chars().count()
            } else {
                field.value.chars().map(|c| c.width().unwrap_or(0)).sum()
            };
            let row = area.y + 2 + (form.focus as u16) * 2;
            let col = area.x + 1 + field.label.len() as u16 + 2 + shown as u16;
            f.set_cursor_position((
                col.min(area.x + area.width.saturating_sub(2)),
                row.min(area.y + area.height.saturating_sub(2)),
            ));
        }
    }
}

fn form_lines(form: &AuthForm, theme: &crate::ui::theme::Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];
    for (index, field) in form.fields.iter().enumerate() {
        let shown = if field.masked {
            "•".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };
        let value_style = if index == form.focus {
            theme.modal_field_focus_style
        } else {
            theme.modal_field_style
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", field.label), theme.system_text_style),
            Span::styled(shown, value_style),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Enter submit · Tab next · Esc close",
        theme.system_text_style,
    )));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::ui::theme::Theme;

    fn app_with(messages: Vec<Message>) -> App {
        let mut app = App::new(Theme::dark_default(), false);
        app.messages = messages;
        app.show_welcome = false;
        app
    }

    #[test]
    fn plain_message_renders_one_content_line_plus_spacing() {
        let app = app_with(vec![Message::assistant("hello")]);
        let lines = build_display_lines(&app);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "hello");
    }

    #[test]
    fn user_messages_carry_the_prefix_on_the_first_line() {
        let app = app_with(vec![Message::user("one\ntwo")]);
        let lines = build_display_lines(&app);
        assert_eq!(lines[0].spans[0].content, "You: ");
        assert_eq!(lines[0].spans[1].content, "one");
        assert_eq!(lines[1].spans[0].content, "two");
    }

    #[test]
    fn fenced_code_interleaves_between_prose() {
        let app = app_with(vec![Message::assistant(
            "Explain ```python\nprint(1)\n``` please",
        )]);
        let lines = build_display_lines(&app);
        let texts: Vec<String> = lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.to_string())
                    .collect::<String>()
            })
            .collect();
        assert_eq!(texts, vec!["Explain ", "print(1)", " please", ""]);
    }

    #[test]
    fn typing_indicator_appends_a_pulse_line() {
        let mut app = app_with(vec![Message::user("hi")]);
        app.awaiting_reply = true;
        let lines = build_display_lines(&app);
        let last = lines.last().expect("indicator line");
        assert!(last.spans[0].content.ends_with("thinking…"));
    }

    #[test]
    fn max_scroll_is_zero_when_everything_fits() {
        let app = app_with(vec![Message::assistant("short")]);
        let chat = Rect::new(0, 0, 80, 20);
        assert_eq!(transcript_max_scroll(&app, chat), 0);
    }

    #[test]
    fn max_scroll_grows_with_long_transcripts() {
        let many = (0..30).map(|i| Message::assistant(format!("line {i}"))).collect();
        let app = app_with(many);
        let chat = Rect::new(0, 0, 80, 10);
        assert!(transcript_max_scroll(&app, chat) > 0);
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("long conversation title", 8), "long co…");
    }
}
