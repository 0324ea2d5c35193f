use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Transcript styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub system_text_style: Style,
    pub codeblock_text_style: Style,
    pub codeblock_bg: Option<Color>,

    // Chrome
    pub title_style: Style,
    pub typing_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,

    // Sidebar
    pub sidebar_title_style: Style,
    pub sidebar_item_style: Style,
    pub sidebar_cursor_style: Style,
    pub sidebar_selected_style: Style,

    // Overlays
    pub notice_success_style: Style,
    pub notice_error_style: Style,
    pub modal_border_style: Style,
    pub modal_text_style: Style,
    pub modal_field_style: Style,
    pub modal_field_focus_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            system_text_style: Style::default().fg(Color::DarkGray),
            codeblock_text_style: Style::default().fg(Color::Gray),
            codeblock_bg: Some(Color::Rgb(24, 24, 24)),

            title_style: Style::default().fg(Color::Gray),
            typing_indicator_style: Style::default().fg(Color::White),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),

            sidebar_title_style: Style::default().fg(Color::Gray),
            sidebar_item_style: Style::default().fg(Color::Green),
            sidebar_cursor_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Green),
            sidebar_selected_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),

            notice_success_style: Style::default().fg(Color::White).bg(Color::Green),
            notice_error_style: Style::default().fg(Color::White).bg(Color::Red),
            modal_border_style: Style::default().fg(Color::Gray),
            modal_text_style: Style::default().fg(Color::White),
            modal_field_style: Style::default().fg(Color::White),
            modal_field_focus_style: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            system_text_style: Style::default().fg(Color::Gray),
            codeblock_text_style: Style::default().fg(Color::DarkGray),
            codeblock_bg: Some(Color::Rgb(235, 235, 235)),

            title_style: Style::default().fg(Color::DarkGray),
            typing_indicator_style: Style::default().fg(Color::Black),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),

            sidebar_title_style: Style::default().fg(Color::DarkGray),
            sidebar_item_style: Style::default().fg(Color::Green),
            sidebar_cursor_style: Style::default()
                .fg(Color::White)
                .bg(Color::Green),
            sidebar_selected_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            notice_success_style: Style::default().fg(Color::White).bg(Color::Green),
            notice_error_style: Style::default().fg(Color::White).bg(Color::Red),
            modal_border_style: Style::default().fg(Color::Black),
            modal_text_style: Style::default().fg(Color::Black),
            modal_field_style: Style::default().fg(Color::Black),
            modal_field_focus_style: Style::default()
                .fg(Color::White)
                .bg(Color::Blue),
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            // Fallback
            _ => Self::dark_default(),
        }
    }

    pub fn codeblock_bg_color(&self) -> Option<Color> {
        self.codeblock_bg
    }
}
