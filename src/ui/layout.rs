//! Rect math shared by the renderer and the mouse hit-tests, so a click and
//! a drawn widget always agree about where things are.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

use crate::ui::modal::ModalKind;

pub const SIDEBAR_WIDTH: u16 = 32;
pub const NOTICE_WIDTH: u16 = 44;

/// Composer height in rows for a given number of content lines (borders
/// included, growing with the draft like the original auto-sizing input).
pub fn composer_height(content_lines: usize) -> u16 {
    (content_lines.max(1).min(6) as u16) + 2
}

#[derive(Debug, Clone, Copy)]
pub struct ScreenLayout {
    pub sidebar: Rect,
    /// List rows inside the sidebar borders.
    pub sidebar_inner: Rect,
    pub chat: Rect,
    pub input: Rect,
}

pub fn compute_layout(area: Rect, input_height: u16) -> ScreenLayout {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(input_height)])
        .split(columns[1]);

    let sidebar = columns[0];
    let sidebar_inner = Rect {
        x: sidebar.x.saturating_add(1),
        y: sidebar.y.saturating_add(1),
        width: sidebar.width.saturating_sub(2),
        height: sidebar.height.saturating_sub(2),
    };

    ScreenLayout {
        sidebar,
        sidebar_inner,
        chat: rows[0],
        input: rows[1],
    }
}

/// Map a click position to a conversation row, if it lands on one.
pub fn conversation_row_at(
    layout: &ScreenLayout,
    count: usize,
    column: u16,
    row: u16,
) -> Option<usize> {
    let inner = layout.sidebar_inner;
    if !inner.contains(Position::new(column, row)) {
        return None;
    }
    let index = (row - inner.y) as usize;
    (index < count).then_some(index)
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Content rect of a dialog, centered in the frame.
pub fn modal_area(kind: ModalKind, area: Rect) -> Rect {
    let (width, height) = match kind {
        ModalKind::Login => (44, 10),
        ModalKind::Signup => (44, 12),
        ModalKind::Subscription => (50, 12),
        ModalKind::About => (58, 16),
        ModalKind::Profile => (44, 9),
    };
    centered_rect(width, height, area)
}

/// A click inside the frame but outside the dialog content is a backdrop
/// click and closes the dialog.
pub fn is_backdrop_click(content: Rect, frame: Rect, column: u16, row: u16) -> bool {
    let position = Position::new(column, row);
    frame.contains(position) && !content.contains(position)
}

/// Banner rects, stacked from the top-right corner of the chat area.
pub fn notice_area(chat: Rect, index: usize) -> Rect {
    let width = NOTICE_WIDTH.min(chat.width.saturating_sub(2));
    Rect {
        x: chat.x + chat.width.saturating_sub(width + 1),
        y: chat.y + 1 + index as u16,
        width,
        height: 1,
    }
    .intersection(chat)
}

/// Map a click position to a banner index, if it lands on one.
pub fn notice_at(chat: Rect, count: usize, column: u16, row: u16) -> Option<usize> {
    for index in 0..count {
        if notice_area(chat, index).contains(Position::new(column, row)) {
            return Some(index);
        }
    }
    None
}
