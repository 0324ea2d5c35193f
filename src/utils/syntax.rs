use crate::ui::theme::Theme;
use ratatui::style::Color as TuiColor;
use ratatui::text::{Line, Span};
use std::sync::OnceLock;

fn is_dark_background(c: &TuiColor) -> bool {
    match c {
        TuiColor::Rgb(r, g, b) => {
            let br = 0.2126 * (*r as f32) + 0.7152 * (*g as f32) + 0.0722 * (*b as f32);
            br < 128.0
        }
        TuiColor::White => false,
        _ => true,
    }
}

fn normalize_lang_hint(s: &str) -> String {
    let t = s.trim().to_ascii_lowercase();
    match t.as_str() {
        "py" | "python" => "python".into(),
        "bash" | "sh" | "zsh" | "shell" => "bash".into(),
        "js" | "javascript" | "jsx" => "javascript".into(),
        "ts" | "tsx" | "typescript" => "typescript".into(),
        "rust" | "rs" => "rust".into(),
        "c" | "h" => "c".into(),
        "cpp" | "cc" | "cxx" | "hpp" => "cpp".into(),
        "yaml" | "yml" => "yaml".into(),
        other => other.into(),
    }
}

fn tui_color(c: syntect::highlighting::Color) -> TuiColor {
    TuiColor::Rgb(c.r, c.g, c.b)
}

// Kept small and pure for testing.
pub(crate) fn pick_syntect_theme_name(theme: &Theme) -> &'static str {
    if is_dark_background(&theme.background_color) {
        "base16-ocean.dark"
    } else {
        "InspiredGitHub"
    }
}

/// Highlight one fenced code body into styled lines, or `None` when no
/// usable syntect theme is available (callers fall back to plain rendering).
pub fn highlight_code_block(
    lang_hint: &str,
    code: &str,
    theme: &Theme,
) -> Option<Vec<Line<'static>>> {
    static SYNTAX_SET: OnceLock<syntect::parsing::SyntaxSet> = OnceLock::new();
    static THEME_SET: OnceLock<syntect::highlighting::ThemeSet> = OnceLock::new();
    let ps = SYNTAX_SET.get_or_init(syntect::parsing::SyntaxSet::load_defaults_newlines);
    let ts = THEME_SET.get_or_init(syntect::highlighting::ThemeSet::load_defaults);

    let syn_theme = ts.themes.get(pick_syntect_theme_name(theme))?;

    let lang_norm = normalize_lang_hint(lang_hint);
    let syntax = ps
        .find_syntax_by_token(&lang_norm)
        .unwrap_or_else(|| ps.find_syntax_plain_text());

    let mut highlighter = syntect::easy::HighlightLines::new(syntax, syn_theme);
    let bg = theme.codeblock_bg_color();

    let mut out: Vec<Line<'static>> = Vec::new();
    for line in syntect::util::LinesWithEndings::from(code) {
        let ranges = highlighter.highlight_line(line, ps).ok()?;
        let mut spans: Vec<Span<'static>> = Vec::new();
        for (style, text) in ranges {
            let frag = text.strip_suffix('\n').unwrap_or(text);
            let mut st = ratatui::style::Style::default().fg(tui_color(style.foreground));
            if let Some(bgcol) = bg {
                st = st.bg(bgcol);
            }
            spans.push(Span::styled(frag.to_string(), st));
        }
        if spans.is_empty() {
            out.push(Line::from(""));
        } else {
            out.push(Line::from(spans));
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn normalize_lang_hint_maps_common_aliases() {
        assert_eq!(normalize_lang_hint("py"), "python");
        assert_eq!(normalize_lang_hint("JS"), "javascript");
        assert_eq!(normalize_lang_hint("rs"), "rust");
        assert_eq!(normalize_lang_hint("plaintext"), "plaintext");
    }

    #[test]
    fn dark_background_heuristic_basic() {
        assert!(is_dark_background(&Color::Black));
        assert!(!is_dark_background(&Color::White));
        assert!(is_dark_background(&Color::Rgb(10, 10, 10)));
        assert!(!is_dark_background(&Color::Rgb(240, 240, 240)));
    }

    #[test]
    fn theme_selection_matches_brightness() {
        let dark = Theme::dark_default();
        let light = Theme::light();
        assert_eq!(pick_syntect_theme_name(&dark), "base16-ocean.dark");
        assert_eq!(pick_syntect_theme_name(&light), "InspiredGitHub");
    }

    #[test]
    fn highlighting_preserves_line_count() {
        let theme = Theme::dark_default();
        let lines = highlight_code_block("python", "print(1)\nprint(2)", &theme)
            .expect("default syntect themes are bundled");
        assert_eq!(lines.len(), 2);
    }
}
