use ratatui::{style::Style, text::Span};

use crate::{
    app::{AppState, Mode},
    ui::theme::Theme,
};
use engine::ViewMode;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone, Copy)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

const fn hint(key: &'static str, action: &'static str) -> KeyHint {
    KeyHint { key, action }
}

const BROWSE: &[KeyHint] = &[
    hint("/", "search"),
    hint("↑↓", "select"),
    hint("Enter", "open"),
    hint("Tab", "category"),
    hint("a/e/d", "link"),
    hint("c/r/D", "category"),
    hint("<>", "move"),
    hint("b", "batch"),
    hint("J", "json"),
    hint("P", "password"),
    hint("i/s", "import/export"),
    hint("q", "quit"),
];

const SEARCH: &[KeyHint] = &[
    hint("↑↓", "select"),
    hint("Enter", "open"),
    hint("^N/^A/^U", "name/alias/url"),
    hint("Tab", "keep"),
    hint("Esc", "clear"),
];

const FORM: &[KeyHint] = &[
    hint("Tab", "next"),
    hint("←→", "category"),
    hint("Enter", "save"),
    hint("Esc", "cancel"),
];

const PROMPT: &[KeyHint] = &[hint("Enter", "confirm"), hint("Esc", "cancel")];

const CONFIRM: &[KeyHint] = &[hint("y", "delete"), hint("n", "keep")];

const TEXT: &[KeyHint] = &[hint("^S", "save"), hint("Esc", "close")];

const PASSWORD: &[KeyHint] = &[
    hint("↑↓", "option"),
    hint("←→", "change"),
    hint("g", "generate"),
    hint("Esc", "back"),
];

pub fn for_state(state: &AppState) -> &'static [KeyHint] {
    match state.store.view() {
        ViewMode::JsonEditor => return TEXT,
        ViewMode::PasswordGenerator => return PASSWORD,
        ViewMode::Links => {}
    }
    match state.mode {
        Mode::Browse => BROWSE,
        Mode::Search => SEARCH,
        Mode::LinkForm(_) => FORM,
        Mode::Prompt(_) => PROMPT,
        Mode::Confirm(_) => CONFIRM,
        Mode::Batch(_) => TEXT,
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(theme.dim),
        ));
    }

    spans
}
