pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use engine::ViewMode;

use crate::{
    app::{AppState, Mode, SyncStatus},
    persist::LoadSource,
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

const INFO_BAR: u16 = 1;
const BOTTOM_BAR: u16 = 1;
/// Top and bottom border of the link list.
const LIST_BORDERS: u16 = 2;

/// Rows available to the link list in a terminal `height` rows tall.
pub fn list_height(height: u16) -> u32 {
    u32::from(height.saturating_sub(INFO_BAR + BOTTOM_BAR + LIST_BORDERS))
}

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::with_background(state.store.background_color());
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INFO_BAR),
            Constraint::Min(0),
            Constraint::Length(BOTTOM_BAR),
        ])
        .split(area);

    let clock = components::clock::line(chrono::Local::now().naive_local(), &theme);
    let info = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(clock.width() as u16 + 1)])
        .split(layout[0]);
    render_info_bar(frame, info[0], state, &theme);
    components::clock::render(frame, info[1], clock);
    match state.store.view() {
        ViewMode::Links => {
            screens::links::render(frame, layout[1], state, &theme);
            screens::dialogs::render(frame, layout[1], state, &theme);
        }
        ViewMode::JsonEditor => screens::text_view::render(
            frame,
            layout[1],
            &state.editor,
            "Library JSON",
            state.editor_error.as_deref(),
            &theme,
        ),
        ViewMode::PasswordGenerator => screens::password::render(frame, layout[1], state, &theme),
    }
    render_bottom_bar(frame, layout[2], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (status, status_color) = match &state.sync {
        SyncStatus::Idle => ("idle", theme.dim),
        SyncStatus::Pending => ("saving…", theme.warning),
        SyncStatus::Saved => ("saved", theme.positive),
        SyncStatus::Failed(_) => ("offline", theme.error),
    };
    let source = match state.source {
        LoadSource::Remote => "server",
        LoadSource::Cache => "cache",
        LoadSource::Seed => "defaults",
    };

    let mut spans = vec![
        Span::styled(
            "linkdeck",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", state.base_url), Style::default().fg(theme.dim)),
        Span::styled("  loaded from ", Style::default().fg(theme.dim)),
        Span::raw(source),
        Span::raw("  "),
        Span::styled(status, Style::default().fg(status_color)),
    ];

    let searching = matches!(state.mode, Mode::Search);
    if searching || !state.store.query().is_empty() {
        let fields = state.store.fields();
        let flag = |on: bool, label: &'static str| {
            let style = if on {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
            };
            Span::styled(label, style)
        };
        spans.push(Span::styled("   / ", Style::default().fg(theme.accent)));
        spans.push(Span::styled(
            state.store.query().to_string(),
            Style::default().fg(theme.text),
        ));
        if searching {
            spans.push(Span::styled("▏", Style::default().fg(theme.accent)));
        }
        spans.push(Span::raw("  "));
        spans.push(flag(fields.name, "name"));
        spans.push(Span::raw(" "));
        spans.push(flag(fields.alias, "alias"));
        spans.push(Span::raw(" "));
        spans.push(flag(fields.url, "url"));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints = components::hints::for_state(state);
    let bar = Paragraph::new(Line::from(components::hints::hints_to_spans(hints, theme)));
    frame.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use engine::{AppStore, Library};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn list_height_leaves_room_for_bars_and_borders() {
        assert_eq!(list_height(20), 16);
        assert_eq!(list_height(3), 0);
    }

    #[test]
    fn renders_categories_and_links() {
        let state = AppState::new(
            AppStore::new(Library::seed()),
            LoadSource::Seed,
            "http://127.0.0.1:4000",
        );
        let screen = draw(&state);

        assert!(screen.contains("linkdeck"));
        assert!(screen.contains("GitHub"));
        assert!(screen.contains("slack.com"));
        assert!(screen.contains("All (4)"));
    }
}
