use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};

use engine::password::Strength;

use crate::{
    app::{AppState, password::OPTION_ROWS},
    ui::theme::Theme,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let panel = &state.password;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let (text, style) = match &panel.password {
        Some(password) => (
            password.clone(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        None => (
            "Select at least one character class".to_string(),
            Style::default().fg(theme.error),
        ),
    };
    let password = Paragraph::new(Line::styled(text, style)).block(
        Block::default()
            .title("Password")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent)),
    );
    frame.render_widget(password, layout[0]);

    let strength = panel.strength();
    let color = match strength {
        Some(Strength::Weak) | None => theme.error,
        Some(Strength::Medium) => theme.warning,
        Some(Strength::Strong) => theme.accent,
        Some(Strength::VeryStrong) => theme.positive,
    };
    let gauge = Gauge::default()
        .block(Block::default().title("Strength").borders(Borders::ALL))
        .gauge_style(Style::default().fg(color).bg(theme.panel))
        .percent(strength.map(Strength::percent).unwrap_or(0))
        .label(strength.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()));
    frame.render_widget(gauge, layout[1]);

    let values = panel.values();
    let items: Vec<ListItem<'_>> = OPTION_ROWS
        .iter()
        .zip(values)
        .map(|(label, value)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{label:<15}"), Style::default().fg(theme.dim)),
                Span::styled(value, Style::default().fg(theme.text)),
            ]))
        })
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(panel.row));
    let list = List::new(items)
        .block(Block::default().title("Options").borders(Borders::ALL))
        .highlight_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, layout[2], &mut list_state);
}
