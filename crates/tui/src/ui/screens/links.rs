use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use engine::{Selection, favicon};

use crate::{
    app::{AppState, layout::Row},
    ui::theme::Theme,
};

pub const SIDEBAR_WIDTH: u16 = 26;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(area);

    render_sidebar(frame, columns[0], state, theme);
    render_sections(frame, columns[1], state, theme);
}

fn render_sidebar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let results = state.store.results();
    let selected = state.store.selected();

    let mut items = vec![ListItem::new(Line::from(format!(
        "All ({})",
        results.total()
    )))];
    items.extend(results.groups().iter().map(|group| {
        let style = if group.links.is_empty() {
            Style::default().fg(theme.dim)
        } else {
            Style::default().fg(theme.text)
        };
        ListItem::new(Line::from(vec![
            Span::styled(group.category.name.clone(), style),
            Span::styled(
                format!(" ({})", group.links.len()),
                Style::default().fg(theme.dim),
            ),
        ]))
    }));

    let position = match selected {
        Selection::All => Some(0),
        Selection::Category(id) => results
            .groups()
            .iter()
            .position(|group| &group.category.id == id)
            .map(|index| index + 1),
    };
    let mut list_state = ListState::default();
    list_state.select(position);

    let list = List::new(items)
        .block(
            Block::default()
                .title("Categories")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▌");
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_sections(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .title("Links")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let results = state.store.results();
    if results.total() == 0 {
        let message = if state.store.library().categories.is_empty() {
            "No categories yet. Press c to create one."
        } else if state.store.query().trim().is_empty() {
            "No links yet. Press a to add one or b to paste several."
        } else {
            "No links match the search."
        };
        let body = Paragraph::new(Line::styled(message, Style::default().fg(theme.dim))).block(block);
        frame.render_widget(body, area);
        return;
    }

    let rows = crate::app::layout::rows(&results);
    let selected_id = state.store.selected().category_id();
    let cursor = state.store.cursor();
    let top = usize::try_from(state.scroll_top).unwrap_or(0);
    let height = usize::from(area.height.saturating_sub(2));

    let lines: Vec<Line<'_>> = rows
        .iter()
        .skip(top)
        .take(height)
        .map(|row| match *row {
            Row::Header { id, name, count } => {
                let style = if Some(id) == selected_id {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
                };
                Line::from(vec![
                    Span::styled(name.to_string(), style),
                    Span::styled(format!("  {count}"), Style::default().fg(theme.dim)),
                ])
            }
            Row::Link { link, index } => {
                let mut spans = vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{} ", link.icon().glyph()),
                        Style::default().fg(theme.accent),
                    ),
                    Span::styled(link.name.clone(), Style::default().fg(theme.text)),
                ];
                if let Some(alias) = &link.alias {
                    spans.push(Span::styled(
                        format!("  {alias}"),
                        Style::default().fg(theme.warning),
                    ));
                }
                let domain = favicon::extract_domain(&link.url).unwrap_or_else(|| link.url.clone());
                spans.push(Span::styled(
                    format!("  {domain}"),
                    Style::default().fg(theme.dim),
                ));
                let line = Line::from(spans);
                if cursor == Some(index) {
                    line.style(Style::default().bg(theme.highlight))
                } else {
                    line
                }
            }
            Row::Spacer => Line::default(),
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
