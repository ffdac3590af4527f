use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::{app::text::TextBuffer, ui::theme::Theme};

/// Editable text area; keeps the cursor line in view and places the
/// terminal cursor on it.
pub fn render(
    frame: &mut Frame<'_>,
    area: Rect,
    buffer: &TextBuffer,
    title: &str,
    error: Option<&str>,
    theme: &Theme,
) {
    let border = if error.is_some() { theme.error } else { theme.accent };
    let mut block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.panel));
    if let Some(error) = error {
        block = block.title_bottom(Line::styled(error.to_string(), Style::default().fg(theme.error)));
    }

    let inner = block.inner(area);
    let (row, col) = buffer.cursor();
    let height = usize::from(inner.height.max(1));
    let offset = row.saturating_sub(height - 1);

    let lines: Vec<Line<'_>> = buffer
        .lines()
        .iter()
        .skip(offset)
        .take(height)
        .map(|line| Line::styled(line.as_str(), Style::default().fg(theme.text)))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);

    let before: String = buffer.lines()[row].chars().take(col).collect();
    let x = inner
        .x
        .saturating_add(u16::try_from(Line::from(before).width()).unwrap_or(u16::MAX));
    let y = inner
        .y
        .saturating_add(u16::try_from(row - offset).unwrap_or(u16::MAX));
    if x < inner.right() && y < inner.bottom() {
        frame.set_cursor_position(Position::new(x, y));
    }
}
