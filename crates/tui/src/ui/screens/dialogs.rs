//! Modal dialogs drawn over the link list.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::{
        AppState, DeleteTarget, Mode, Prompt,
        form::{FormField, LinkForm},
    },
    ui::{
        components::{centered_lines, centered_rect},
        screens::text_view,
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    match &state.mode {
        Mode::LinkForm(form) => render_form(frame, area, state, form, theme),
        Mode::Prompt(prompt) => render_prompt(frame, area, prompt, theme),
        Mode::Confirm(target) => render_confirm(frame, area, target, theme),
        Mode::Batch(buffer) => {
            let popup = centered_rect(80, 70, area);
            frame.render_widget(Clear, popup);
            text_view::render(
                frame,
                popup,
                buffer,
                "Paste links: [name](url), url name, name url or url",
                None,
                theme,
            );
        }
        Mode::Browse | Mode::Search => {}
    }
}

fn popup_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.panel))
}

fn render_form(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    form: &LinkForm,
    theme: &Theme,
) {
    let popup = centered_lines(70, 10, area);
    frame.render_widget(Clear, popup);

    let categories = &state.store.library().categories;
    let category = categories
        .get(form.category)
        .map(|category| format!("◂ {} ▸", category.name))
        .unwrap_or_else(|| "-".to_string());
    let icon = if form.icon.trim().is_empty() {
        format!("{} {} (auto)", form.icon_preview().glyph(), form.icon_preview())
    } else {
        format!("{} {}", form.icon_preview().glyph(), form.icon)
    };

    let mut lines: Vec<Line<'_>> = FormField::ORDER
        .iter()
        .map(|field| {
            let value = match field {
                FormField::Name => form.name.clone(),
                FormField::Url => form.url.clone(),
                FormField::Alias => form.alias.clone(),
                FormField::Category => category.clone(),
                FormField::Icon => icon.clone(),
            };
            let focused = *field == form.focus;
            let label_style = if focused {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.dim)
            };
            let cursor = if focused && *field != FormField::Category {
                "▏"
            } else {
                ""
            };
            Line::from(vec![
                Span::styled(format!("{:<9}", field.label()), label_style),
                Span::styled(value, Style::default().fg(theme.text)),
                Span::styled(cursor, Style::default().fg(theme.accent)),
            ])
        })
        .collect();

    lines.push(Line::default());
    if let Some(error) = &form.error {
        lines.push(Line::styled(error.clone(), Style::default().fg(theme.error)));
    }

    let body = Paragraph::new(lines).block(popup_block(form.title(), theme));
    frame.render_widget(body, popup);
}

fn render_prompt(frame: &mut Frame<'_>, area: Rect, prompt: &Prompt, theme: &Theme) {
    let popup = centered_lines(60, 5, area);
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from(vec![
        Span::styled(prompt.input.clone(), Style::default().fg(theme.text)),
        Span::styled("▏", Style::default().fg(theme.accent)),
    ])];
    if let Some(error) = &prompt.error {
        lines.push(Line::styled(error.clone(), Style::default().fg(theme.error)));
    }

    let body = Paragraph::new(lines).block(popup_block(prompt.kind.title(), theme));
    frame.render_widget(body, popup);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, target: &DeleteTarget, theme: &Theme) {
    let popup = centered_lines(50, 5, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::styled(target.question(), Style::default().fg(theme.text)),
        Line::styled("y to delete, n to keep", Style::default().fg(theme.dim)),
    ];
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(popup_block("Confirm", theme).border_style(Style::default().fg(theme.error)));
    frame.render_widget(body, popup);
}
