use chrono::{Datelike, NaiveDateTime, Timelike};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

const WEEKDAYS: [&str; 7] = [
    "星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日",
];

/// `HH:MM` and the month, day and weekday in the dashboard's locale.
pub fn clock_line(now: NaiveDateTime) -> (String, String) {
    let time = format!("{:02}:{:02}", now.hour(), now.minute());
    let weekday = WEEKDAYS[now.weekday().num_days_from_monday() as usize];
    let date = format!("{}月{}日{weekday}", now.month(), now.day());
    (time, date)
}

pub fn line(now: NaiveDateTime, theme: &Theme) -> Line<'static> {
    let (time, date) = clock_line(now);
    Line::from(vec![
        Span::styled(time, Style::default().fg(theme.text)),
        Span::raw(" "),
        Span::styled(date, Style::default().fg(theme.dim)),
    ])
}

pub fn render(frame: &mut Frame<'_>, area: Rect, line: Line<'static>) {
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn pads_the_time_and_names_the_weekday() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_opt(9, 5, 59)
            .unwrap();
        assert_eq!(
            clock_line(now),
            ("09:05".to_string(), "3月3日星期日".to_string())
        );
    }
}
