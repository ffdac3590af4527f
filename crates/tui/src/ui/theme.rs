use std::str::FromStr;

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub panel: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub highlight: Color,
    pub positive: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(16, 18, 24),
            panel: Color::Rgb(26, 29, 38),
            border: Color::Rgb(60, 66, 82),
            text: Color::Rgb(222, 224, 230),
            dim: Color::Rgb(130, 136, 150),
            accent: Color::Rgb(102, 126, 234),
            highlight: Color::Rgb(44, 52, 84),
            positive: Color::Rgb(96, 190, 120),
            warning: Color::Rgb(230, 180, 80),
            error: Color::Rgb(220, 90, 90),
        }
    }
}

impl Theme {
    /// Default palette over the user's background colour, when it parses
    /// (`#rrggbb` or a colour name).
    pub fn with_background(background: Option<&str>) -> Self {
        let theme = Self::default();
        match background.map(|raw| Color::from_str(raw.trim())) {
            Some(Ok(color)) => Self {
                background: color,
                ..theme
            },
            _ => theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_accepts_hex_and_names() {
        assert_eq!(
            Theme::with_background(Some("#102030")).background,
            Color::Rgb(16, 32, 48)
        );
        assert_eq!(Theme::with_background(Some("blue")).background, Color::Blue);
        assert_eq!(
            Theme::with_background(Some("not a colour")).background,
            Theme::default().background
        );
    }
}
