use engine::password::{self, LENGTH_RANGE, PasswordOptions, Strength};

/// Password generator panel.
#[derive(Debug, Clone)]
pub struct PasswordPanel {
    pub options: PasswordOptions,
    pub password: Option<String>,
    /// Highlighted option row.
    pub row: usize,
}

pub const OPTION_ROWS: [&str; 6] = [
    "Length",
    "Uppercase",
    "Lowercase",
    "Digits",
    "Symbols",
    "Avoid similar",
];

impl Default for PasswordPanel {
    fn default() -> Self {
        let mut panel = Self {
            options: PasswordOptions::default(),
            password: None,
            row: 0,
        };
        panel.regenerate();
        panel
    }
}

impl PasswordPanel {
    pub fn regenerate(&mut self) {
        // No character class selected: nothing to show.
        self.password = password::generate(&self.options).ok();
    }

    pub fn strength(&self) -> Option<Strength> {
        self.password.as_deref().map(password::strength)
    }

    pub fn up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.row = (self.row + 1).min(OPTION_ROWS.len() - 1);
    }

    /// Toggle the highlighted class, or step the length by `delta`.
    pub fn adjust(&mut self, delta: i32) {
        let options = &mut self.options;
        match self.row {
            0 => {
                let length = i64::try_from(options.length).unwrap_or(i64::MAX) + i64::from(delta);
                let clamped = length.clamp(
                    i64::try_from(*LENGTH_RANGE.start()).unwrap_or(0),
                    i64::try_from(*LENGTH_RANGE.end()).unwrap_or(i64::MAX),
                );
                options.length = usize::try_from(clamped).unwrap_or(password::DEFAULT_LENGTH);
            }
            1 => options.uppercase = !options.uppercase,
            2 => options.lowercase = !options.lowercase,
            3 => options.digits = !options.digits,
            4 => options.symbols = !options.symbols,
            _ => options.avoid_similar = !options.avoid_similar,
        }
        self.regenerate();
    }

    /// State of each option row, in [`OPTION_ROWS`] order.
    pub fn values(&self) -> [String; 6] {
        let flag = |on: bool| if on { "on" } else { "off" }.to_string();
        [
            self.options.length.to_string(),
            flag(self.options.uppercase),
            flag(self.options.lowercase),
            flag(self.options.digits),
            flag(self.options.symbols),
            flag(self.options.avoid_similar),
        ]
    }
}
