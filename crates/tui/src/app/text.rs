/// Multi-line text with a cursor, for the JSON editor and the batch paste box.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    /// In characters, not bytes.
    col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl TextBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            row: 0,
            col: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// `(row, column)` of the cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn insert(&mut self, ch: char) {
        if ch == '\n' {
            self.newline();
            return;
        }
        let at = self.byte_index();
        self.lines[self.row].insert(at, ch);
        self.col += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars().filter(|ch| *ch != '\r') {
            self.insert(ch);
        }
    }

    pub fn newline(&mut self) {
        let at = self.byte_index();
        let rest = self.lines[self.row].split_off(at);
        self.row += 1;
        self.lines.insert(self.row, rest);
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_index();
            self.lines[self.row].remove(at);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len();
            self.lines[self.row].push_str(&line);
        }
    }

    pub fn left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len();
        }
    }

    pub fn right(&mut self) {
        if self.col < self.line_len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len());
        }
    }

    pub fn down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len());
        }
    }

    fn line_len(&self) -> usize {
        self.lines[self.row].chars().count()
    }

    fn byte_index(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map(|(index, _)| index)
            .unwrap_or(line.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_newlines_build_the_text() {
        let mut buffer = TextBuffer::default();
        buffer.insert_str("{\r\n}");
        buffer.up();
        buffer.newline();
        buffer.insert_str("  \"links\": []");

        assert_eq!(buffer.text(), "{\n  \"links\": []\n}");
        assert_eq!(buffer.cursor(), (1, 13));
    }

    #[test]
    fn backspace_at_line_start_joins_lines() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.down();
        buffer.backspace();

        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), (0, 2));
    }

    #[test]
    fn cursor_counts_characters_not_bytes() {
        let mut buffer = TextBuffer::from_text("开发");
        buffer.right();
        buffer.insert('-');
        buffer.right();
        buffer.backspace();

        assert_eq!(buffer.text(), "开-");
    }

    #[test]
    fn vertical_moves_clamp_the_column() {
        let mut buffer = TextBuffer::from_text("long line\nab");
        for _ in 0..9 {
            buffer.right();
        }
        buffer.down();
        assert_eq!(buffer.cursor(), (1, 2));
        buffer.down();
        assert_eq!(buffer.cursor(), (1, 2));
    }
}
