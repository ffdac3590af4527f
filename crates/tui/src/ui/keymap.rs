use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Save,
    Cancel,
    Next,
    Prev,
    Submit,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Ctrl(char),
    Input(char),
    None,
}

pub fn map_key(key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => KeyAction::Quit,
            KeyCode::Char('s') => KeyAction::Save,
            KeyCode::Char(ch) => KeyAction::Ctrl(ch),
            _ => KeyAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => KeyAction::Cancel,
        KeyCode::Tab => KeyAction::Next,
        KeyCode::BackTab => KeyAction::Prev,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Backspace => KeyAction::Backspace,
        KeyCode::Up => KeyAction::Up,
        KeyCode::Down => KeyAction::Down,
        KeyCode::Left => KeyAction::Left,
        KeyCode::Right => KeyAction::Right,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,
        KeyCode::Char(ch) => KeyAction::Input(ch),
        _ => KeyAction::None,
    }
}
