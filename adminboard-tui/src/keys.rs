//! Keybinding definitions for the TUI.
//!
//! The same key means different things depending on what has focus, so
//! mapping takes the current [`InputMode`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Table and sidebar navigation.
    Normal,
    /// Typing into the filter bar.
    Filter,
    /// The record editor popup.
    Editor,
    /// The hierarchy picker popup.
    Picker,
    /// A yes/no confirmation.
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Confirm,
    Cancel,
    NewItem,
    EditItem,
    DeleteItem,
    Sort,
    PrevColumn,
    NextColumn,
    OpenFilter,
    OpenPicker,
    Refresh,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    /// Zero-based page index.
    GoToPage(usize),
    PageSizeUp,
    PageSizeDown,
    OpenHelp,
    Input(char),
    Backspace,
    NextField,
    PrevField,
    ToggleExpand,
}

pub fn map_key(event: KeyEvent, mode: InputMode) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') if mode == InputMode::Normal => Some(Action::Refresh),
            _ => None,
        };
    }

    match mode {
        InputMode::Normal => map_normal(code),
        InputMode::Filter => map_text_entry(code),
        InputMode::Editor => match code {
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
            KeyCode::Left => Some(Action::MoveLeft),
            KeyCode::Right => Some(Action::MoveRight),
            _ => map_text_entry(code),
        },
        InputMode::Picker => match code {
            KeyCode::Up => Some(Action::MoveUp),
            KeyCode::Down => Some(Action::MoveDown),
            KeyCode::Tab | KeyCode::Right | KeyCode::Left => Some(Action::ToggleExpand),
            _ => map_text_entry(code),
        },
        InputMode::Confirm => match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::Cancel),
            _ => None,
        },
    }
}

fn map_normal(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenFilter),
        KeyCode::Char('p') => Some(Action::OpenPicker),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') | KeyCode::Enter => Some(Action::EditItem),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::DeleteItem),
        KeyCode::Char('s') => Some(Action::Sort),
        KeyCode::Char('[') => Some(Action::PrevColumn),
        KeyCode::Char(']') => Some(Action::NextColumn),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstPage),
        KeyCode::Char('G') | KeyCode::End => Some(Action::LastPage),
        KeyCode::Char('+') => Some(Action::PageSizeUp),
        KeyCode::Char('-') => Some(Action::PageSizeDown),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char(c @ '1'..='9') => Some(Action::GoToPage(c as usize - '1' as usize)),
        _ => None,
    }
}

fn map_text_entry(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) => Some(Action::Input(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_same_key_depends_on_mode() {
        assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Normal), Some(Action::Quit));
        assert_eq!(
            map_key(key(KeyCode::Char('q')), InputMode::Filter),
            Some(Action::Input('q'))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('q')), InputMode::Picker),
            Some(Action::Input('q'))
        );
        assert_eq!(map_key(key(KeyCode::Char('q')), InputMode::Confirm), None);
    }

    #[test]
    fn test_digits_go_to_zero_based_page() {
        assert_eq!(
            map_key(key(KeyCode::Char('1')), InputMode::Normal),
            Some(Action::GoToPage(0))
        );
        assert_eq!(
            map_key(key(KeyCode::Char('9')), InputMode::Normal),
            Some(Action::GoToPage(8))
        );
        assert_eq!(map_key(key(KeyCode::Char('0')), InputMode::Normal), None);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [
            InputMode::Normal,
            InputMode::Filter,
            InputMode::Editor,
            InputMode::Picker,
            InputMode::Confirm,
        ] {
            assert_eq!(map_key(ctrl_c, mode), Some(Action::Quit));
        }
    }
}
