use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Rows moved per mouse wheel notch
const WHEEL_ROWS: i32 = 3;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    ScrollBy(i32),
    ScrollPageUp,
    ScrollPageDown,
    JumpToTop,
    JumpToBottom,
    NextCommand,
    PrevCommand,
    /// Toggle the selected command
    Toggle,
    /// Toggle the n-th command (zero based)
    ToggleNth(usize),
    Click { column: u16, row: u16 },
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::PageDown, _) => Action::ScrollPageDown,
        (KeyCode::PageUp, _) => Action::ScrollPageUp,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ScrollPageDown,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::ScrollPageUp,
        (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => Action::JumpToTop,
        (KeyCode::End, _) | (KeyCode::Char('G'), KeyModifiers::SHIFT) => Action::JumpToBottom,

        // Commands
        (KeyCode::Tab, KeyModifiers::NONE) => Action::NextCommand,
        (KeyCode::BackTab, _) => Action::PrevCommand,
        (KeyCode::Enter, KeyModifiers::NONE) | (KeyCode::Char(' '), KeyModifiers::NONE) => {
            Action::Toggle
        }
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::ToggleNth(c as usize - '1' as usize)
        }

        _ => Action::None,
    }
}

/// Handle a mouse event: left clicks and the wheel
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Action::Click {
            column: mouse.column,
            row: mouse.row,
        },
        MouseEventKind::ScrollDown => Action::ScrollBy(WHEEL_ROWS),
        MouseEventKind::ScrollUp => Action::ScrollBy(-WHEEL_ROWS),
        _ => Action::None,
    }
}
