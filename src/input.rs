use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key means to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Click-equivalent start/stop
    Primary,
    /// Hold gesture began
    Press,
    /// Hold gesture ended
    Release,
    Save,
    Reset,
    NewScramble,
    SelectUp,
    SelectDown,
    Delete,
    ClearHistory,
    Answer(bool),
    Quit,
}

/// Key map. `hold_mode` is on when the terminal reports key releases, which
/// is what makes the Space hold-to-start gesture possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyBindings {
    pub hold_mode: bool,
}

impl KeyBindings {
    pub fn new(hold_mode: bool) -> Self {
        Self { hold_mode }
    }

    /// Translate a key event. `confirming` is true while a y/n prompt is open.
    pub fn map(&self, key: KeyEvent, confirming: bool) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return (key.kind != KeyEventKind::Release).then_some(Action::Quit);
        }

        if key.code == KeyCode::Char(' ') && self.hold_mode && !confirming {
            return match key.kind {
                KeyEventKind::Press => Some(Action::Press),
                KeyEventKind::Release => Some(Action::Release),
                KeyEventKind::Repeat => None,
            };
        }

        if key.kind != KeyEventKind::Press {
            return None;
        }

        if confirming {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    Some(Action::Answer(true))
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(Action::Answer(false))
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Primary),
            KeyCode::Char('s') => Some(Action::Save),
            KeyCode::Char('r') => Some(Action::Reset),
            KeyCode::Char('n') => Some(Action::NewScramble),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectDown),
            KeyCode::Char('d') | KeyCode::Delete => Some(Action::Delete),
            KeyCode::Char('c') => Some(Action::ClearHistory),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }
}
