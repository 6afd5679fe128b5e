use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};

/// The two logical triggers the game recognizes. `Primary` means "jump"
/// while alive and "restart" once the game is over.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Primary,
    Quit,
}

/// Edge-triggered: only key presses and mouse-button presses count;
/// repeats, releases and everything else fall through.
pub fn map_event(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Char(' ') | KeyCode::Up => Some(Action::Primary),
            _ => None,
        },
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) => Some(Action::Primary),
            _ => None,
        },
        _ => None,
    }
}
