use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// What a game is asked to do. Pointer coordinates are fractions of the
/// play field, `0.0..=1.0` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Move(Direction),
    /// Start / primary action / restart, depending on round status.
    Action,
    Pointer { x: f32, y: f32 },
    Select { x: f32, y: f32 },
    Pause,
    Restart,
}

/// Maps device events onto [`Command`]s for the mounted game.
///
/// The router lives inside the session, so dropping the session is what
/// unsubscribes the game from input.
#[derive(Debug, Default)]
pub struct InputRouter {
    field: Option<Rect>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self { field: None }
    }

    /// Screen rectangle the field was last painted into.
    pub fn set_field(&mut self, area: Rect) {
        self.field = Some(area);
    }

    pub fn route_key(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        match key.code {
            KeyCode::Up => Some(Command::Move(Direction::Up)),
            KeyCode::Down => Some(Command::Move(Direction::Down)),
            KeyCode::Left => Some(Command::Move(Direction::Left)),
            KeyCode::Right => Some(Command::Move(Direction::Right)),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Command::Action),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pause),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
            _ => None,
        }
    }

    pub fn route_mouse(&self, mouse: MouseEvent) -> Option<Command> {
        let field = self.field?;
        if field.width == 0 || field.height == 0 {
            return None;
        }
        let fx = (mouse.column as f32 - field.x as f32 + 0.5) / field.width as f32;
        let fy = (mouse.row as f32 - field.y as f32 + 0.5) / field.height as f32;
        match mouse.kind {
            // Motion anywhere steers, clamped to the field
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                Some(Command::Pointer {
                    x: fx.clamp(0.0, 1.0),
                    y: fy.clamp(0.0, 1.0),
                })
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if (0.0..1.0).contains(&fx) && (0.0..1.0).contains(&fy) {
                    Some(Command::Select { x: fx, y: fy })
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
