use std::io;
use std::mem;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

/// Minimum horizontal drag, in terminal columns, recognised as a swipe.
pub const SWIPE_THRESHOLD_COLUMNS: i32 = 3;

/// Minimum vertical drag, in terminal rows, recognised as a swipe.
pub const SWIPE_THRESHOLD_ROWS: i32 = 2;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Clockwise rotation order, starting at `Up`.
pub const CLOCKWISE: [Direction; 4] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::Left,
];

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit vector in grid coordinates (y grows downward).
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Index into [`CLOCKWISE`].
    #[must_use]
    pub fn rotation_index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Next direction in clockwise order.
    #[must_use]
    pub fn clockwise(self) -> Self {
        CLOCKWISE[(self.rotation_index() + 1) % CLOCKWISE.len()]
    }

    /// Maps a unit vector back to a direction.
    #[must_use]
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            _ => None,
        }
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// Pointer click: rotates the heading clockwise while playing.
    Turn,
    Confirm,
    Quit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Translates a key press into a game input.
#[must_use]
pub fn map_key_event(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => GameInput::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => GameInput::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => GameInput::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => {
            GameInput::Direction(Direction::Right)
        }
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => GameInput::Quit,
        _ => GameInput::Confirm,
    };

    Some(input)
}

/// Classifies a drag displacement as a swipe, by dominant axis.
///
/// Terminal cells are roughly twice as tall as they are wide, so one row of
/// vertical travel counts as two columns when comparing axes.
#[must_use]
pub fn swipe_direction(dx: i32, dy: i32) -> Option<Direction> {
    let horizontal = dx.abs();
    let vertical = dy.abs() * 2;

    if horizontal >= vertical && dx.abs() >= SWIPE_THRESHOLD_COLUMNS {
        return Some(if dx > 0 {
            Direction::Right
        } else {
            Direction::Left
        });
    }

    if vertical > horizontal && dy.abs() >= SWIPE_THRESHOLD_ROWS {
        return Some(if dy > 0 { Direction::Down } else { Direction::Up });
    }

    None
}

/// Turns raw left-button mouse events into clicks and swipes.
#[derive(Debug, Default)]
pub struct PointerTracker {
    origin: Option<(u16, u16)>,
    swiped: bool,
}

impl PointerTracker {
    /// Feeds one mouse event; returns a game input once a gesture resolves.
    pub fn handle(&mut self, mouse: MouseEvent) -> Option<GameInput> {
        let here = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some(here);
                self.swiped = false;
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let origin = self.origin?;
                let direction = swipe_between(origin, here)?;
                // Re-anchor so one long drag can chain several turns.
                self.origin = Some(here);
                self.swiped = true;
                Some(GameInput::Direction(direction))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let origin = self.origin.take()?;
                if mem::take(&mut self.swiped) {
                    return None;
                }
                match swipe_between(origin, here) {
                    Some(direction) => Some(GameInput::Direction(direction)),
                    None => Some(GameInput::Turn),
                }
            }
            _ => None,
        }
    }
}

fn swipe_between(from: (u16, u16), to: (u16, u16)) -> Option<Direction> {
    let dx = i32::from(to.0) - i32::from(from.0);
    let dy = i32::from(to.1) - i32::from(from.1);
    swipe_direction(dx, dy)
}

/// Polls crossterm for keyboard and mouse input.
#[derive(Debug, Default)]
pub struct InputHandler {
    pointer: PointerTracker,
}

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits up to `timeout` for one event and normalizes it.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        let input = match event::read()? {
            Event::Key(key) => map_key_event(key),
            Event::Mouse(mouse) => self.pointer.handle(mouse),
            _ => None,
        };

        Ok(input)
    }
}
