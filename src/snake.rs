use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring position one step towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the direction of an orthogonally adjacent `other`, if any.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::from_delta(other.x - self.x, other.y - self.y)
    }
}

/// Mutable snake state and movement buffering behavior.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    buffered_direction: Direction,
    next_buffered_direction: Option<Direction>,
    pending_growth: u32,
}

impl Snake {
    /// Creates a snake of `length` cells with its head at `head`, the body
    /// trailing behind it opposite to `direction`.
    #[must_use]
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let behind = direction.opposite();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut cursor = head;
        body.push_back(cursor);
        for _ in 1..length {
            cursor = cursor.step(behind);
            body.push_back(cursor);
        }

        Self::from_body(body, direction)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "a snake needs at least one segment");
        Self::from_body(VecDeque::from(segments), direction)
    }

    fn from_body(body: VecDeque<Position>, direction: Direction) -> Self {
        Self {
            body,
            direction,
            buffered_direction: direction,
            next_buffered_direction: None,
            pending_growth: 0,
        }
    }

    /// Queues one segment of growth, paid out on the next move.
    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    /// Returns the head position for the next movement tick.
    #[must_use]
    pub fn candidate_head(&self) -> Position {
        self.candidate_head_towards(self.buffered_direction)
    }

    /// Returns the head position one step towards `direction`.
    #[must_use]
    pub fn candidate_head_towards(&self, direction: Direction) -> Position {
        self.head().step(direction)
    }

    /// Moves the head to `new_head`, shifting the body behind it.
    ///
    /// The old tail cell is captured before the shift; with growth pending it
    /// is re-appended so the chain stays contiguous.
    pub fn apply_move(&mut self, new_head: Position) {
        let old_tail = self.tail();

        self.body.push_front(new_head);
        let _ = self.body.pop_back();

        if self.pending_growth > 0 {
            self.body.push_back(old_tail);
            self.pending_growth -= 1;
        }

        self.direction = self.buffered_direction;
        if let Some(next) = self.next_buffered_direction.take() {
            self.buffered_direction = next;
        }
    }

    /// Buffers the next direction, supporting a two-deep queue for quick turns.
    ///
    /// When no turn is queued yet, the direction is stored as the primary
    /// buffered direction (rejecting direct reversals of the current direction).
    /// When a turn is already queued, a second direction is stored with
    /// last-input-wins semantics (rejecting reversals of the *queued* direction).
    /// Returns whether the request was accepted.
    pub fn buffer_direction(&mut self, direction: Direction) -> bool {
        if self.buffered_direction == self.direction {
            if !direction_change_is_valid(self.direction, direction) {
                return false;
            }
            self.buffered_direction = direction;
        } else {
            if !direction_change_is_valid(self.buffered_direction, direction) {
                return false;
            }
            self.next_buffered_direction = Some(direction);
        }
        true
    }

    /// Returns true when moving the head to `position` would hit the body.
    ///
    /// The tail is exempt when no growth is pending, since it vacates its
    /// cell on the same move.
    #[must_use]
    pub fn collides_with(&self, position: Position) -> bool {
        let checked = if self.pending_growth == 0 {
            self.body.len() - 1
        } else {
            self.body.len()
        };
        self.body.iter().take(checked).any(|segment| *segment == position)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false: a snake keeps at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the direction of the last applied move.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the direction the next move will take.
    #[must_use]
    pub fn buffered_direction(&self) -> Direction {
        self.buffered_direction
    }

    /// Returns the last heading queued, which may be one move further out.
    #[must_use]
    pub fn latest_direction(&self) -> Direction {
        self.next_buffered_direction
            .unwrap_or(self.buffered_direction)
    }

    #[must_use]
    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
