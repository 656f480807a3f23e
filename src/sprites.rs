//! Directional sprite selection for snake segments.
//!
//! Every segment is drawn with one of fourteen sprites. Heads and tails pick
//! by the side their single neighbour is on; body segments look up the pair
//! (side of the previous segment, side of the next segment) in
//! [`CORNER_TABLE`] and fall back to a straight piece.

use crate::input::Direction;
use crate::snake::Position;

/// One directional snake sprite.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Sprite {
    HeadUp,
    HeadRight,
    HeadDown,
    HeadLeft,
    TailUp,
    TailRight,
    TailDown,
    TailLeft,
    Horizontal,
    Vertical,
    /// Joins the cells below and to the right.
    CornerDownRight,
    /// Joins the cells to the left and below.
    CornerLeftDown,
    /// Joins the cells above and to the left.
    CornerUpLeft,
    /// Joins the cells above and to the right.
    CornerUpRight,
}

/// Body corners keyed by (side towards previous segment, side towards next).
pub const CORNER_TABLE: [((Direction, Direction), Sprite); 8] = [
    ((Direction::Left, Direction::Down), Sprite::CornerLeftDown),
    ((Direction::Down, Direction::Left), Sprite::CornerLeftDown),
    ((Direction::Up, Direction::Left), Sprite::CornerUpLeft),
    ((Direction::Left, Direction::Up), Sprite::CornerUpLeft),
    ((Direction::Right, Direction::Up), Sprite::CornerUpRight),
    ((Direction::Up, Direction::Right), Sprite::CornerUpRight),
    ((Direction::Down, Direction::Right), Sprite::CornerDownRight),
    ((Direction::Right, Direction::Down), Sprite::CornerDownRight),
];

impl Sprite {
    /// Head sprite facing `heading`.
    #[must_use]
    pub fn head(heading: Direction) -> Self {
        match heading {
            Direction::Up => Self::HeadUp,
            Direction::Right => Self::HeadRight,
            Direction::Down => Self::HeadDown,
            Direction::Left => Self::HeadLeft,
        }
    }

    /// Tail sprite whose body continues towards `towards_previous`.
    #[must_use]
    pub fn tail(towards_previous: Direction) -> Self {
        match towards_previous {
            Direction::Up => Self::TailUp,
            Direction::Right => Self::TailRight,
            Direction::Down => Self::TailDown,
            Direction::Left => Self::TailLeft,
        }
    }

    /// Body sprite for a segment between two neighbours.
    #[must_use]
    pub fn body(towards_previous: Direction, towards_next: Direction) -> Self {
        CORNER_TABLE
            .iter()
            .find(|(key, _)| *key == (towards_previous, towards_next))
            .map_or_else(|| Self::straight(towards_previous), |(_, sprite)| *sprite)
    }

    fn straight(axis: Direction) -> Self {
        match axis {
            Direction::Left | Direction::Right => Self::Horizontal,
            Direction::Up | Direction::Down => Self::Vertical,
        }
    }

    /// Column and row of this sprite in the 5x4 atlas of 64 px cells.
    ///
    /// The terminal renderer draws [`glyph`](Self::glyph) instead; this is
    /// for front ends that blit from the original sprite sheet.
    #[must_use]
    pub fn sheet_cell(self) -> (u8, u8) {
        match self {
            Self::CornerDownRight => (0, 0),
            Self::Horizontal => (1, 0),
            Self::CornerLeftDown => (2, 0),
            Self::HeadUp => (3, 0),
            Self::HeadRight => (4, 0),
            Self::CornerUpRight => (0, 1),
            Self::Vertical => (2, 1),
            Self::HeadLeft => (3, 1),
            Self::HeadDown => (4, 1),
            Self::CornerUpLeft => (2, 2),
            Self::TailUp => (3, 2),
            Self::TailRight => (4, 2),
            Self::TailLeft => (3, 3),
            Self::TailDown => (4, 3),
        }
    }

    /// Terminal glyph for this sprite.
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::HeadUp => "▲",
            Self::HeadRight => "▶",
            Self::HeadDown => "▼",
            Self::HeadLeft => "◀",
            Self::TailUp => "╹",
            Self::TailRight => "╺",
            Self::TailDown => "╻",
            Self::TailLeft => "╸",
            Self::Horizontal => "━",
            Self::Vertical => "┃",
            Self::CornerDownRight => "┏",
            Self::CornerLeftDown => "┓",
            Self::CornerUpLeft => "┛",
            Self::CornerUpRight => "┗",
        }
    }

    /// True when the sprite connects to the cell on its right.
    #[must_use]
    pub fn joins_right(self) -> bool {
        matches!(
            self,
            Self::Horizontal
                | Self::CornerDownRight
                | Self::CornerUpRight
                | Self::TailRight
                | Self::HeadLeft
        )
    }

    #[must_use]
    pub fn is_head(self) -> bool {
        matches!(
            self,
            Self::HeadUp | Self::HeadRight | Self::HeadDown | Self::HeadLeft
        )
    }

    #[must_use]
    pub fn is_tail(self) -> bool {
        matches!(
            self,
            Self::TailUp | Self::TailRight | Self::TailDown | Self::TailLeft
        )
    }
}

/// Picks a sprite for each segment, head first.
///
/// `heading` orients a lone head, or any head whose neighbour is not adjacent.
#[must_use]
pub fn classify(segments: &[Position], heading: Direction) -> Vec<Sprite> {
    let last = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            if index == 0 {
                let facing = segments
                    .get(1)
                    .and_then(|next| segment.direction_to(*next))
                    .map_or(heading, Direction::opposite);
                return Sprite::head(facing);
            }

            let towards_previous = segment.direction_to(segments[index - 1]);
            if index == last {
                return Sprite::tail(towards_previous.unwrap_or(heading));
            }

            let towards_next = segment.direction_to(segments[index + 1]);
            match (towards_previous, towards_next) {
                (Some(previous), Some(next)) => Sprite::body(previous, next),
                (Some(axis), None) | (None, Some(axis)) => Sprite::straight(axis),
                (None, None) => Sprite::Horizontal,
            }
        })
        .collect()
}
