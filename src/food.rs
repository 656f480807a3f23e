use rand::Rng;

use crate::error::GameError;
use crate::grid::{Grid, Tile};
use crate::snake::{Position, Snake};

/// Random draws per board cell before falling back to a full scan.
pub const PLACEMENT_ATTEMPTS_PER_CELL: usize = 8;

/// Picks a free position that is neither a wall nor under the snake.
///
/// Draws uniformly until a free tile turns up, capped at
/// [`PLACEMENT_ATTEMPTS_PER_CELL`] draws per cell. Past the cap the free
/// tiles are enumerated, so a crowded board still terminates and a full one
/// reports [`GameError::NoFreeTile`].
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &Grid,
    snake: &Snake,
) -> Result<Position, GameError> {
    let size = grid.size();
    let is_free = |position: Position| {
        grid.tile(position) == Some(Tile::Empty) && !snake.occupies(position)
    };

    let attempts = size.total_cells() * PLACEMENT_ATTEMPTS_PER_CELL;
    for _ in 0..attempts {
        let position = Position {
            x: rng.gen_range(0..i32::from(size.width)),
            y: rng.gen_range(0..i32::from(size.height)),
        };
        if is_free(position) {
            return Ok(position);
        }
    }

    let candidates: Vec<Position> = grid
        .cells()
        .map(|(position, _)| position)
        .filter(|position| is_free(*position))
        .collect();

    if candidates.is_empty() {
        log::warn!(
            "no free tile for food on {}x{} board (snake length {})",
            size.width,
            size.height,
            snake.len()
        );
        return Err(GameError::NoFreeTile {
            width: size.width,
            height: size.height,
        });
    }

    Ok(candidates[rng.gen_range(0..candidates.len())])
}
