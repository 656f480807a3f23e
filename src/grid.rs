use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GridSize;
use crate::error::GameError;
use crate::food::spawn_position;
use crate::snake::{Position, Snake};

/// Contents of one board cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Tile {
    Empty,
    Wall,
    Food,
}

/// How the board edge is represented.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// No wall tiles; leaving the board ends the game.
    Open,
    /// A one-tile wall ring around the playing field.
    Walled,
}

/// Static level layout plus the single food tile.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Grid {
    size: GridSize,
    topology: Topology,
    tiles: Vec<Tile>,
    food: Option<Position>,
}

impl Grid {
    /// Builds an empty board, walled around the edge for [`Topology::Walled`].
    #[must_use]
    pub fn generate(size: GridSize, topology: Topology) -> Self {
        let mut tiles = vec![Tile::Empty; size.total_cells()];

        if topology == Topology::Walled {
            let (width, height) = (usize::from(size.width), usize::from(size.height));
            for y in 0..height {
                for x in 0..width {
                    if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                        tiles[y * width + x] = Tile::Wall;
                    }
                }
            }
        }

        Self {
            size,
            topology,
            tiles,
            food: None,
        }
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[must_use]
    pub fn is_within_bounds(&self, position: Position) -> bool {
        position.is_within_bounds(self.size)
    }

    /// Returns the tile at `position`, or `None` outside the board.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<Tile> {
        self.index(position).map(|index| self.tiles[index])
    }

    /// Returns true when entering `position` ends the game.
    #[must_use]
    pub fn is_blocked(&self, position: Position) -> bool {
        matches!(self.tile(position), None | Some(Tile::Wall))
    }

    /// Returns the current food position, if one is placed.
    #[must_use]
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    /// Places food on a random free tile, replacing any previous food.
    pub fn place_food<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        snake: &Snake,
    ) -> Result<Position, GameError> {
        self.clear_food();
        let position = spawn_position(rng, self, snake)?;
        self.set_food(position)?;
        Ok(position)
    }

    /// Puts food at an explicit position. Any previous food is removed.
    ///
    /// Fails without touching the board when `position` is off the board or
    /// not an empty tile.
    pub fn set_food(&mut self, position: Position) -> Result<(), GameError> {
        let index = self
            .index(position)
            .filter(|index| self.food == Some(position) || self.tiles[*index] == Tile::Empty)
            .ok_or(GameError::FoodBlocked {
                x: position.x,
                y: position.y,
            })?;
        self.clear_food();
        self.tiles[index] = Tile::Food;
        self.food = Some(position);
        Ok(())
    }

    /// Turns the food tile, if any, back into an empty tile.
    pub fn clear_food(&mut self) {
        if let Some(index) = self.food.take().and_then(|food| self.index(food)) {
            self.tiles[index] = Tile::Empty;
        }
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        let width = usize::from(self.size.width);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let x = (index % width) as i32;
            let y = (index / width) as i32;
            (Position { x, y }, *tile)
        })
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.is_within_bounds(position) {
            return None;
        }
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        Some(y * usize::from(self.size.width) + x)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::GridSize;
    use crate::error::GameError;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{Grid, Tile, Topology};

    const SIZE: GridSize = GridSize {
        width: 6,
        height: 4,
    };

    #[test]
    fn open_grid_is_all_empty() {
        let grid = Grid::generate(SIZE, Topology::Open);

        assert!(grid.cells().all(|(_, tile)| tile == Tile::Empty));
        assert_eq!(grid.cells().count(), 24);
        assert_eq!(grid.food(), None);
    }

    #[test]
    fn walled_grid_has_border_ring() {
        let grid = Grid::generate(SIZE, Topology::Walled);

        assert_eq!(grid.tile(Position::new(0, 0)), Some(Tile::Wall));
        assert_eq!(grid.tile(Position::new(5, 2)), Some(Tile::Wall));
        assert_eq!(grid.tile(Position::new(3, 3)), Some(Tile::Wall));
        assert_eq!(grid.tile(Position::new(1, 1)), Some(Tile::Empty));
        assert_eq!(grid.tile(Position::new(4, 2)), Some(Tile::Empty));

        let walls = grid.cells().filter(|(_, tile)| *tile == Tile::Wall).count();
        assert_eq!(walls, 2 * 6 + 2 * 2);
    }

    #[test]
    fn outside_positions_are_blocked() {
        let grid = Grid::generate(SIZE, Topology::Open);

        assert_eq!(grid.tile(Position::new(-1, 0)), None);
        assert_eq!(grid.tile(Position::new(6, 0)), None);
        assert!(grid.is_blocked(Position::new(0, 4)));
        assert!(!grid.is_blocked(Position::new(0, 3)));
    }

    #[test]
    fn at_most_one_food_tile() {
        let mut grid = Grid::generate(SIZE, Topology::Open);
        let snake = Snake::new(Position::new(1, 1), Direction::Right, 1);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let food = grid.place_food(&mut rng, &snake).expect("board has room");
            let food_tiles = grid.cells().filter(|(_, tile)| *tile == Tile::Food).count();
            assert_eq!(food_tiles, 1);
            assert_eq!(grid.food(), Some(food));
        }

        grid.clear_food();
        assert_eq!(grid.food(), None);
        assert!(grid.cells().all(|(_, tile)| tile == Tile::Empty));
    }

    #[test]
    fn set_food_rejects_walls_and_outside() {
        let mut grid = Grid::generate(SIZE, Topology::Walled);
        grid.set_food(Position::new(2, 2)).expect("empty tile");

        assert_eq!(
            grid.set_food(Position::new(0, 1)),
            Err(GameError::FoodBlocked { x: 0, y: 1 })
        );
        assert!(grid.set_food(Position::new(9, 9)).is_err());
        // A rejected request leaves the existing food alone.
        assert_eq!(grid.food(), Some(Position::new(2, 2)));
        assert_eq!(grid.tile(Position::new(2, 2)), Some(Tile::Food));

        grid.set_food(Position::new(2, 2)).expect("same tile again");
        grid.set_food(Position::new(3, 1)).expect("moves the food");
        assert_eq!(grid.tile(Position::new(2, 2)), Some(Tile::Empty));
        assert_eq!(grid.food(), Some(Position::new(3, 1)));
    }
}
