use std::collections::HashSet;

use tile_snake::config::GameConfig;
use tile_snake::game::GameState;
use tile_snake::input::Direction;
use tile_snake::snake::{Position, Snake};
use tile_snake::sprites::{Sprite, classify};

#[test]
fn bent_snake_maps_to_distinct_atlas_cells() {
    let mut state = GameState::new_with_seed(GameConfig::open(8, 8), 5);
    state.start_game().expect("start");
    state.snake = Snake::from_segments(
        vec![
            Position::new(3, 2),
            Position::new(3, 3),
            Position::new(2, 3),
            Position::new(1, 3),
        ],
        Direction::Up,
    );

    let snapshot = state.snapshot();
    let sprites = classify(&snapshot.segments, snapshot.direction);

    assert_eq!(sprites.first(), Some(&Sprite::HeadUp));
    assert_eq!(sprites.last(), Some(&Sprite::TailRight));
    assert_eq!(sprites.first().map(|sprite| sprite.sheet_cell()), Some((3, 0)));

    let cells: HashSet<(u8, u8)> = sprites.iter().map(|sprite| sprite.sheet_cell()).collect();
    assert_eq!(cells.len(), sprites.len());
    assert!(cells.iter().all(|&(column, row)| column < 5 && row < 4));
}
