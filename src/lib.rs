//! Tile-grid Snake: simulation core plus a ratatui front end.

pub mod config;
pub mod controller;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod scheduler;
pub mod snake;
pub mod sprites;
pub mod terminal_runtime;
pub mod ui;
