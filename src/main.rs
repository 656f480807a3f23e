use std::panic;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use tile_snake::config::{GameConfig, config_path, log_path};
use tile_snake::controller::GameController;
use tile_snake::error::AppError;
use tile_snake::grid::Topology;
use tile_snake::input::{GameInput, InputHandler};
use tile_snake::logging;
use tile_snake::renderer::{self, RenderInfo};
use tile_snake::terminal_runtime::{TerminalSession, cleanup_terminal_best_effort};

/// Upper bound on time between redraws.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Board width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Board edge: hard boundary or a ring of wall tiles.
    #[arg(long, value_enum)]
    topology: Option<Topology>,

    /// Segments the snake starts with.
    #[arg(long)]
    initial_length: Option<usize>,

    /// Seed for reproducible food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (defaults to the platform data directory).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn load_config(&self) -> Result<GameConfig, AppError> {
        let path = self.config.clone().unwrap_or_else(config_path);
        let mut config = GameConfig::load(&path)?;

        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(topology) = self.topology {
            config.topology = topology;
        }
        if let Some(initial_length) = self.initial_length {
            config.initial_length = initial_length;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    let log_file = cli.log_file.clone().unwrap_or_else(log_path);
    logging::init(&log_file)?;
    log::info!("starting with {config:?}");

    install_panic_hook();
    run(config)
}

fn run(config: GameConfig) -> Result<(), AppError> {
    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();
    let mut controller = GameController::new(config);
    let started = Instant::now();

    loop {
        let now = Instant::now();
        // Faults are logged by the controller and shown on the game-over screen.
        let _ = controller.update(now);

        let info = RenderInfo {
            elapsed: now.duration_since(started),
        };
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, controller.snapshot(), info))?;

        let timeout = controller
            .time_until_tick(Instant::now())
            .map_or(FRAME_INTERVAL, |until_tick| until_tick.min(FRAME_INTERVAL));

        if let Some(game_input) = input.poll_input(timeout)? {
            if game_input == GameInput::Quit {
                break;
            }
            let _ = controller.handle_input(game_input, Instant::now());
        }
    }

    log::info!("quitting");
    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal_best_effort();
        log::error!("panic: {panic_info}");
        default_hook(panic_info);
    }));
}
