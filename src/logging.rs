use std::fs::{self, OpenOptions};
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::error::AppError;

/// Routes `log` output to `path`, appending.
///
/// The terminal is owned by the UI, so nothing is written to stdout or
/// stderr. The filter comes from `RUST_LOG`, defaulting to `info`.
pub fn init(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(|error| AppError::Logger(error.to_string()))
}
