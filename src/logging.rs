/// File-backed logging.
///
/// The terminal is in raw alternate-screen mode while the game runs, so
/// nothing may be written to stdout/stderr. Log records go to the file
/// named by `general.log_file` in config.toml; without one, no logger is
/// installed and the `log` macros are no-ops.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use log::LevelFilter;

/// Install env_logger writing to `path`. Appends, creating it if needed.
pub fn init(path: &Path, level: LevelFilter) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::new()
        .filter_level(level)
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}
