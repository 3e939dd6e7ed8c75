use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnakeError {
    #[error("terminal is too small ({rows}x{cols}), need at least {min_rows}x{min_cols}")]
    TerminalTooSmall { rows: u16, cols: u16, min_rows: u16, min_cols: u16 },

    #[error("terminal error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("could not start logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SnakeError>;
