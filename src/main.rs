mod board;
mod config;
mod error;
mod game;
mod pickup;
mod snake;
mod state;
mod term;

use std::fs::File;
use std::process::exit;

use log::{error, info};
use simplelog::WriteLogger;

use crate::board::Board;
use crate::config::Config;
use crate::error::Result;
use crate::game::SnakeGame;
use crate::term::InterruptFlag;

pub type TermInt = u16;

fn main() {
    if let Err(err) = run() {
        error!("{}", err);
        eprintln!("snake: {}", err);
        exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to a file, the terminal belongs to the game
    WriteLogger::init(config.log_level, simplelog::Config::default(), File::create(&config.log_file)?)?;
    info!("starting up");

    let (cols, rows) = crossterm::terminal::size()?;
    let board = Board::new(rows, cols)?;

    let interrupt = InterruptFlag::install()?;
    let ending = SnakeGame::new(board, config, interrupt).run()?;
    info!("session ended: {:?}", ending);
    Ok(())
}
