use std::{thread::sleep, time::{Duration, Instant}};

use crossterm::style::Color;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::board::{Board, Occupant};
use crate::config::Config;
use crate::error::Result;
use crate::state::{GameState, HeadingChange};
use crate::term::{Input, InterruptFlag, TermManager};

const REVERSAL_PAUSE: Duration = Duration::from_millis(2000);
const FINAL_FRAME_PAUSE: Duration = Duration::from_millis(700);
const BANNER_PAUSE: Duration = Duration::from_millis(1000);
const SCORE_PAUSE: Duration = Duration::from_millis(1500);
const EXIT_PAUSE: Duration = Duration::from_millis(1300);

/// How a session came to an end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    Won,
    Lost,
    Interrupted,
}

pub struct SnakeGame {
    board: Board,
    config: Config,
    term: TermManager,
}

impl SnakeGame {
    pub fn new(board: Board, config: Config, interrupt: InterruptFlag) -> Self {
        let term = TermManager::new(board.term_cols(), board.term_rows(), interrupt);
        SnakeGame { board, config, term }
    }

    /// Plays one session from the intro screen to a restored terminal.
    pub fn run(&mut self) -> Result<Ending> {
        self.term.setup()?;

        let (ending, score) = match self.show_intro()? {
            true => (Ending::Interrupted, 0),
            false => self.play()?,
        };

        if ending != Ending::Interrupted {
            self.show_ending(ending, score)?;
        }

        self.shutdown()?;
        Ok(ending)
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Returns `true` if the player quit instead of starting.
    fn show_intro(&mut self) -> Result<bool> {
        self.term.clear()?;
        self.term.draw_borders()?;
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Eat the numbers to grow",
            "CTRL+C to quit",
            "",
            "Press any key to begin"
        ])?;

        let quit = self.term.wait_for_key()?;
        self.term.hide_message()?;
        Ok(quit)
    }

    /// Runs the tick loop until the game ends, returning the final score too.
    fn play(&mut self) -> Result<(Ending, u32)> {
        let rng = StdRng::from_entropy();
        let mut state = GameState::new(self.board, self.config.speed, rng, Instant::now());
        self.render(&mut state)?;

        while !state.is_over() {
            let deadline = Instant::now() + state.tick_interval();

            match self.term.read_input(deadline)? {
                Input::Interrupt => {
                    info!("interrupted with a score of {}", state.score());
                    return Ok((Ending::Interrupted, state.score()));
                }
                Input::Direction(dir) => {
                    if state.set_heading(dir) == HeadingChange::Reversal {
                        self.term.show_message(&["Wrong Direction! You ran into yourself."])?;
                        sleep(REVERSAL_PAUSE);
                        break;
                    }
                }
                Input::Timeout => {}
            }

            state.tick(Instant::now());
            self.render(&mut state)?;

            let now = Instant::now();
            if now < deadline {
                sleep(deadline - now);
            }
        }

        info!("game over ({:?}) heading {:?} with a score of {}, {} segments long, {} still to grow",
              state.reason(), state.heading(), state.score(), state.snake().len(), state.pending_growth());
        let ending = if state.has_won() { Ending::Won } else { Ending::Lost };
        Ok((ending, state.score()))
    }

    fn render(&mut self, state: &mut GameState) -> Result<()> {
        for cell in state.grid_mut().drain_changes() {
            match state.grid().occupant_at(cell) {
                // The frame is drawn once by draw_borders
                Occupant::Wall => {}
                _ => self.term.draw_cell(cell, state.grid().char_at(cell))?,
            }
        }

        self.term.flush()
    }

    fn show_ending(&mut self, ending: Ending, score: u32) -> Result<()> {
        sleep(FINAL_FRAME_PAUSE);
        self.term.clear()?;

        let (banner, color) = match ending {
            Ending::Won => ("You Won!", Color::Green),
            _ => ("Game Over", Color::Red),
        };

        self.term.show_banner(&[banner], color)?;
        sleep(BANNER_PAUSE);
        self.term.show_banner(&[&*format!("Score: {}", score)], color)?;
        sleep(SCORE_PAUSE);
        Ok(())
    }

    /// The one way out, for finished and interrupted games alike.
    fn shutdown(&mut self) -> Result<()> {
        self.term.show_message(&["Exiting"])?;
        sleep(EXIT_PAUSE);
        self.term.restore()
    }
}
