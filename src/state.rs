use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;

use crate::board::{Board, Cell, Grid, Occupant};
use crate::config::SpeedRamp;
use crate::pickup::{self, Pickup};
use crate::snake::{Direction, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    /// The player asked to turn straight back into the body.
    Reversal,
    Collision,
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HeadingChange {
    Accepted,
    Reversal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate { value: u8 },
    Crashed,
    /// The game had already ended; nothing happened.
    Finished,
}

pub struct GameState {
    grid: Grid,
    snake: Snake,
    heading: Direction,
    pickup: Option<Pickup>,
    pending_growth: u32,
    score: u32,
    speed: SpeedRamp,
    tick_interval: Duration,
    reason: Option<GameOverReason>,
    rng: StdRng,
}

impl GameState {
    pub fn new(board: Board, speed: SpeedRamp, mut rng: StdRng, now: Instant) -> Self {
        let heading = Direction::random(&mut rng);
        let snake = Snake::new(board.seed_head(), heading);
        let mut grid = Grid::new(board);

        for cell in snake.iter() {
            grid.set(*cell, Occupant::Body);
        }

        let mut state = GameState {
            grid,
            score: snake.len() as u32,
            snake,
            heading,
            pickup: None,
            pending_growth: 0,
            speed,
            tick_interval: speed.initial_interval(board.term_cols()),
            reason: None,
            rng,
        };

        info!("new game on a {}x{} pit heading {:?}, {} points to win",
              board.playable_rows(), board.playable_cols(), heading, board.win_threshold());
        state.spawn_pickup(now);
        state
    }

    /// A reversal ends the game on the spot and leaves the heading untouched.
    pub fn set_heading(&mut self, requested: Direction) -> HeadingChange {
        if requested.is_reversal_of(self.heading) {
            info!("reversal from {:?} to {:?}", self.heading, requested);
            self.end(GameOverReason::Reversal);
            return HeadingChange::Reversal;
        }

        self.heading = requested;
        HeadingChange::Accepted
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.is_over() {
            return TickOutcome::Finished;
        }

        let next = self.snake.head().step(self.heading);
        let target = next.map_or(Occupant::Wall, |cell| self.grid.occupant_at(cell));

        let outcome = match (next, target) {
            (Some(next), Occupant::Empty) => {
                self.advance(next);
                TickOutcome::Moved
            }
            (Some(next), Occupant::Pickup(value)) => {
                debug!("ate a {} at {:?}", value, next);
                self.pickup = None;
                self.pending_growth += value as u32;
                self.score += value as u32;
                self.advance(next);
                TickOutcome::Ate { value }
            }
            (next, _) => {
                info!("crashed into {:?} at {:?}", target, next);
                self.end(GameOverReason::Collision);
                self.erase_tail();
                if let Some(next) = next {
                    self.draw_head(next);
                }
                TickOutcome::Crashed
            }
        };

        self.expire_pickup(now);
        if self.pickup.is_none() {
            self.spawn_pickup(now);
        }

        if self.score >= self.grid.board().win_threshold() {
            info!("won with {} points", self.score);
            self.end(GameOverReason::Won);
        }

        outcome
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    #[cfg(test)]
    pub fn pickup(&self) -> Option<&Pickup> {
        self.pickup.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Body length plus growth still owed from eaten pickups.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn is_over(&self) -> bool {
        self.reason.is_some()
    }

    pub fn has_won(&self) -> bool {
        self.reason == Some(GameOverReason::Won)
    }

    pub fn reason(&self) -> Option<GameOverReason> {
        self.reason
    }

    /// Swaps the live pickup for `pickup`, clearing the old one off the grid.
    pub fn replace_pickup(&mut self, pickup: Option<Pickup>) {
        if let Some(old) = self.pickup.take() {
            if self.grid.occupant_at(old.cell()) == old.occupant() {
                self.grid.set(old.cell(), Occupant::Empty);
            }
        }

        if let Some(new) = pickup {
            self.grid.set(new.cell(), new.occupant());
        }
        self.pickup = pickup;
    }

    ///////////////////////////////////////////////////////////////////////////

    fn advance(&mut self, next: Cell) {
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
            self.tick_interval = self.speed.speed_up(self.tick_interval);
            debug!("growing, {} to go, interval now {:?}", self.pending_growth, self.tick_interval);
        } else {
            self.erase_tail();
        }

        self.draw_head(next);
    }

    fn erase_tail(&mut self) {
        let tail = self.snake.pop_tail();
        self.grid.set(tail, Occupant::Empty);
    }

    fn draw_head(&mut self, cell: Cell) {
        self.snake.push_head(cell);
        self.grid.set(cell, Occupant::Body);
    }

    fn expire_pickup(&mut self, now: Instant) {
        let expired = match &self.pickup {
            Some(p) => p.is_expired(now),
            None => false,
        };

        if expired {
            debug!("pickup at {:?} expired", self.pickup.map(|p| p.cell()));
            self.replace_pickup(None);
        }
    }

    fn spawn_pickup(&mut self, now: Instant) {
        match pickup::find_empty_cell(&self.grid, &mut self.rng) {
            Some(cell) => {
                let p = Pickup::random(cell, &mut self.rng, now);
                debug!("spawned a {} at {:?} for {:?}", p.value(), cell, p.lifespan());
                self.replace_pickup(Some(p));
            }
            None => debug!("no room for a pickup"),
        }
    }

    fn end(&mut self, reason: GameOverReason) {
        if self.reason.is_none() {
            self.reason = Some(reason);
        }
    }
}
