use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::board::Cell;
use Direction::*;

pub const INITIAL_SNAKE_LENGTH: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_reversal_of(self, current: Direction) -> bool {
        self == current.opposite()
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        *Direction::ALL.choose(rng).unwrap_or(&Right)
    }
}

/// Body segments in order, tail at the front and head at the back.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Lays out the starting segments from `seed` onwards in `direction`, so the
    /// head ends up furthest along it. Panics if the board edge is in the way.
    pub fn new(seed: Cell, direction: Direction) -> Self {
        let mut body = VecDeque::with_capacity(INITIAL_SNAKE_LENGTH);
        let mut pos = seed;
        body.push_back(pos);

        for _ in 1..INITIAL_SNAKE_LENGTH {
            pos = pos.step(direction).expect("seed leaves room for the starting body");
            body.push_back(pos);
        }

        Snake { body }
    }

    pub fn push_head(&mut self, cell: Cell) {
        self.body.push_back(cell);
    }

    pub fn pop_tail(&mut self) -> Cell {
        self.body.pop_front().expect("popped the tail of an empty snake")
    }

    pub fn head(&self) -> Cell {
        *self.body.back().expect("snake body is never empty")
    }

    #[cfg(test)]
    pub fn tail(&self) -> Cell {
        *self.body.front().expect("snake body is never empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
