use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::board::{Cell, Grid, Occupant};

pub const MAX_VALUE: u8 = 9;
pub const MAX_LIFESPAN_SECS: u64 = 9;

/// Random cells tried before falling back to scanning the whole grid.
const MAX_SAMPLES: usize = 64;

/// A numbered trophy: worth `value` points and as many segments, gone after `lifespan`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pickup {
    cell: Cell,
    value: u8,
    lifespan: Duration,
    created_at: Instant,
}

impl Pickup {
    pub fn new(cell: Cell, value: u8, lifespan: Duration, created_at: Instant) -> Self {
        debug_assert!((1..=MAX_VALUE).contains(&value));
        Pickup { cell, value, lifespan, created_at }
    }

    pub fn random<R: Rng + ?Sized>(cell: Cell, rng: &mut R, now: Instant) -> Self {
        let value = rng.gen_range(1..=MAX_VALUE);
        let lifespan = Duration::from_secs(rng.gen_range(1..=MAX_LIFESPAN_SECS));
        Pickup::new(cell, value, lifespan, now)
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn lifespan(&self) -> Duration {
        self.lifespan
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.lifespan
    }

    pub fn occupant(&self) -> Occupant {
        Occupant::Pickup(self.value)
    }
}

/// Picks a uniformly random empty interior cell, or `None` if the pit is full.
pub fn find_empty_cell<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Option<Cell> {
    let board = *grid.board();

    for _ in 0..MAX_SAMPLES {
        let cell = Cell::new(
            rng.gen_range(1..board.term_rows() - 1),
            rng.gen_range(1..board.term_cols() - 1),
        );
        if grid.is_empty(cell) {
            return Some(cell);
        }
    }

    grid.empty_cells().choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_pickups_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Instant::now();

        for _ in 0..500 {
            let p = Pickup::random(Cell::new(1, 1), &mut rng, now);
            assert!((1..=9).contains(&p.value()));
            assert!(p.lifespan() >= Duration::from_secs(1));
            assert!(p.lifespan() <= Duration::from_secs(9));
        }
    }

    #[test]
    fn expires_once_lifespan_has_elapsed() {
        let now = Instant::now();
        let p = Pickup::new(Cell::new(1, 1), 5, Duration::from_secs(3), now);

        assert!(!p.is_expired(now));
        assert!(!p.is_expired(now + Duration::from_millis(2999)));
        assert!(p.is_expired(now + Duration::from_secs(3)));
        assert!(p.is_expired(now + Duration::from_secs(10)));
        assert_eq!(p.occupant().symbol(), '5');
    }

    #[test]
    fn empty_cell_search_avoids_occupied_cells() {
        let mut grid = Grid::new(Board::new(8, 12).unwrap());
        let mut rng = StdRng::seed_from_u64(11);

        for cell in grid.empty_cells() {
            if cell != Cell::new(4, 6) {
                grid.set(cell, Occupant::Body);
            }
        }

        assert_eq!(find_empty_cell(&grid, &mut rng), Some(Cell::new(4, 6)));

        grid.set(Cell::new(4, 6), Occupant::Body);
        assert_eq!(find_empty_cell(&grid, &mut rng), None);
    }

    #[test]
    fn empty_cell_search_stays_inside_the_frame() {
        let grid = Grid::new(Board::new(8, 12).unwrap());
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..200 {
            let cell = find_empty_cell(&grid, &mut rng).unwrap();
            assert!(grid.board().is_interior(cell));
        }
    }
}
