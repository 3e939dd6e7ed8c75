use crate::error::{Result, SnakeError};
use crate::snake::Direction::{self, *};
use crate::TermInt;

/// Smallest terminal that still fits the frame plus a seeded snake in any heading.
pub const MIN_ROWS: TermInt = 8;
pub const MIN_COLS: TermInt = 12;

pub const EMPTY_CHAR: char = ' ';
pub const BODY_CHAR: char = '@';
pub const WALL_CHAR: char = '#';

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: TermInt,
    pub col: TermInt,
}

impl Cell {
    pub fn new(row: TermInt, col: TermInt) -> Self {
        Cell { row, col }
    }

    /// The neighbouring cell in `direction`, or `None` past the top/left edge.
    pub fn step(self, direction: Direction) -> Option<Cell> {
        let Cell { row, col } = self;

        let (row, col) = match direction {
            Up => (row.checked_sub(1)?, col),
            Down => (row.checked_add(1)?, col),
            Left => (row, col.checked_sub(1)?),
            Right => (row, col.checked_add(1)?),
        };

        Some(Cell { row, col })
    }
}

/// Dimensions of the snake pit, derived once from the terminal size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    term_rows: TermInt,
    term_cols: TermInt,
}

impl Board {
    pub fn new(term_rows: TermInt, term_cols: TermInt) -> Result<Self> {
        let board = Board { term_rows, term_cols };

        if term_rows < MIN_ROWS || term_cols < MIN_COLS
            || board.playable_rows() == 0 || board.playable_cols() == 0 {
            return Err(SnakeError::TerminalTooSmall {
                rows: term_rows,
                cols: term_cols,
                min_rows: MIN_ROWS,
                min_cols: MIN_COLS,
            });
        }

        Ok(board)
    }

    pub fn term_rows(&self) -> TermInt {
        self.term_rows
    }

    pub fn term_cols(&self) -> TermInt {
        self.term_cols
    }

    pub fn playable_rows(&self) -> TermInt {
        self.term_rows.saturating_sub(1)
    }

    pub fn playable_cols(&self) -> TermInt {
        self.term_cols.saturating_sub(2)
    }

    /// Half the perimeter: the score needed to win.
    pub fn win_threshold(&self) -> u32 {
        self.term_rows as u32 + self.term_cols as u32 - 3
    }

    pub fn seed_head(&self) -> Cell {
        Cell::new(self.playable_rows() / 2, self.playable_cols() / 2 - 2)
    }

    pub fn is_interior(&self, cell: Cell) -> bool {
        cell.row >= 1 && cell.row + 2 <= self.term_rows
            && cell.col >= 1 && cell.col + 2 <= self.term_cols
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.term_rows && cell.col < self.term_cols
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Occupant {
    Empty,
    Body,
    Pickup(u8),
    Wall,
}

impl Occupant {
    pub fn symbol(self) -> char {
        match self {
            Occupant::Empty => EMPTY_CHAR,
            Occupant::Body => BODY_CHAR,
            Occupant::Pickup(value) => (b'0' + value) as char,
            Occupant::Wall => WALL_CHAR,
        }
    }
}

/// In-memory mirror of everything drawn on the board. Gameplay reads occupancy
/// from here; the terminal only ever replays the recorded changes.
pub struct Grid {
    board: Board,
    cells: Vec<Occupant>,
    changes: Vec<Cell>,
}

impl Grid {
    pub fn new(board: Board) -> Self {
        let size = board.term_rows() as usize * board.term_cols() as usize;
        let mut grid = Grid { board, cells: vec![Occupant::Empty; size], changes: vec![] };

        for row in 0..board.term_rows() {
            for col in 0..board.term_cols() {
                let cell = Cell::new(row, col);
                if !board.is_interior(cell) {
                    grid.set(cell, Occupant::Wall);
                }
            }
        }

        grid
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn occupant_at(&self, cell: Cell) -> Occupant {
        match self.index(cell) {
            Some(i) => self.cells[i],
            None => Occupant::Wall,
        }
    }

    pub fn char_at(&self, cell: Cell) -> char {
        self.occupant_at(cell).symbol()
    }

    pub fn is_empty(&self, cell: Cell) -> bool {
        self.occupant_at(cell) == Occupant::Empty
    }

    /// Writes are ignored outside the terminal area.
    pub fn set(&mut self, cell: Cell, occupant: Occupant) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = occupant;
            self.changes.push(cell);
        }
    }

    pub fn drain_changes(&mut self) -> Vec<Cell> {
        std::mem::take(&mut self.changes)
    }

    pub fn empty_cells(&self) -> Vec<Cell> {
        let cols = self.board.term_cols() as usize;

        self.cells.iter().enumerate()
            .filter(|(_, occ)| **occ == Occupant::Empty)
            .map(|(i, _)| Cell::new((i / cols) as TermInt, (i % cols) as TermInt))
            .collect()
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if self.board.contains(cell) {
            Some(self.board.term_cols() as usize * cell.row as usize + cell.col as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_for_a_20x20_terminal() {
        let board = Board::new(20, 20).unwrap();
        assert_eq!(board.playable_rows(), 19);
        assert_eq!(board.playable_cols(), 18);
        assert_eq!(board.win_threshold(), 37);
        assert_eq!(board.seed_head(), Cell::new(9, 7));
    }

    #[test]
    fn degenerate_terminals_are_rejected() {
        for (rows, cols) in [(0, 0), (1, 80), (24, 2), (7, 80), (24, 11)].iter() {
            match Board::new(*rows, *cols) {
                Err(SnakeError::TerminalTooSmall { rows: r, cols: c, .. }) => {
                    assert_eq!((r, c), (*rows, *cols));
                }
                other => panic!("expected TerminalTooSmall, got {:?}", other.map(|_| ())),
            }
        }
        assert!(Board::new(MIN_ROWS, MIN_COLS).is_ok());
    }

    #[test]
    fn frame_reads_as_wall_and_interior_as_empty() {
        let board = Board::new(10, 15).unwrap();
        let grid = Grid::new(board);

        assert_eq!(grid.occupant_at(Cell::new(0, 5)), Occupant::Wall);
        assert_eq!(grid.occupant_at(Cell::new(9, 5)), Occupant::Wall);
        assert_eq!(grid.occupant_at(Cell::new(4, 0)), Occupant::Wall);
        assert_eq!(grid.occupant_at(Cell::new(4, 14)), Occupant::Wall);
        assert_eq!(grid.occupant_at(Cell::new(40, 40)), Occupant::Wall);
        assert_eq!(grid.char_at(Cell::new(4, 4)), ' ');
        assert_eq!(grid.empty_cells().len(), 8 * 13);
    }

    #[test]
    fn symbols_match_the_rendered_surface() {
        let mut grid = Grid::new(Board::new(10, 15).unwrap());
        grid.set(Cell::new(2, 2), Occupant::Body);
        grid.set(Cell::new(3, 3), Occupant::Pickup(7));

        assert_eq!(grid.char_at(Cell::new(2, 2)), '@');
        assert_eq!(grid.char_at(Cell::new(3, 3)), '7');
        assert_eq!(grid.char_at(Cell::new(4, 4)), ' ');
    }

    #[test]
    fn changes_are_drained_in_write_order() {
        let mut grid = Grid::new(Board::new(10, 15).unwrap());
        grid.drain_changes();

        grid.set(Cell::new(2, 2), Occupant::Body);
        grid.set(Cell::new(1, 1), Occupant::Pickup(3));
        grid.set(Cell::new(2, 2), Occupant::Empty);

        assert_eq!(grid.drain_changes(), vec![Cell::new(2, 2), Cell::new(1, 1), Cell::new(2, 2)]);
        assert!(grid.drain_changes().is_empty());
    }

    #[test]
    fn stepping_off_the_origin_is_none() {
        let origin = Cell::new(0, 0);
        assert_eq!(origin.step(Up), None);
        assert_eq!(origin.step(Left), None);
        assert_eq!(origin.step(Down), Some(Cell::new(1, 0)));
        assert_eq!(origin.step(Right), Some(Cell::new(0, 1)));
    }
}
