//! Board module - manages the locked domino grid
//!
//! The board is an 8x16 grid where each cell is either empty or holds one half
//! of a placed domino. Uses a flat array for cache locality and zero allocation.
//! Coordinates are `(row, col)`: row 0..15 top to bottom, col 0..7 left to right.
//!
//! The falling piece is never stored here; it only becomes board state on lock.

use std::collections::HashMap;
use std::fmt;

use arrayvec::ArrayVec;

use crate::pieces::Piece;
use crate::types::{DominoId, Seam, BOARD_HEIGHT, BOARD_WIDTH, MAX_ROWS_PER_LOCK};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// One half of a placed domino.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockedCell {
    pub pip: u8,
    pub domino: DominoId,
    pub seam: Seam,
}

/// A board cell: `None` when empty.
pub type Cell = Option<LockedCell>;

/// The seam invariant was broken: a domino's cells are not a facing pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeamViolation {
    pub domino: DominoId,
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for SeamViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "domino {} has a cell at ({}, {}) without a facing partner",
            self.domino.0, self.row, self.col
        )
    }
}

impl std::error::Error for SeamViolation {}

/// The game board - 8 columns x 16 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(row: i8, col: i8) -> Option<usize> {
        if row < 0 || row >= BOARD_HEIGHT as i8 || col < 0 || col >= BOARD_WIDTH as i8 {
            return None;
        }
        Some((row as usize) * WIDTH + (col as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at `(row, col)`, `None` if out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at `(row, col)`. Returns false if out of bounds
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_vacant(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// In bounds and taken
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    fn row_slice(&self, row: usize) -> &[Cell] {
        &self.cells[row * WIDTH..(row + 1) * WIDTH]
    }

    /// Every column of the row is taken
    pub fn is_row_full(&self, row: usize) -> bool {
        row < HEIGHT && self.row_slice(row).iter().all(Option::is_some)
    }

    /// No column of the row is taken
    pub fn is_row_empty(&self, row: usize) -> bool {
        row >= HEIGHT || self.row_slice(row).iter().all(Option::is_none)
    }

    /// Total pips of the locked cells in a row
    pub fn row_sum(&self, row: usize) -> u16 {
        if row >= HEIGHT {
            return 0;
        }
        self.row_slice(row)
            .iter()
            .flatten()
            .map(|c| c.pip as u16)
            .sum()
    }

    pub fn row_sums(&self) -> [u16; HEIGHT] {
        let mut sums = [0u16; HEIGHT];
        for (row, sum) in sums.iter_mut().enumerate() {
            *sum = self.row_sum(row);
        }
        sums
    }

    /// Full rows, topmost first, capped at `MAX_ROWS_PER_LOCK`.
    ///
    /// Rows beyond the cap stay on the board until a later lock finds them.
    pub fn full_rows(&self) -> ArrayVec<usize, MAX_ROWS_PER_LOCK> {
        let mut rows = ArrayVec::new();
        for row in 0..HEIGHT {
            if self.is_row_full(row) {
                rows.push(row);
                if rows.is_full() {
                    break;
                }
            }
        }
        rows
    }

    /// Reset every cell of a row to empty
    pub fn clear_row(&mut self, row: usize) {
        if row < HEIGHT {
            self.cells[row * WIDTH..(row + 1) * WIDTH].fill(None);
        }
    }

    /// Pack all non-empty rows to the bottom, keeping their order.
    ///
    /// Two-pointer pass from the bottom with no allocation. Returns how many
    /// rows moved.
    pub fn collapse_rows(&mut self) -> usize {
        let mut write_row = HEIGHT;
        let mut moved = 0;

        for read_row in (0..HEIGHT).rev() {
            if self.is_row_empty(read_row) {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                moved += 1;
                self.cells
                    .copy_within(read_row * WIDTH..(read_row + 1) * WIDTH, write_row * WIDTH);
            }
        }

        self.cells[..write_row * WIDTH].fill(None);
        moved
    }

    /// Write the active piece's cells into the grid.
    ///
    /// Returns false (and writes nothing) if any target cell is out of bounds
    /// or already taken.
    pub fn lock_piece(&mut self, piece: &Piece) -> bool {
        let cells = piece.cells();
        if !cells.iter().all(|c| self.is_vacant(c.row, c.col)) {
            return false;
        }

        let seams = piece.seams();
        for (c, seam) in cells.iter().zip(seams) {
            self.set(
                c.row,
                c.col,
                Some(LockedCell {
                    pip: c.pip,
                    domino: piece.id(),
                    seam,
                }),
            );
        }
        true
    }

    /// Rebuild seams from domino identity after rows have moved.
    ///
    /// Each cell is only compared with its right and lower neighbour, so every
    /// adjacent pair of same-domino cells is visited exactly once.
    pub fn recompute_seams(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.seam = Seam::None;
        }

        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                let idx = row * WIDTH + col;
                let Some(current) = self.cells[idx] else {
                    continue;
                };

                if col + 1 < WIDTH {
                    let right = idx + 1;
                    if matches!(self.cells[right], Some(c) if c.domino == current.domino) {
                        self.set_seam(idx, Seam::Right);
                        self.set_seam(right, Seam::Left);
                    }
                }

                if row + 1 < HEIGHT {
                    let below = idx + WIDTH;
                    if matches!(self.cells[below], Some(c) if c.domino == current.domino) {
                        self.set_seam(idx, Seam::Bottom);
                        self.set_seam(below, Seam::Top);
                    }
                }
            }
        }
    }

    fn set_seam(&mut self, idx: usize, seam: Seam) {
        if let Some(cell) = self.cells[idx].as_mut() {
            cell.seam = seam;
        }
    }

    /// Verify that every domino is either a single cell with no seam or two
    /// adjacent cells whose seams face each other.
    pub fn check_seams(&self) -> Result<(), SeamViolation> {
        let mut seen: HashMap<DominoId, ArrayVec<(usize, usize), 2>> = HashMap::new();

        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                let Some(cell) = self.cells[row * WIDTH + col] else {
                    continue;
                };
                let violation = SeamViolation {
                    domino: cell.domino,
                    row,
                    col,
                };

                if seen
                    .entry(cell.domino)
                    .or_default()
                    .try_push((row, col))
                    .is_err()
                {
                    return Err(violation);
                }

                if let Some((dr, dc)) = cell.seam.offset() {
                    let partner = self.get(row as i8 + dr, col as i8 + dc).flatten();
                    match partner {
                        Some(p) if p.domino == cell.domino && p.seam == cell.seam.opposite() => {}
                        _ => return Err(violation),
                    }
                }
            }
        }

        for (domino, cells) in seen {
            if let &[(r1, c1), (r2, c2)] = cells.as_slice() {
                let adjacent = r1.abs_diff(r2) + c1.abs_diff(c2) == 1;
                let seamed = self.cells[r1 * WIDTH + c1].is_some_and(|c| c.seam != Seam::None);
                if !adjacent || !seamed {
                    return Err(SeamViolation {
                        domino,
                        row: r2,
                        col: c2,
                    });
                }
            } else if let &[(r, c)] = cells.as_slice() {
                if self.cells[r * WIDTH + c].is_some_and(|cell| cell.seam != Seam::None) {
                    return Err(SeamViolation { domino, row: r, col: c });
                }
            }
        }

        Ok(())
    }

    /// Number of taken cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Build a board from rows of `(pip, domino)` pairs, for tests and tools.
    ///
    /// `rows[0]` is placed on the bottom-most row, `rows[1]` above it, and so
    /// on. Seams are recomputed afterwards.
    pub fn from_bottom_rows(rows: &[[Option<(u8, u32)>; WIDTH]]) -> Self {
        let mut board = Self::new();
        for (i, cols) in rows.iter().enumerate().take(HEIGHT) {
            let row = (HEIGHT - 1 - i) as i8;
            for (col, cell) in cols.iter().enumerate() {
                if let Some((pip, id)) = *cell {
                    board.set(
                        row,
                        col as i8,
                        Some(LockedCell {
                            pip,
                            domino: DominoId(id),
                            seam: Seam::None,
                        }),
                    );
                }
            }
        }
        board.recompute_seams();
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked(pip: u8, id: u32) -> Cell {
        Some(LockedCell {
            pip,
            domino: DominoId(id),
            seam: Seam::None,
        })
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(0, 7), Some(7));
        assert_eq!(Board::index(1, 0), Some(8));
        assert_eq!(Board::index(15, 7), Some(127));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(0, 8), None);
        assert_eq!(Board::index(16, 0), None);
    }

    #[test]
    fn test_full_rows_capped_and_topmost_first() {
        let mut board = Board::new();
        for row in [9usize, 12, 15] {
            for col in 0..WIDTH {
                board.cells[row * WIDTH + col] = locked(1, (row * 10 + col) as u32);
            }
        }
        assert_eq!(board.full_rows().as_slice(), &[9, 12]);
    }

    #[test]
    fn test_collapse_packs_rows_preserving_order() {
        let mut board = Board::new();
        board.cells[3 * WIDTH] = locked(1, 1);
        board.cells[7 * WIDTH + 2] = locked(2, 2);
        board.cells[15 * WIDTH + 5] = locked(3, 3);

        board.collapse_rows();

        assert_eq!(board.get(15, 5), Some(locked(3, 3)));
        assert_eq!(board.get(14, 2), Some(locked(2, 2)));
        assert_eq!(board.get(13, 0), Some(locked(1, 1)));
        assert_eq!(board.occupied_count(), 3);
        for row in 0..13 {
            assert!(board.is_row_empty(row));
        }
    }

    #[test]
    fn test_collapse_of_empty_board_terminates() {
        let mut board = Board::new();
        assert_eq!(board.collapse_rows(), 0);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_recompute_seams_pairs_horizontal_and_vertical() {
        let mut board = Board::new();
        board.cells[15 * WIDTH] = locked(1, 1);
        board.cells[15 * WIDTH + 1] = locked(2, 1);
        board.cells[14 * WIDTH + 4] = locked(3, 2);
        board.cells[15 * WIDTH + 4] = locked(4, 2);

        board.recompute_seams();

        assert_eq!(board.get(15, 0).flatten().unwrap().seam, Seam::Right);
        assert_eq!(board.get(15, 1).flatten().unwrap().seam, Seam::Left);
        assert_eq!(board.get(14, 4).flatten().unwrap().seam, Seam::Bottom);
        assert_eq!(board.get(15, 4).flatten().unwrap().seam, Seam::Top);
        assert_eq!(board.check_seams(), Ok(()));
    }

    #[test]
    fn test_check_seams_flags_split_domino() {
        let mut board = Board::new();
        board.cells[15 * WIDTH] = locked(1, 9);
        board.cells[15 * WIDTH + 3] = locked(2, 9);
        board.recompute_seams();

        let err = board.check_seams().unwrap_err();
        assert_eq!(err.domino, DominoId(9));
    }

    #[test]
    fn test_check_seams_flags_dangling_seam() {
        let mut board = Board::new();
        board.cells[15 * WIDTH] = Some(LockedCell {
            pip: 1,
            domino: DominoId(4),
            seam: Seam::Right,
        });
        assert!(board.check_seams().is_err());
    }

    #[test]
    fn test_from_bottom_rows_places_first_row_at_bottom() {
        let mut bottom = [None; WIDTH];
        bottom[0] = Some((5, 1));
        bottom[1] = Some((6, 1));
        let board = Board::from_bottom_rows(&[bottom]);

        assert_eq!(board.row_sum(15), 11);
        assert_eq!(board.get(15, 0).flatten().unwrap().seam, Seam::Right);
    }
}
