//! Pieces module - the falling domino and its rotation/kick rules
//!
//! A piece is two cells described by an anchor cell plus an orientation:
//!
//! - **Horizontal**: the anchor is the left cell, the partner sits at `col + 1`
//! - **Vertical**: the anchor is the bottom cell, the partner sits at `row - 1`
//!
//! Rotation keeps the anchor in place and swings the partner to the position
//! implied by the other orientation, then tries a short list of kicks.

use crate::types::{DominoId, Orientation, Seam, Tile, SPAWN_COL, SPAWN_ROW};

/// One cell of the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceCell {
    pub row: i8,
    pub col: i8,
    pub pip: u8,
}

/// Kick offsets `(d_row, d_col)` tried in order when rotating:
/// in place, one column left, one column right, one row down.
pub const ROTATION_KICKS: [(i8, i8); 4] = [(0, 0), (0, -1), (0, 1), (1, 0)];

/// Offset from the anchor cell to the partner cell
pub fn partner_offset(orientation: Orientation) -> (i8, i8) {
    match orientation {
        Orientation::Horizontal => (0, 1),
        Orientation::Vertical => (-1, 0),
    }
}

/// Active falling domino
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    id: DominoId,
    orientation: Orientation,
    row: i8,
    col: i8,
    anchor_pip: u8,
    partner_pip: u8,
}

impl Piece {
    /// Place a tile horizontally at the spawn cells, lower pip on the left
    pub fn spawn(tile: Tile, id: DominoId) -> Self {
        Self {
            id,
            orientation: Orientation::Horizontal,
            row: SPAWN_ROW,
            col: SPAWN_COL,
            anchor_pip: tile.low(),
            partner_pip: tile.high(),
        }
    }

    pub fn id(&self) -> DominoId {
        self.id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Anchor position `(row, col)`
    pub fn anchor(&self) -> (i8, i8) {
        (self.row, self.col)
    }

    /// Both cells, anchor first
    pub fn cells(&self) -> [PieceCell; 2] {
        let (dr, dc) = partner_offset(self.orientation);
        [
            PieceCell {
                row: self.row,
                col: self.col,
                pip: self.anchor_pip,
            },
            PieceCell {
                row: self.row + dr,
                col: self.col + dc,
                pip: self.partner_pip,
            },
        ]
    }

    /// Seams matching `cells()`: each cell faces the other
    pub fn seams(&self) -> [Seam; 2] {
        match self.orientation {
            Orientation::Horizontal => [Seam::Right, Seam::Left],
            Orientation::Vertical => [Seam::Top, Seam::Bottom],
        }
    }

    /// The cell of this piece at `(row, col)`, with its seam
    pub fn cell_at(&self, row: i8, col: i8) -> Option<(PieceCell, Seam)> {
        self.cells()
            .into_iter()
            .zip(self.seams())
            .find(|(c, _)| c.row == row && c.col == col)
    }

    /// Every cell passes `is_vacant`
    pub fn fits(&self, is_vacant: impl Fn(i8, i8) -> bool) -> bool {
        self.cells().iter().all(|c| is_vacant(c.row, c.col))
    }

    /// Copy shifted by `(d_row, d_col)`
    pub fn translated(&self, d_row: i8, d_col: i8) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
            ..*self
        }
    }

    /// Copy in the other orientation around the same anchor, before kicks
    pub fn rotated(&self) -> Self {
        Self {
            orientation: self.orientation.toggled(),
            ..*self
        }
    }
}

/// Try to rotate a piece with kicks.
///
/// Returns the committed piece and the kick that was used, or `None` when no
/// kick position fits (the caller leaves its piece unchanged).
pub fn try_rotate(piece: &Piece, is_vacant: impl Fn(i8, i8) -> bool) -> Option<(Piece, (i8, i8))> {
    let rotated = piece.rotated();
    ROTATION_KICKS.iter().find_map(|&(dr, dc)| {
        let candidate = rotated.translated(dr, dc);
        candidate.fits(&is_vacant).then_some((candidate, (dr, dc)))
    })
}

/// Try to translate a piece; `None` if any resulting cell is blocked
pub fn try_move(
    piece: &Piece,
    d_row: i8,
    d_col: i8,
    is_vacant: impl Fn(i8, i8) -> bool,
) -> Option<Piece> {
    let moved = piece.translated(d_row, d_col);
    moved.fits(is_vacant).then_some(moved)
}
