//! Render snapshot - everything a view needs, copied out of the session
//!
//! The cell grid is a pure function of the board and the active piece
//! ([`overlay_cells`]); the piece is overlaid without touching the board.

use std::fmt;

use crate::board::Board;
use crate::pieces::Piece;
use crate::types::{EndReason, Mode, Seam, BOARD_HEIGHT, BOARD_WIDTH, MAX_ROWS_PER_LOCK};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// One cell as the view sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellView {
    pub occupied: bool,
    pub pip: Option<u8>,
    /// Belongs to the falling piece
    pub active: bool,
    pub seam: Seam,
}

/// A row held in the flash phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlashRow {
    pub row: u8,
    pub five_multiple: bool,
}

/// Status line shown by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Message {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver(EndReason),
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Idle => f.write_str("Press E (easy) or H (hard) to start"),
            Message::Running => f.write_str("Game running"),
            Message::Paused => f.write_str("Paused"),
            Message::GameOver(reason) => write!(f, "Game Over: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderState {
    pub cells: [[CellView; WIDTH]; HEIGHT],
    /// Pip totals of locked cells per row; `None` when the mode hides them.
    pub row_sums: Option<[u16; HEIGHT]>,
    pub flash: [Option<FlashRow>; MAX_ROWS_PER_LOCK],
    pub score: u32,
    pub lives: i32,
    pub streak_active: bool,
    pub rows_cleared: u32,
    pub drop_interval_ms: u32,
    pub mode: Option<Mode>,
    pub message: Message,
    pub running: bool,
    pub paused: bool,
    pub game_over: bool,
    pub session_id: u32,
}

impl RenderState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Multiplier the next single qualifying row would get
    pub fn multiplier_label(&self) -> &'static str {
        if self.streak_active {
            "×2"
        } else {
            "×1"
        }
    }

    pub fn streak_label(&self) -> &'static str {
        if self.streak_active {
            "ON"
        } else {
            "OFF"
        }
    }

    /// Flash tag for a row: `Some(five_multiple)` while it is held
    pub fn flash_for(&self, row: usize) -> Option<bool> {
        self.flash
            .iter()
            .flatten()
            .find(|f| f.row as usize == row)
            .map(|f| f.five_multiple)
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            cells: [[CellView::default(); WIDTH]; HEIGHT],
            row_sums: None,
            flash: [None; MAX_ROWS_PER_LOCK],
            score: 0,
            lives: 0,
            streak_active: false,
            rows_cleared: 0,
            drop_interval_ms: 0,
            mode: None,
            message: Message::Idle,
            running: false,
            paused: false,
            game_over: false,
            session_id: 0,
        }
    }
}

/// Board cells with the active piece laid on top
pub fn overlay_cells(board: &Board, piece: Option<&Piece>) -> [[CellView; WIDTH]; HEIGHT] {
    let mut out = [[CellView::default(); WIDTH]; HEIGHT];

    for (row, cols) in out.iter_mut().enumerate() {
        for (col, view) in cols.iter_mut().enumerate() {
            if let Some(Some(cell)) = board.get(row as i8, col as i8) {
                *view = CellView {
                    occupied: true,
                    pip: Some(cell.pip),
                    active: false,
                    seam: cell.seam,
                };
            }
        }
    }

    if let Some(piece) = piece {
        for (cell, seam) in piece.cells().into_iter().zip(piece.seams()) {
            if cell.row < 0 || cell.col < 0 {
                continue;
            }
            if let Some(view) = out
                .get_mut(cell.row as usize)
                .and_then(|cols| cols.get_mut(cell.col as usize))
            {
                *view = CellView {
                    occupied: true,
                    pip: Some(cell.pip),
                    active: true,
                    seam,
                };
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DominoId, Tile};

    #[test]
    fn test_overlay_marks_active_cells_without_touching_board() {
        let board = Board::new();
        let before = board.clone();
        let piece = Piece::spawn(Tile::new(3, 1), DominoId(7));

        let cells = overlay_cells(&board, Some(&piece));

        assert_eq!(board, before);
        assert_eq!(
            cells[0][3],
            CellView {
                occupied: true,
                pip: Some(1),
                active: true,
                seam: Seam::Right
            }
        );
        assert_eq!(cells[0][4].seam, Seam::Left);
        assert_eq!(cells[0][4].pip, Some(3));
        assert!(!cells[1][3].occupied);
    }

    #[test]
    fn test_overlay_shows_locked_cells() {
        let mut bottom = [None; WIDTH];
        bottom[6] = Some((2, 1));
        bottom[7] = Some((5, 1));
        let board = Board::from_bottom_rows(&[bottom]);

        let cells = overlay_cells(&board, None);
        assert_eq!(cells[15][6].pip, Some(2));
        assert!(!cells[15][6].active);
        assert_eq!(cells[15][7].seam, Seam::Left);
    }

    #[test]
    fn test_message_text() {
        assert_eq!(Message::Running.to_string(), "Game running");
        assert_eq!(
            Message::GameOver(EndReason::LivesExhausted).to_string(),
            "Game Over: Lives below 0"
        );
    }

    #[test]
    fn test_hud_labels_follow_streak() {
        let mut s = RenderState::default();
        assert_eq!((s.streak_label(), s.multiplier_label()), ("OFF", "×1"));
        s.streak_active = true;
        assert_eq!((s.streak_label(), s.multiplier_label()), ("ON", "×2"));
    }
}
