//! Lock & resolution pipeline
//!
//! Per lock: merge the piece, scan for full rows, score them, hold a short
//! flash, clear, collapse and rebuild seams. The flash is the only suspension
//! point; it is modelled as a countdown that the session feeds with elapsed
//! time (or finishes at once in headless use). While a resolution is in flight
//! the pipeline is busy: no new lock may start and gravity is inert.

use std::fmt;

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::scoring::RowTally;
use crate::types::{FLASH_MS, MAX_ROWS_PER_LOCK};

/// Rows processed by one lock (at most two, topmost first)
pub type ProcessedRows = ArrayVec<RowTally, MAX_ROWS_PER_LOCK>;

/// Observational summary of a scored lock, for score popups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub score_gain: u32,
    pub lives_delta: i32,
    pub streak_active: bool,
}

impl Feedback {
    /// Anything gained (score or lives)
    pub fn is_good(&self) -> bool {
        self.score_gain > 0 || self.lives_delta > 0
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.lives_delta >= 0 { "+" } else { "" };
        write!(
            f,
            "+{} · Lives {}{}",
            self.score_gain, sign, self.lives_delta
        )?;
        if self.streak_active {
            f.write_str(" ×2 ACTIVE")?;
        }
        Ok(())
    }
}

/// Where a resolution currently is
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Stage {
    /// No resolution in flight
    #[default]
    Idle,
    /// Rows are scored and held on screen before removal
    Flashing {
        rows: ProcessedRows,
        remaining_ms: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockPipeline {
    stage: Stage,
}

impl LockPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolution is suspended mid-flight
    pub fn is_busy(&self) -> bool {
        !matches!(self.stage, Stage::Idle)
    }

    /// Full rows to process for this lock, with their sums
    pub fn scan(board: &Board) -> ProcessedRows {
        board
            .full_rows()
            .into_iter()
            .map(|row| RowTally::new(row, board.row_sum(row)))
            .collect()
    }

    /// Suspend on the flash hold for these rows
    pub fn start_flash(&mut self, rows: ProcessedRows) {
        self.stage = Stage::Flashing {
            rows,
            remaining_ms: FLASH_MS,
        };
    }

    /// Count down the flash; returns the rows once the hold has elapsed
    pub fn advance(&mut self, elapsed_ms: u32) -> Option<ProcessedRows> {
        let Stage::Flashing { remaining_ms, .. } = &mut self.stage else {
            return None;
        };
        *remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
        if *remaining_ms > 0 {
            return None;
        }
        self.finish()
    }

    /// End the flash hold now, returning the rows still to clear
    pub fn finish(&mut self) -> Option<ProcessedRows> {
        match std::mem::take(&mut self.stage) {
            Stage::Idle => None,
            Stage::Flashing { rows, .. } => Some(rows),
        }
    }

    /// Drop any in-flight resolution without touching the board
    pub fn cancel(&mut self) {
        self.stage = Stage::Idle;
    }

    /// Rows on screen in the flash hold
    pub fn flashing_rows(&self) -> &[RowTally] {
        match &self.stage {
            Stage::Idle => &[],
            Stage::Flashing { rows, .. } => rows.as_slice(),
        }
    }
}

/// Clear the processed rows, pack the board down and rebuild seams.
pub fn clear_and_collapse(board: &mut Board, rows: &[RowTally]) {
    for tally in rows {
        board.clear_row(tally.row);
    }
    board.collapse_rows();
    board.recompute_seams();

    if let Err(violation) = board.check_seams() {
        log::error!("seam invariant broken after collapse: {}", violation);
        debug_assert!(false, "{}", violation);
    }
}
