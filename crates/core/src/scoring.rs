//! Scoring module - pip-sum clear rules and gravity speed
//!
//! A processed row only scores when its pip sum is a positive multiple of five.
//! - One row: its sum, doubled if the streak was already active.
//! - Two rows: twice the sum of the qualifying rows (streak does not apply).
//! - Every qualifying row grants two lives; every other processed row costs one.
//! - The streak is on after any resolution that had a qualifying row, off otherwise.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_FLOOR_MS, DROP_STEP_MS, ROWS_PER_SPEEDUP, SOFT_DROP_DIVISOR,
    SOFT_DROP_FLOOR_MS,
};

/// Lives granted for a qualifying row
pub const LIVES_PER_FIVE_MULTIPLE: i32 = 2;

/// Lives lost for a full row that does not qualify
pub const LIVES_PER_PLAIN_ROW: i32 = -1;

/// `sum > 0 && sum % 5 == 0`
pub fn is_five_multiple(sum: u16) -> bool {
    sum > 0 && sum % 5 == 0
}

/// A full row picked up by a lock, with its pip total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowTally {
    pub row: usize,
    pub sum: u16,
    pub five_multiple: bool,
}

impl RowTally {
    pub fn new(row: usize, sum: u16) -> Self {
        Self {
            row,
            sum,
            five_multiple: is_five_multiple(sum),
        }
    }
}

/// Outcome of scoring one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub score_gain: u32,
    pub lives_delta: i32,
    /// Streak state after this resolution.
    pub streak_active: bool,
}

/// Score the processed rows of one lock.
///
/// `streak_before` is the streak state carried in from earlier locks.
pub fn calculate_score(rows: &[RowTally], streak_before: bool) -> ScoreResult {
    let qualifying_sum: u32 = rows
        .iter()
        .filter(|r| r.five_multiple)
        .map(|r| r.sum as u32)
        .sum();
    let any_qualifying = rows.iter().any(|r| r.five_multiple);

    let score_gain = match rows {
        [] => 0,
        [single] if single.five_multiple => {
            let multiplier = if streak_before { 2 } else { 1 };
            single.sum as u32 * multiplier
        }
        [_] => 0,
        _ => qualifying_sum * 2,
    };

    let lives_delta = rows
        .iter()
        .map(|r| {
            if r.five_multiple {
                LIVES_PER_FIVE_MULTIPLE
            } else {
                LIVES_PER_PLAIN_ROW
            }
        })
        .sum();

    ScoreResult {
        score_gain,
        lives_delta,
        streak_active: any_qualifying,
    }
}

/// Gravity interval for the number of rows cleared so far
pub fn drop_interval_ms(total_rows_cleared: u32) -> u32 {
    let steps = total_rows_cleared / ROWS_PER_SPEEDUP;
    BASE_DROP_MS
        .saturating_sub(DROP_STEP_MS.saturating_mul(steps))
        .max(DROP_INTERVAL_FLOOR_MS)
}

/// Gravity interval while soft drop is held
pub fn soft_drop_interval_ms(interval_ms: u32) -> u32 {
    (interval_ms / SOFT_DROP_DIVISOR).max(SOFT_DROP_FLOOR_MS)
}
