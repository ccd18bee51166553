//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the domino engine.
//! All types are plain data with no external dependencies, so they can be used by
//! the core rules, the input mapping and the terminal view alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 8 columns (indexed 0-7)
//! - **Height**: 16 rows (indexed 0-15, row 0 is the top)
//! - **Spawn position**: row 0, columns 3 and 4 (horizontal)
//!
//! # Rule and Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Host fixed timestep (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Gravity interval with no rows cleared |
//! | `DROP_STEP_MS` | 50 | Interval decrease per `ROWS_PER_SPEEDUP` rows |
//! | `ROWS_PER_SPEEDUP` | 10 | Rows cleared per speed step |
//! | `DROP_INTERVAL_FLOOR_MS` | 150 | Fastest gravity interval |
//! | `SOFT_DROP_DIVISOR` | 4 | Soft drop quarters the interval |
//! | `SOFT_DROP_FLOOR_MS` | 80 | Fastest soft drop interval |
//! | `FLASH_MS` | 130 | Hold on cleared rows before removal |
//! | `FEEDBACK_DISPLAY_MS` | 900 | Lifetime of the score popup in the host |
//! | `INITIAL_LIVES` | 10 | Lives at session start |
//! | `MAX_ROWS_PER_LOCK` | 2 | Full rows processed per lock |
//!
//! # Examples
//!
//! ```
//! use domino_drop_types::{GameAction, Mode, Orientation, Seam, Tile, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let tile = Tile::new(5, 2);
//! assert_eq!((tile.low(), tile.high()), (2, 5));
//!
//! assert_eq!(Orientation::Horizontal.toggled(), Orientation::Vertical);
//! assert_eq!(Seam::Left.opposite(), Seam::Right);
//!
//! assert_eq!(Mode::from_str("EASY"), Some(Mode::Easy));
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 8);
//! assert_eq!(BOARD_HEIGHT, 16);
//! ```

use std::fmt;

/// Board width in cells (8 columns)
pub const BOARD_WIDTH: u8 = 8;

/// Board height in cells (16 rows)
pub const BOARD_HEIGHT: u8 = 16;

/// Row where new pieces appear
pub const SPAWN_ROW: i8 = 0;

/// Column of the left (lower-pip) cell of a new piece
pub const SPAWN_COL: i8 = 3;

/// Highest pip value on a double-six tile
pub const MAX_PIP: u8 = 6;

/// Number of distinct double-six tiles
pub const BAG_SIZE: usize = 28;

/// Lives at the start of a session
pub const INITIAL_LIVES: i32 = 10;

/// At most this many full rows are processed per lock, topmost first
pub const MAX_ROWS_PER_LOCK: usize = 2;

/// Host fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval before any rows have been cleared
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity speed-up applied per `ROWS_PER_SPEEDUP` cleared rows
pub const DROP_STEP_MS: u32 = 50;

/// Cleared rows needed for one speed step
pub const ROWS_PER_SPEEDUP: u32 = 10;

/// Fastest gravity interval
pub const DROP_INTERVAL_FLOOR_MS: u32 = 150;

/// Soft drop divides the current interval by this
pub const SOFT_DROP_DIVISOR: u32 = 4;

/// Fastest soft drop interval
pub const SOFT_DROP_FLOOR_MS: u32 = 80;

/// Duration of the flash hold on processed rows
pub const FLASH_MS: u32 = 130;

/// How long the host keeps a score popup on screen
pub const FEEDBACK_DISPLAY_MS: u32 = 900;

/// Soft drop is released when no down key was seen for this long
/// (terminals that never report key releases).
pub const SOFT_DROP_RELEASE_TIMEOUT_MS: u32 = 150;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_interval_constants_are_consistent() {
        assert!(DROP_INTERVAL_FLOOR_MS < BASE_DROP_MS);
        assert!(SOFT_DROP_FLOOR_MS < DROP_INTERVAL_FLOOR_MS);
        assert_eq!(BASE_DROP_MS % DROP_STEP_MS, 0);
    }

    #[test]
    fn bag_size_matches_double_six_set() {
        let n = MAX_PIP as usize + 1;
        assert_eq!(BAG_SIZE, n * (n + 1) / 2);
    }

    #[test]
    fn tile_orders_pips() {
        let t = Tile::new(6, 1);
        assert_eq!(t.low(), 1);
        assert_eq!(t.high(), 6);
        assert_eq!(t.sum(), 7);
    }

    #[test]
    fn seam_opposites_pair_up() {
        for seam in [Seam::Left, Seam::Right, Seam::Top, Seam::Bottom] {
            assert_eq!(seam.opposite().opposite(), seam);
            assert_ne!(seam.opposite(), seam);
        }
        assert_eq!(Seam::None.opposite(), Seam::None);
    }

    #[test]
    fn game_action_string_roundtrip() {
        for action in GameAction::ALL {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
        assert_eq!(GameAction::from_str("jump"), None);
    }

    #[test]
    fn end_reason_messages() {
        assert_eq!(EndReason::SpawnCollision.to_string(), "Spawn collision!");
        assert_eq!(EndReason::LivesExhausted.to_string(), "Lives below 0");
    }
}

/// One domino from the double-six set.
///
/// The pair is unordered; it is stored with the lower pip first so that equal
/// tiles compare equal regardless of how they were built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    low: u8,
    high: u8,
}

impl Tile {
    /// Build a tile from two pip values (any order).
    pub const fn new(a: u8, b: u8) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub const fn low(&self) -> u8 {
        self.low
    }

    pub const fn high(&self) -> u8 {
        self.high
    }

    pub const fn sum(&self) -> u8 {
        self.low + self.high
    }

    /// The full double-six set in canonical order (0-0, 0-1, ... 6-6).
    pub fn full_set() -> [Tile; BAG_SIZE] {
        let mut set = [Tile::new(0, 0); BAG_SIZE];
        let mut i = 0;
        for a in 0..=MAX_PIP {
            for b in a..=MAX_PIP {
                set[i] = Tile::new(a, b);
                i += 1;
            }
        }
        set
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Identity of one placed domino, shared by its two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DominoId(pub u32);

/// Which side of a cell touches the other half of its domino.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Seam {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
}

impl Seam {
    /// The seam the partner cell carries.
    pub fn opposite(&self) -> Self {
        match self {
            Seam::None => Seam::None,
            Seam::Left => Seam::Right,
            Seam::Right => Seam::Left,
            Seam::Top => Seam::Bottom,
            Seam::Bottom => Seam::Top,
        }
    }

    /// Row/column offset from a cell to its partner across this seam.
    pub fn offset(&self) -> Option<(i8, i8)> {
        match self {
            Seam::None => None,
            Seam::Left => Some((0, -1)),
            Seam::Right => Some((0, 1)),
            Seam::Top => Some((-1, 0)),
            Seam::Bottom => Some((1, 0)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Seam::None => "",
            Seam::Left => "left",
            Seam::Right => "right",
            Seam::Top => "top",
            Seam::Bottom => "bottom",
        }
    }
}

/// Orientation of the falling domino.
///
/// - **Horizontal**: anchor is the left cell, partner sits to its right
/// - **Vertical**: anchor is the bottom cell, partner sits above it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn toggled(&self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "H",
            Orientation::Vertical => "V",
        }
    }
}

/// Difficulty mode. Rules are identical; easy mode shows row sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Easy,
    Hard,
}

impl Mode {
    /// Parse mode from string (case-insensitive)
    ///
    /// ```
    /// use domino_drop_types::Mode;
    ///
    /// assert_eq!(Mode::from_str("hard"), Some(Mode::Hard));
    /// assert_eq!(Mode::from_str(" Easy "), Some(Mode::Easy));
    /// assert_eq!(Mode::from_str("normal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Some(Mode::Easy),
            "hard" | "h" => Some(Mode::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Easy => "easy",
            Mode::Hard => "hard",
        }
    }

    /// Whether row sums may be shown to the player.
    pub fn shows_row_sums(&self) -> bool {
        matches!(self, Mode::Easy)
    }
}

/// Player actions delivered to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    Rotate,
    SoftDropOn,
    SoftDropOff,
    HardDrop,
    Pause,
    Restart,
}

impl GameAction {
    pub const ALL: [GameAction; 8] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::Rotate,
        GameAction::SoftDropOn,
        GameAction::SoftDropOff,
        GameAction::HardDrop,
        GameAction::Pause,
        GameAction::Restart,
    ];

    /// Parse action from its camelCase name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "moveLeft" => Some(GameAction::MoveLeft),
            "moveRight" => Some(GameAction::MoveRight),
            "rotate" => Some(GameAction::Rotate),
            "softDropOn" => Some(GameAction::SoftDropOn),
            "softDropOff" => Some(GameAction::SoftDropOff),
            "hardDrop" => Some(GameAction::HardDrop),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Rotate => "rotate",
            GameAction::SoftDropOn => "softDropOn",
            GameAction::SoftDropOff => "softDropOff",
            GameAction::HardDrop => "hardDrop",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// No room for a new piece at the spawn cells.
    SpawnCollision,
    /// Lives dropped below zero after a resolution.
    LivesExhausted,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::SpawnCollision => "Spawn collision!",
            EndReason::LivesExhausted => "Lives below 0",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
