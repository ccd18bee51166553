//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the domino drop rules, state management, and
//! simulation logic. It has no dependencies on terminals or I/O, which keeps it:
//!
//! - **Deterministic**: Same seed produces the same tile sequence
//! - **Testable**: Every rule is exercised headlessly
//! - **Portable**: Runs under the terminal host, a test, or a benchmark
//!
//! # Module Structure
//!
//! - [`board`]: 8x16 grid of locked cells, row sums, collapse and seam upkeep
//! - [`pieces`]: the falling domino, movement and rotation with kicks
//! - [`rng`]: 28-tile bag over a deterministic LCG
//! - [`scoring`]: pip-sum scoring, lives, streak and gravity speed
//! - [`clock`]: restartable gravity cadence fed with elapsed time
//! - [`resolve`]: lock pipeline (scan, flash hold, clear, collapse)
//! - [`session`]: complete game state and lifecycle
//! - [`snapshot`]: copyable render state for views
//!
//! # Game Rules
//!
//! - **Tiles**: the 28 unordered pip pairs from 0 to 6, drawn from a reshuffled bag
//! - **Clears**: at most two full rows are processed per lock, topmost first
//! - **Fives**: a full row whose pip sum is a positive multiple of five scores
//!   and grants two lives; any other full row costs one life
//! - **Streak**: a lock that produced a scoring row doubles the next single scoring row
//! - **End**: the game ends when a new piece cannot spawn or lives drop below zero
//!
//! # Example
//!
//! ```
//! use domino_drop_core::Session;
//! use domino_drop_types::{GameAction, Mode};
//!
//! let mut session = Session::new(12345);
//! session.start_session(Mode::Easy);
//!
//! session.handle_input(GameAction::MoveRight);
//! session.handle_input(GameAction::Rotate);
//! session.handle_input(GameAction::HardDrop);
//!
//! assert_eq!(session.board().occupied_count(), 2);
//! ```
//!
//! # Timing
//!
//! The host reports elapsed milliseconds through
//! [`Session::advance`](session::Session::advance). Gravity starts at 1000ms,
//! speeds up by 50ms every 10 rows cleared down to 150ms, and soft drop
//! quarters it (never below 80ms). Cleared rows flash for 130ms before they
//! are removed.

pub mod board;
pub mod clock;
pub mod pieces;
pub mod resolve;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use domino_drop_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LockedCell, SeamViolation};
pub use clock::GravityClock;
pub use pieces::{try_move, try_rotate, Piece, PieceCell};
pub use resolve::{Feedback, LockPipeline};
pub use rng::{SimpleRng, TileBag};
pub use scoring::{calculate_score, drop_interval_ms, RowTally, ScoreResult};
pub use session::Session;
pub use snapshot::{CellView, FlashRow, Message, RenderState};
