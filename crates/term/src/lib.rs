//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and renders into a plain framebuffer that is flushed to the
//! terminal as a diff.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Make the view a pure function of the render snapshot
//! - Control the cell aspect precisely (3 columns per board cell)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use domino_drop_core as core;
pub use domino_drop_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
