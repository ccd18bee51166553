//! Terminal input module (engine-facing).
//!
//! Independent of any UI framework. It maps `crossterm` key events into
//! [`crate::types::GameAction`] and mode choices, and tracks the held soft-drop
//! key (including on terminals that never report key releases).

pub mod handler;
pub mod map;

pub use domino_drop_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, is_soft_drop_key, mode_for_key, should_quit};
