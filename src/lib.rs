//! Domino Drop (workspace facade crate).
//!
//! Re-exports the member crates as `domino_drop::{core,input,term,types}` and
//! holds the host-side pieces shared by the binary: environment configuration
//! and the file logger.

pub mod config;
pub mod logging;

pub use domino_drop_core as core;
pub use domino_drop_input as input;
pub use domino_drop_term as term;
pub use domino_drop_types as types;

pub use config::RunConfig;
