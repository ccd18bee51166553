//! Host configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `DOMINO_MODE` | unset | `easy`/`hard`: start immediately instead of waiting for E/H |
//! | `DOMINO_SEED` | clock | Tile order seed |
//! | `DOMINO_LOG_PATH` | unset | Append log records to this file |
//! | `DOMINO_LOG_LEVEL` | `info` | `error`, `warn`, `info`, `debug` or `trace` |

use std::time::{SystemTime, UNIX_EPOCH};

use log::LevelFilter;

use crate::types::Mode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Option<Mode>,
    pub seed: u32,
    pub log_path: Option<String>,
    pub log_level: LevelFilter,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: None,
            seed: clock_seed(),
            log_path: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl RunConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RunConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let mode = non_empty("DOMINO_MODE").and_then(|s| Mode::from_str(&s));
        let seed = non_empty("DOMINO_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(clock_seed);
        let log_path = non_empty("DOMINO_LOG_PATH");
        let log_level = non_empty("DOMINO_LOG_LEVEL")
            .and_then(|s| s.parse().ok())
            .unwrap_or(LevelFilter::Info);

        Self {
            mode,
            seed,
            log_path,
            log_level,
        }
    }
}

/// Seed from the wall clock; never zero
fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1);
    ((nanos ^ (nanos >> 32)) as u32).max(1)
}
