//! Soft-drop hold tracking for terminal environments.
//!
//! Supports terminals that do not emit key release events by using a timeout:
//! terminal auto-repeat keeps refreshing the hold, and once presses stop for
//! longer than the timeout the key counts as released.

use crossterm::event::KeyCode;

use crate::map::is_soft_drop_key;
use crate::types::{GameAction, SOFT_DROP_RELEASE_TIMEOUT_MS};

/// Tracks whether the soft-drop key is held.
///
/// Emits `SoftDropOn` once per hold and `SoftDropOff` once per release, never
/// a duplicate in between.
#[derive(Debug, Clone)]
pub struct InputHandler {
    soft_drop_held: bool,
    /// Time since the last press or repeat of the soft-drop key.
    since_last_press_ms: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            soft_drop_held: false,
            since_last_press_ms: 0,
            key_release_timeout_ms: SOFT_DROP_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn soft_drop_held(&self) -> bool {
        self.soft_drop_held
    }

    /// Press or auto-repeat of a key
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        if !is_soft_drop_key(code) {
            return None;
        }
        self.since_last_press_ms = 0;
        if self.soft_drop_held {
            None
        } else {
            self.soft_drop_held = true;
            Some(GameAction::SoftDropOn)
        }
    }

    /// Explicit release, on terminals that report one
    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<GameAction> {
        if is_soft_drop_key(code) {
            self.release()
        } else {
            None
        }
    }

    /// Advance the release timeout.
    pub fn update(&mut self, elapsed_ms: u32) -> Option<GameAction> {
        if !self.soft_drop_held {
            return None;
        }
        self.since_last_press_ms = self.since_last_press_ms.saturating_add(elapsed_ms);
        if self.since_last_press_ms > self.key_release_timeout_ms {
            self.release()
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.soft_drop_held = false;
        self.since_last_press_ms = 0;
    }

    fn release(&mut self) -> Option<GameAction> {
        if !self.soft_drop_held {
            return None;
        }
        self.reset();
        Some(GameAction::SoftDropOff)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_emits_on_once() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_key_press(KeyCode::Down), Some(GameAction::SoftDropOn));
        assert_eq!(ih.handle_key_press(KeyCode::Down), None);
        assert_eq!(ih.handle_key_press(KeyCode::Char('s')), None);
        assert!(ih.soft_drop_held());
    }

    #[test]
    fn test_release_event_emits_off_once() {
        let mut ih = InputHandler::new();
        ih.handle_key_press(KeyCode::Down);
        assert_eq!(ih.handle_key_release(KeyCode::Down), Some(GameAction::SoftDropOff));
        assert_eq!(ih.handle_key_release(KeyCode::Down), None);
    }

    #[test]
    fn test_auto_release_after_timeout_without_release_events() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);
        ih.handle_key_press(KeyCode::Down);

        assert_eq!(ih.update(50), None);
        assert_eq!(ih.update(1), Some(GameAction::SoftDropOff));
        assert!(!ih.soft_drop_held());
        assert_eq!(ih.update(1_000), None);
    }

    #[test]
    fn test_repeat_keeps_hold_alive() {
        let mut ih = InputHandler::new().with_key_release_timeout_ms(50);
        ih.handle_key_press(KeyCode::Down);
        for _ in 0..10 {
            assert_eq!(ih.update(40), None);
            assert_eq!(ih.handle_key_press(KeyCode::Down), None);
        }
        assert!(ih.soft_drop_held());
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut ih = InputHandler::new();
        assert_eq!(ih.handle_key_press(KeyCode::Left), None);
        assert_eq!(ih.handle_key_release(KeyCode::Left), None);
        assert!(!ih.soft_drop_held());
    }

    #[test]
    fn test_default_key_release_timeout_is_non_zero() {
        assert!(InputHandler::new().key_release_timeout_ms() > 0);
    }
}
