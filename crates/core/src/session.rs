//! Session module - owns the complete game state
//!
//! This module ties together the board, the falling piece, the tile bag, the
//! lock pipeline and the gravity clock. It handles input routing, gravity,
//! locking, row resolution, speed changes and the session lifecycle.

use log::{debug, info};

use crate::board::Board;
use crate::clock::GravityClock;
use crate::pieces::{self, Piece};
use crate::resolve::{clear_and_collapse, Feedback, LockPipeline, ProcessedRows};
use crate::rng::TileBag;
use crate::scoring::{calculate_score, drop_interval_ms, soft_drop_interval_ms};
use crate::snapshot::{overlay_cells, FlashRow, Message, RenderState};
use crate::types::*;

/// Complete game state
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    active: Option<Piece>,
    bag: TileBag,
    /// Next identifier handed to a spawned domino.
    next_domino: u32,
    /// Increments on every start/restart.
    session_id: u32,
    score: u32,
    lives: i32,
    streak_active: bool,
    total_rows_cleared: u32,
    drop_interval_ms: u32,
    mode: Option<Mode>,
    running: bool,
    paused: bool,
    game_over: bool,
    end_reason: Option<EndReason>,
    soft_drop_held: bool,
    pipeline: LockPipeline,
    clock: GravityClock,
    /// Last scored lock (consumed by observers).
    last_feedback: Option<Feedback>,
}

impl Session {
    /// Create an idle session; `seed` fixes the tile order
    pub fn new(seed: u32) -> Self {
        Self {
            board: Board::new(),
            active: None,
            bag: TileBag::new(seed),
            next_domino: 0,
            session_id: 0,
            score: 0,
            lives: INITIAL_LIVES,
            streak_active: false,
            total_rows_cleared: 0,
            drop_interval_ms: BASE_DROP_MS,
            mode: None,
            running: false,
            paused: false,
            game_over: false,
            end_reason: None,
            soft_drop_held: false,
            pipeline: LockPipeline::new(),
            clock: GravityClock::new(),
            last_feedback: None,
        }
    }

    /// Reset everything, spawn the first piece and start gravity
    pub fn start_session(&mut self, mode: Mode) {
        self.reset();
        self.mode = Some(mode);
        self.running = true;
        info!(
            "session {} started in {} mode",
            self.session_id,
            mode.as_str()
        );

        if !self.spawn_piece() {
            return;
        }
        self.update_drop_speed();
    }

    /// Fresh state that keeps the tile sequence moving and counts the session
    fn reset(&mut self) {
        let next_session = self.session_id.wrapping_add(1);
        *self = Self::new(self.bag.seed());
        self.session_id = next_session;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn streak_active(&self) -> bool {
        self.streak_active
    }

    pub fn rows_cleared(&self) -> u32 {
        self.total_rows_cleared
    }

    /// Gravity interval from rows cleared, ignoring soft drop
    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    /// Gravity interval currently in force
    pub fn gravity_interval_ms(&self) -> u32 {
        if self.soft_drop_held {
            soft_drop_interval_ms(self.drop_interval_ms)
        } else {
            self.drop_interval_ms
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn soft_drop_held(&self) -> bool {
        self.soft_drop_held
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn clock(&self) -> &GravityClock {
        &self.clock
    }

    /// A resolution is suspended in its flash hold
    pub fn is_resolving(&self) -> bool {
        self.pipeline.is_busy()
    }

    pub fn message(&self) -> Message {
        if let Some(reason) = self.end_reason {
            Message::GameOver(reason)
        } else if !self.running {
            Message::Idle
        } else if self.paused {
            Message::Paused
        } else {
            Message::Running
        }
    }

    /// Take and clear the last scored-lock feedback.
    pub fn take_feedback(&mut self) -> Option<Feedback> {
        self.last_feedback.take()
    }

    pub fn snapshot_into(&self, out: &mut RenderState) {
        out.cells = overlay_cells(&self.board, self.active.as_ref());

        let shows_sums = self.mode.is_some_and(|m| m.shows_row_sums());
        out.row_sums = shows_sums.then(|| self.board.row_sums());

        out.flash = [None; MAX_ROWS_PER_LOCK];
        for (slot, tally) in out.flash.iter_mut().zip(self.pipeline.flashing_rows()) {
            *slot = Some(FlashRow {
                row: tally.row as u8,
                five_multiple: tally.five_multiple,
            });
        }

        out.score = self.score;
        out.lives = self.lives;
        out.streak_active = self.streak_active;
        out.rows_cleared = self.total_rows_cleared;
        out.drop_interval_ms = self.drop_interval_ms;
        out.mode = self.mode;
        out.message = self.message();
        out.running = self.running;
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.session_id = self.session_id;
    }

    pub fn snapshot(&self) -> RenderState {
        let mut s = RenderState::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Route one player action.
    ///
    /// Pause and restart are always accepted. Everything else needs a running,
    /// unfinished session; while paused only a soft-drop release gets through
    /// so a key let go during the pause does not stay held.
    pub fn handle_input(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Pause => return self.toggle_pause(),
            GameAction::Restart => return self.restart(),
            _ => {}
        }

        if !self.running || self.game_over {
            return false;
        }
        if self.paused {
            return action == GameAction::SoftDropOff && self.set_soft_drop(false);
        }

        match action {
            GameAction::MoveLeft => self.move_piece(0, -1),
            GameAction::MoveRight => self.move_piece(0, 1),
            GameAction::Rotate => self.rotate_piece(),
            GameAction::SoftDropOn => self.set_soft_drop(true),
            GameAction::SoftDropOff => self.set_soft_drop(false),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Pause | GameAction::Restart => false,
        }
    }

    /// One gravity step: fall a row, or lock when blocked
    pub fn tick(&mut self) -> bool {
        if !self.running || self.paused || self.game_over || self.pipeline.is_busy() {
            return false;
        }
        if self.active.is_none() {
            return false;
        }

        if !self.move_piece(1, 0) {
            self.lock_piece();
        }
        true
    }

    /// Feed host time: finish a due flash hold, then deliver due gravity steps.
    ///
    /// Returns the number of gravity steps that ran.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if let Some(rows) = self.pipeline.advance(elapsed_ms) {
            self.complete_resolution(rows);
        }

        let due = self.clock.advance(elapsed_ms);
        let generation = self.clock.generation();
        let mut ran = 0;
        for _ in 0..due {
            // A lock re-arms (or disarms) the clock; steps owed to the old
            // cadence are dropped.
            if self.clock.generation() != generation || self.pipeline.is_busy() {
                break;
            }
            if self.tick() {
                ran += 1;
            }
        }
        ran
    }

    /// Finish an in-flight flash hold immediately
    pub fn settle(&mut self) -> bool {
        match self.pipeline.finish() {
            Some(rows) => {
                self.complete_resolution(rows);
                true
            }
            None => false,
        }
    }

    /// Spawn a new piece from the bag; ends the game if the spawn cells are taken
    pub fn spawn_piece(&mut self) -> bool {
        let tile = self.bag.draw();
        let id = DominoId(self.next_domino);
        self.next_domino = self.next_domino.wrapping_add(1);

        let piece = Piece::spawn(tile, id);
        if !piece.fits(|r, c| self.board.is_vacant(r, c)) {
            self.end_game(EndReason::SpawnCollision);
            return false;
        }

        debug!("spawned domino {} ({})", id.0, tile);
        self.active = Some(piece);
        true
    }

    /// Translate the active piece; no change unless every cell lands in bounds and free
    pub fn move_piece(&mut self, d_row: i8, d_col: i8) -> bool {
        if self.pipeline.is_busy() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match pieces::try_move(&active, d_row, d_col, |r, c| self.board.is_vacant(r, c)) {
            Some(moved) => {
                self.active = Some(moved);
                true
            }
            None => false,
        }
    }

    /// Rotate the active piece with kicks; silent no-op when nothing fits
    pub fn rotate_piece(&mut self) -> bool {
        if self.pipeline.is_busy() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match pieces::try_rotate(&active, |r, c| self.board.is_vacant(r, c)) {
            Some((rotated, _kick)) => {
                self.active = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// Drop the active piece as far as it goes and lock it
    pub fn hard_drop(&mut self) -> bool {
        if self.pipeline.is_busy() || self.active.is_none() {
            return false;
        }
        while self.move_piece(1, 0) {}
        self.lock_piece();
        true
    }

    /// Merge the active piece into the board and resolve full rows
    pub fn lock_piece(&mut self) {
        if self.pipeline.is_busy() {
            return;
        }
        let Some(piece) = self.active.take() else {
            return;
        };

        if !self.board.lock_piece(&piece) {
            log::error!("domino {} locked over taken cells", piece.id().0);
        }
        debug!("locked domino {} at {:?}", piece.id().0, piece.anchor());

        let rows = LockPipeline::scan(&self.board);
        if rows.is_empty() {
            self.streak_active = false;
            self.finish_resolution();
            return;
        }

        let result = calculate_score(&rows, self.streak_active);
        self.score = self.score.saturating_add(result.score_gain);
        self.lives += result.lives_delta;
        self.total_rows_cleared += rows.len() as u32;
        self.streak_active = result.streak_active;
        self.last_feedback = Some(Feedback {
            score_gain: result.score_gain,
            lives_delta: result.lives_delta,
            streak_active: result.streak_active,
        });
        info!(
            "rows {:?} sums {:?}: +{} score, {:+} lives, streak {}",
            rows.iter().map(|r| r.row).collect::<Vec<_>>(),
            rows.iter().map(|r| r.sum).collect::<Vec<_>>(),
            result.score_gain,
            result.lives_delta,
            result.streak_active
        );

        if self.lives < 0 {
            self.end_game(EndReason::LivesExhausted);
            return;
        }

        self.pipeline.start_flash(rows);
    }

    fn complete_resolution(&mut self, rows: ProcessedRows) {
        clear_and_collapse(&mut self.board, &rows);
        self.finish_resolution();
    }

    fn finish_resolution(&mut self) {
        if self.game_over {
            return;
        }
        self.update_drop_speed();
        self.spawn_piece();
    }

    /// Recompute the interval from rows cleared and restart the cadence
    fn update_drop_speed(&mut self) {
        self.drop_interval_ms = drop_interval_ms(self.total_rows_cleared);

        if !self.running || self.game_over {
            return;
        }
        if self.paused {
            self.clock.disarm();
            return;
        }
        self.clock.arm(self.gravity_interval_ms());
    }

    fn set_soft_drop(&mut self, held: bool) -> bool {
        if !self.running || self.game_over || self.soft_drop_held == held {
            return false;
        }
        self.soft_drop_held = held;
        self.update_drop_speed();
        true
    }

    fn toggle_pause(&mut self) -> bool {
        if !self.running || self.game_over {
            return false;
        }
        self.paused = !self.paused;
        debug!("paused: {}", self.paused);
        self.update_drop_speed();
        true
    }

    /// Start over in the last mode, or return to idle if none was chosen
    fn restart(&mut self) -> bool {
        match self.mode {
            Some(mode) => self.start_session(mode),
            None => self.reset(),
        }
        true
    }

    /// Freeze the session and stop gravity for good
    pub fn end_game(&mut self, reason: EndReason) {
        self.game_over = true;
        self.end_reason = Some(reason);
        self.clock.disarm();
        self.pipeline.cancel();
        self.active = None;
        info!(
            "session {} over: {} (score {}, rows {})",
            self.session_id, reason, self.score, self.total_rows_cleared
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::LockedCell;

    const W: usize = BOARD_WIDTH as usize;
    const H: i8 = BOARD_HEIGHT as i8;

    fn started(seed: u32) -> Session {
        let mut s = Session::new(seed);
        s.start_session(Mode::Easy);
        s
    }

    /// Fill `row` except the `gaps` columns with pips totalling `sum`.
    fn fill_row(board: &mut Board, row: i8, gaps: &[i8], sum: u16, id: u32) {
        let mut left = sum;
        for col in (0..W as i8).filter(|c| !gaps.contains(c)) {
            let pip = left.min(MAX_PIP as u16) as u8;
            left -= pip as u16;
            board.set(
                row,
                col,
                Some(LockedCell {
                    pip,
                    domino: DominoId(id + col as u32),
                    seam: Seam::None,
                }),
            );
        }
        assert_eq!(left, 0, "sum {} does not fit", sum);
    }

    /// Place a horizontal piece with the given pips whose cells are `(row, col)` and `(row, col+1)`.
    fn place_active(s: &mut Session, row: i8, col: i8, low: u8, high: u8) {
        let piece = Piece::spawn(Tile::new(low, high), DominoId(1000));
        let (ar, ac) = piece.anchor();
        s.active = Some(piece.translated(row - ar, col - ac));
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = Session::new(12345);
        assert!(!s.running);
        assert!(!s.game_over);
        assert_eq!(s.lives, INITIAL_LIVES);
        assert_eq!(s.drop_interval_ms, BASE_DROP_MS);
        assert!(s.active.is_none());
        assert!(!s.clock.is_armed());
        assert_eq!(s.message(), Message::Idle);
    }

    #[test]
    fn test_start_spawns_and_arms_clock() {
        let s = started(12345);
        let piece = s.active.unwrap();
        assert_eq!(piece.anchor(), (SPAWN_ROW, SPAWN_COL));
        assert_eq!(piece.orientation(), Orientation::Horizontal);
        let [left, right] = piece.cells();
        assert!(left.pip <= right.pip);
        assert!(s.clock.is_armed());
        assert_eq!(s.clock.interval_ms(), 1000);
        assert_eq!(s.message(), Message::Running);
        assert_eq!(s.session_id, 1);
    }

    #[test]
    fn test_tick_moves_down_then_locks() {
        let mut s = started(7);
        let first = s.active.unwrap().id();
        for _ in 0..(H - 1) {
            assert!(s.tick());
        }
        assert_eq!(s.active.unwrap().anchor().0, H - 1);

        assert!(s.tick());
        assert_ne!(s.active.unwrap().id(), first);
        assert_eq!(s.board.occupied_count(), 2);
        assert!(!s.streak_active);
    }

    #[test]
    fn test_fresh_domino_ids_per_spawn() {
        let mut s = started(7);
        let mut ids = Vec::new();
        for _ in 0..5 {
            ids.push(s.active.unwrap().id());
            s.hard_drop();
        }
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_two_row_clear_scores_and_flashes() {
        let mut s = started(3);
        // Row 14 is already full (12); the piece completes row 15 at 20.
        fill_row(&mut s.board, 14, &[], 12, 100);
        fill_row(&mut s.board, 15, &[3, 4], 17, 200);
        place_active(&mut s, 15, 3, 1, 2);

        s.lock_piece();

        assert_eq!(s.score, 40);
        assert_eq!(s.lives, INITIAL_LIVES + 1);
        assert!(s.streak_active);
        assert_eq!(s.total_rows_cleared, 2);
        assert!(s.is_resolving());
        assert!(s.active.is_none());

        let snap = s.snapshot();
        assert_eq!(snap.flash_for(14), Some(false));
        assert_eq!(snap.flash_for(15), Some(true));

        assert_eq!(
            s.take_feedback(),
            Some(Feedback {
                score_gain: 40,
                lives_delta: 1,
                streak_active: true
            })
        );
        assert_eq!(s.take_feedback(), None);
    }

    #[test]
    fn test_gravity_inert_during_flash_then_resumes() {
        let mut s = started(3);
        fill_row(&mut s.board, 15, &[3, 4], 12, 200);
        place_active(&mut s, 15, 3, 2, 3);
        s.lock_piece();
        assert!(s.is_resolving());

        assert!(!s.tick());
        assert!(!s.move_piece(0, 1));
        assert!(!s.hard_drop());

        s.advance(FLASH_MS - 1);
        assert!(s.is_resolving());
        s.advance(1);
        assert!(!s.is_resolving());

        assert_eq!(s.board.occupied_count(), 0);
        assert!(s.active.is_some());
        assert_eq!(s.score, 0);
        assert_eq!(s.lives, INITIAL_LIVES - 1);
        assert!(!s.streak_active);
    }

    #[test]
    fn test_streak_doubles_next_single_row() {
        let mut s = started(5);
        fill_row(&mut s.board, 15, &[3, 4], 12, 200);
        place_active(&mut s, 15, 3, 1, 2);
        s.lock_piece();
        s.settle();
        assert_eq!(s.score, 15);
        assert!(s.streak_active);

        fill_row(&mut s.board, 15, &[3, 4], 7, 300);
        place_active(&mut s, 15, 3, 3, 5);
        s.lock_piece();
        assert_eq!(s.score, 15 + 30);
        assert!(s.streak_active);
    }

    #[test]
    fn test_lock_without_full_rows_ends_streak() {
        let mut s = started(5);
        s.streak_active = true;
        s.hard_drop();
        assert!(!s.streak_active);
        assert!(!s.is_resolving());
    }

    #[test]
    fn test_lives_below_zero_ends_before_flash() {
        let mut s = started(5);
        s.lives = 0;
        fill_row(&mut s.board, 15, &[3, 4], 12, 200);
        place_active(&mut s, 15, 3, 2, 3);

        s.lock_piece();

        assert!(s.game_over);
        assert_eq!(s.lives, -1);
        assert_eq!(s.end_reason, Some(EndReason::LivesExhausted));
        assert!(!s.is_resolving());
        assert!(!s.clock.is_armed());
        assert!(s.active.is_none());
        assert_eq!(s.message().to_string(), "Game Over: Lives below 0");
        // Board is frozen as it was at lock time.
        assert!(s.board.is_row_full(15));
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut s = started(5);
        s.board.set(
            SPAWN_ROW,
            SPAWN_COL + 1,
            Some(LockedCell {
                pip: 1,
                domino: DominoId(9999),
                seam: Seam::None,
            }),
        );
        s.active = None;

        assert!(!s.spawn_piece());
        assert!(s.game_over);
        assert_eq!(s.end_reason, Some(EndReason::SpawnCollision));
        assert_eq!(s.advance(10_000), 0);
    }

    #[test]
    fn test_speed_recomputed_after_resolution() {
        let mut s = started(5);
        s.total_rows_cleared = 36;
        fill_row(&mut s.board, 15, &[3, 4], 12, 200);
        place_active(&mut s, 15, 3, 1, 2);
        s.lock_piece();
        s.settle();

        assert_eq!(s.total_rows_cleared, 37);
        assert_eq!(s.drop_interval_ms, 850);
        assert_eq!(s.clock.interval_ms(), 850);
    }

    #[test]
    fn test_soft_drop_quarters_interval_and_restarts_clock() {
        let mut s = started(5);
        s.advance(900);
        assert!(s.handle_input(GameAction::SoftDropOn));
        assert_eq!(s.clock.interval_ms(), 250);
        assert_eq!(s.clock.remaining_ms(), Some(250));

        // Repeated press does not restart the cadence.
        s.advance(100);
        assert!(!s.handle_input(GameAction::SoftDropOn));
        assert_eq!(s.clock.remaining_ms(), Some(150));

        assert!(s.handle_input(GameAction::SoftDropOff));
        assert_eq!(s.clock.interval_ms(), 1000);
    }

    #[test]
    fn test_pause_stops_gravity_and_blocks_moves() {
        let mut s = started(5);
        let before = s.active.unwrap();

        assert!(s.handle_input(GameAction::Pause));
        assert!(!s.clock.is_armed());
        assert_eq!(s.advance(5_000), 0);
        assert!(!s.handle_input(GameAction::MoveLeft));
        assert!(!s.handle_input(GameAction::HardDrop));
        assert_eq!(s.active.unwrap(), before);
        assert_eq!(s.message(), Message::Paused);

        assert!(s.handle_input(GameAction::Pause));
        assert!(s.clock.is_armed());
        assert_eq!(s.advance(1000), 1);
        assert_eq!(s.active.unwrap().anchor().0, before.anchor().0 + 1);
    }

    #[test]
    fn test_resume_uses_soft_drop_cadence() {
        let mut s = started(5);
        s.handle_input(GameAction::SoftDropOn);
        s.handle_input(GameAction::Pause);
        s.handle_input(GameAction::Pause);
        assert_eq!(s.clock.interval_ms(), 250);
    }

    #[test]
    fn test_soft_drop_release_accepted_while_paused() {
        let mut s = started(5);
        s.handle_input(GameAction::SoftDropOn);
        s.handle_input(GameAction::Pause);
        assert!(s.handle_input(GameAction::SoftDropOff));
        assert!(!s.soft_drop_held);
        assert!(!s.clock.is_armed());
    }

    #[test]
    fn test_pause_ignored_when_not_running() {
        let mut s = Session::new(5);
        assert!(!s.handle_input(GameAction::Pause));
        assert!(!s.paused);
    }

    #[test]
    fn test_restart_without_mode_returns_to_idle() {
        let mut s = Session::new(5);
        assert!(s.handle_input(GameAction::Restart));
        assert!(!s.running);
        assert!(s.active.is_none());
    }

    #[test]
    fn test_restart_during_flash_cancels_resolution() {
        let mut s = started(5);
        fill_row(&mut s.board, 15, &[3, 4], 12, 200);
        place_active(&mut s, 15, 3, 1, 2);
        s.lock_piece();
        assert!(s.is_resolving());

        assert!(s.handle_input(GameAction::Restart));
        assert!(!s.is_resolving());
        assert_eq!(s.board.occupied_count(), 0);
        assert_eq!(s.score, 0);
        assert_eq!(s.mode, Some(Mode::Easy));
        assert_eq!(s.session_id, 2);
        assert!(s.active.is_some());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut s = started(5);
        s.end_game(EndReason::SpawnCollision);
        assert!(!s.handle_input(GameAction::MoveLeft));
        assert!(s.handle_input(GameAction::Restart));
        assert!(!s.game_over);
        assert!(s.clock.is_armed());
    }

    #[test]
    fn test_row_sums_hidden_in_hard_mode() {
        let mut s = Session::new(5);
        s.start_session(Mode::Hard);
        assert!(s.snapshot().row_sums.is_none());

        s.start_session(Mode::Easy);
        assert!(s.snapshot().row_sums.is_some());
    }

    #[test]
    fn test_row_sums_exclude_active_piece() {
        let s = started(5);
        let sums = s.snapshot().row_sums.unwrap();
        assert_eq!(sums[0], 0);
    }

    #[test]
    fn test_hard_drop_lands_on_floor() {
        let mut s = started(11);
        let piece = s.active.unwrap();
        assert!(s.handle_input(GameAction::HardDrop));
        let [a, b] = piece.cells();
        assert_eq!(
            s.board.get(H - 1, a.col).flatten().map(|c| c.pip),
            Some(a.pip)
        );
        assert_eq!(
            s.board.get(H - 1, b.col).flatten().map(|c| c.seam),
            Some(Seam::Left)
        );
    }
}
