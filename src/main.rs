//! Terminal domino runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from
//! `domino_drop::term`. Configuration comes from `DOMINO_*` environment
//! variables (see [`domino_drop::config`]).

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use domino_drop::core::{Feedback, RenderState, Session};
use domino_drop::input::{handle_key_event, is_soft_drop_key, mode_for_key, should_quit, InputHandler};
use domino_drop::logging;
use domino_drop::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use domino_drop::types::{FEEDBACK_DISPLAY_MS, TICK_MS};
use domino_drop::RunConfig;

fn main() -> Result<()> {
    let config = RunConfig::from_env();
    logging::init(config.log_path.as_deref(), config.log_level)?;
    log::info!("starting with seed {}", config.seed);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        log::error!("exiting with error: {:#}", e);
    }
    log::logger().flush();
    result
}

/// Score popup with its remaining display time.
struct Popup {
    feedback: Feedback,
    remaining_ms: u32,
}

fn run(term: &mut TerminalRenderer, config: &RunConfig) -> Result<()> {
    let mut session = Session::new(config.seed);
    if let Some(mode) = config.mode {
        session.start_session(mode);
    }

    let view = GameView::default();
    let mut input = InputHandler::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = RenderState::default();
    let mut popup: Option<Popup> = None;

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        session.snapshot_into(&mut snap);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(
            &snap,
            popup.as_ref().map(|p| &p.feedback),
            Viewport::new(w, h),
            &mut fb,
        );
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(&mut session, &mut input, key) == Flow::Quit {
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = elapsed.as_millis().min(u32::MAX as u128) as u32;

            if let Some(action) = input.update(elapsed_ms) {
                session.handle_input(action);
            }
            session.advance(elapsed_ms);

            if let Some(p) = popup.as_mut() {
                p.remaining_ms = p.remaining_ms.saturating_sub(elapsed_ms);
                if p.remaining_ms == 0 {
                    popup = None;
                }
            }
        }

        if let Some(feedback) = session.take_feedback() {
            popup = Some(Popup {
                feedback,
                remaining_ms: FEEDBACK_DISPLAY_MS,
            });
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn handle_key(session: &mut Session, input: &mut InputHandler, key: KeyEvent) -> Flow {
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {
            if should_quit(key) {
                return Flow::Quit;
            }

            if is_soft_drop_key(key.code) {
                if let Some(action) = input.handle_key_press(key.code) {
                    session.handle_input(action);
                }
            } else if let Some(mode) = mode_for_key(key) {
                // A game in progress only starts over through restart.
                if !session.running() || session.game_over() {
                    input.reset();
                    session.start_session(mode);
                }
            } else if let Some(action) = handle_key_event(key) {
                session.handle_input(action);
            }
        }
        KeyEventKind::Release => {
            if let Some(action) = input.handle_key_release(key.code) {
                session.handle_input(action);
            }
        }
    }
    Flow::Continue
}
