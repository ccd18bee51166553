//! Rendering tests: snapshot into framebuffer, then encoded terminal bytes

use domino_drop::core::Session;
use domino_drop::term::{encode_diff_into, encode_full_into, AnchorY, FrameBuffer, GameView, Viewport};
use domino_drop::types::{GameAction, Mode};

fn render(session: &Session) -> FrameBuffer {
    GameView::default()
        .with_anchor_y(AnchorY::Top)
        .render(&session.snapshot(), None, Viewport::new(80, 24))
}

#[test]
fn test_render_is_pure() {
    let mut session = Session::new(31);
    session.start_session(Mode::Easy);
    assert_eq!(render(&session), render(&session));
}

#[test]
fn test_moving_piece_changes_only_a_few_cells() {
    let mut session = Session::new(31);
    session.start_session(Mode::Hard);
    let before = render(&session);
    session.handle_input(GameAction::MoveLeft);
    let after = render(&session);

    let changed = before
        .cells()
        .iter()
        .zip(after.cells())
        .filter(|(a, b)| a != b)
        .count();
    assert!(changed > 0 && changed <= 9, "changed {}", changed);

    let mut out = Vec::new();
    encode_diff_into(&before, &after, &mut out).unwrap();
    let mut full = Vec::new();
    encode_full_into(&after, &mut full).unwrap();
    assert!(out.len() < full.len());
}

#[test]
fn test_game_over_overlay() {
    let mut session = Session::new(31);
    session.start_session(Mode::Easy);
    for _ in 0..16 {
        session.handle_input(GameAction::HardDrop);
    }
    assert!(session.game_over());

    let fb = render(&session);
    let text: String = (0..fb.height()).map(|y| fb.row_text(y)).collect();
    assert!(text.contains("GAME OVER"));
    assert!(text.contains("Game Over: Spawn collision!"));
}
