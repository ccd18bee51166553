//! GameView: maps a [`RenderState`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Each board cell is three columns wide. A lone cell reads `[n]`; the halves
//! of a horizontal domino are joined with `─` (`[2──5]`) and a vertical domino
//! is drawn `┌n┐` over `└n┘`.

use crate::core::scoring::is_five_multiple;
use crate::core::{CellView, Feedback, RenderState};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Mode, Seam, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Board cell width in terminal columns.
pub const CELL_W: u16 = 3;

/// Width of the row-sum column (including its leading gap).
const SUM_COL_W: u16 = 4;

const BOARD_BG: Rgb = Rgb::new(24, 24, 32);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const FLASH_GOOD_BG: Rgb = Rgb::new(30, 120, 50);
const FLASH_BAD_BG: Rgb = Rgb::new(140, 35, 35);
const GOOD_FG: Rgb = Rgb::new(110, 230, 120);
const BAD_FG: Rgb = Rgb::new(240, 110, 110);

/// A lightweight terminal renderer for the domino game.
pub struct GameView {
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            anchor_y: AnchorY::Center,
        }
    }
}

/// Where the board frame sits in the viewport.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl Frame {
    fn cell_origin(&self, row: usize, col: usize) -> (u16, u16) {
        (self.x + 1 + col as u16 * CELL_W, self.y + 1 + row as u16)
    }
}

impl GameView {
    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render the snapshot (plus an optional score popup) into an existing
    /// framebuffer.
    ///
    /// Callers reuse one framebuffer across frames; it is only resized when the
    /// terminal size changes.
    pub fn render_into(
        &self,
        snap: &RenderState,
        feedback: Option<&Feedback>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let board_w = BOARD_WIDTH as u16 * CELL_W;
        let board_h = BOARD_HEIGHT as u16;
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;
        let sums_w = if snap.row_sums.is_some() { SUM_COL_W } else { 0 };

        let total_w = frame_w + sums_w;
        let frame = Frame {
            x: viewport.width.saturating_sub(total_w + PANEL_MIN_W) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
            w: frame_w,
            h: frame_h,
        };

        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            board_w,
            board_h,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG),
        );
        draw_border(fb, frame.x, frame.y, frame.w, frame.h, border);

        for (row, cols) in snap.cells.iter().enumerate() {
            let flash = snap.flash_for(row);
            for (col, cell) in cols.iter().enumerate() {
                draw_cell(fb, &frame, row, col, cell, flash);
            }
        }

        if let Some(sums) = &snap.row_sums {
            draw_row_sums(fb, &frame, sums);
        }

        draw_side_panel(fb, snap, viewport, frame.x + total_w + 2, frame.y);

        if let Some(fb_msg) = feedback {
            draw_feedback(fb, &frame, fb_msg);
        }

        if snap.game_over {
            draw_overlay_text(fb, &frame, "GAME OVER");
        } else if snap.paused {
            draw_overlay_text(fb, &frame, "PAUSED");
        } else if !snap.running {
            draw_overlay_text(fb, &frame, "E: easy  H: hard");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &RenderState,
        feedback: Option<&Feedback>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, feedback, viewport, &mut fb);
        fb
    }
}

/// Space reserved right of the board for the HUD when centering.
const PANEL_MIN_W: u16 = 22;

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Glyphs either side of the pip for a cell with this seam.
pub fn cell_brackets(seam: Seam) -> (char, char) {
    match seam {
        Seam::None => ('[', ']'),
        Seam::Right => ('[', '─'),
        Seam::Left => ('─', ']'),
        Seam::Bottom => ('┌', '┐'),
        Seam::Top => ('└', '┘'),
    }
}

/// Foreground color per pip value
fn pip_color(pip: u8) -> Rgb {
    match pip {
        0 => Rgb::new(170, 170, 170),
        1 => Rgb::new(80, 200, 230),
        2 => Rgb::new(240, 220, 80),
        3 => Rgb::new(200, 130, 230),
        4 => Rgb::new(110, 220, 130),
        5 => Rgb::new(255, 165, 60),
        _ => Rgb::new(90, 140, 240),
    }
}

fn draw_cell(
    fb: &mut FrameBuffer,
    frame: &Frame,
    row: usize,
    col: usize,
    cell: &CellView,
    flash: Option<bool>,
) {
    let (x, y) = frame.cell_origin(row, col);
    let bg = match flash {
        Some(true) => FLASH_GOOD_BG,
        Some(false) => FLASH_BAD_BG,
        None => BOARD_BG,
    };

    let Some(pip) = cell.pip.filter(|_| cell.occupied) else {
        let dot = CellStyle::new(Rgb::new(70, 70, 85), bg).dim();
        fb.put_char(x, y, ' ', dot);
        fb.put_char(x + 1, y, '·', dot);
        fb.put_char(x + 2, y, ' ', dot);
        return;
    };

    let mut style = CellStyle::new(pip_color(pip), bg);
    if cell.active {
        style = style.bold().on(Rgb::new(50, 50, 70));
    }
    let (open, close) = cell_brackets(cell.seam);
    fb.put_char(x, y, open, style);
    fb.put_char(x + 1, y, (b'0' + pip) as char, style);
    fb.put_char(x + 2, y, close, style);
}

fn draw_row_sums(fb: &mut FrameBuffer, frame: &Frame, sums: &[u16; BOARD_HEIGHT as usize]) {
    let right_x = frame.x + frame.w + SUM_COL_W - 1;
    for (row, &sum) in sums.iter().enumerate() {
        let y = frame.y + 1 + row as u16;
        let style = if is_five_multiple(sum) {
            CellStyle::new(GOOD_FG, PANEL_BG).bold()
        } else {
            CellStyle::new(Rgb::new(120, 120, 130), PANEL_BG)
        };
        if sum > 0 {
            fb.put_u32_right(right_x, y, sum as u32, style);
        }
    }
}

fn draw_side_panel(
    fb: &mut FrameBuffer,
    snap: &RenderState,
    viewport: Viewport,
    panel_x: u16,
    start_y: u16,
) {
    if panel_x >= viewport.width || viewport.width - panel_x < 12 {
        return;
    }

    let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
    let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
    let hint = value.dim();

    let mut y = start_y;
    fb.put_str(panel_x, y, "SCORE", label);
    fb.put_u32(panel_x + 8, y, snap.score, value);
    y += 1;

    fb.put_str(panel_x, y, "LIVES", label);
    let lives_style = if snap.lives <= 2 {
        CellStyle::new(BAD_FG, PANEL_BG).bold()
    } else {
        value
    };
    let x = if snap.lives < 0 {
        fb.put_char(panel_x + 8, y, '-', lives_style);
        panel_x + 9
    } else {
        panel_x + 8
    };
    fb.put_u32(x, y, snap.lives.unsigned_abs(), lives_style);
    y += 1;

    let streak_style = if snap.streak_active {
        CellStyle::new(GOOD_FG, PANEL_BG).bold()
    } else {
        value
    };
    fb.put_str(panel_x, y, "STREAK", label);
    fb.put_str(panel_x + 8, y, snap.streak_label(), streak_style);
    y += 1;

    fb.put_str(panel_x, y, "MULT", label);
    fb.put_str(panel_x + 8, y, snap.multiplier_label(), streak_style);
    y += 1;

    fb.put_str(panel_x, y, "ROWS", label);
    fb.put_u32(panel_x + 8, y, snap.rows_cleared, value);
    y += 1;

    fb.put_str(panel_x, y, "SPEED", label);
    let end = fb.put_u32(panel_x + 8, y, snap.drop_interval_ms, value);
    fb.put_str(end, y, "ms", hint);
    y += 1;

    fb.put_str(panel_x, y, "MODE", label);
    let mode = match snap.mode {
        Some(Mode::Easy) => "Easy",
        Some(Mode::Hard) => "Hard",
        None => "-",
    };
    fb.put_str(panel_x + 8, y, mode, value);
    y += 2;

    let msg_style = match snap.message {
        crate::core::Message::GameOver(_) => CellStyle::new(BAD_FG, PANEL_BG).bold(),
        _ => value,
    };
    write_message(fb, panel_x, y, snap, msg_style);
    y += 2;

    for line in [
        "←/A →/D  move",
        "↑/W      rotate",
        "↓/S      soft drop",
        "Space    hard drop",
        "P pause  R restart",
        "E easy   H hard",
        "Q quit",
    ] {
        if y >= viewport.height {
            break;
        }
        fb.put_str(panel_x, y, line, hint);
        y += 1;
    }
}

fn write_message(fb: &mut FrameBuffer, x: u16, y: u16, snap: &RenderState, style: CellStyle) {
    use crate::core::Message;
    match snap.message {
        Message::GameOver(reason) => {
            let end = fb.put_str(x, y, "Game Over: ", style);
            fb.put_str(end, y, reason.as_str(), style);
        }
        Message::Idle => {
            fb.put_str(x, y, "Press E (easy) or H (hard)", style);
            fb.put_str(x, y + 1, "to start", style);
        }
        Message::Running => {
            fb.put_str(x, y, "Game running", style);
        }
        Message::Paused => {
            fb.put_str(x, y, "Paused", style);
        }
    }
}

/// Popup like `+40 · Lives +1 ×2 ACTIVE`, drawn over the top of the board.
fn draw_feedback(fb: &mut FrameBuffer, frame: &Frame, feedback: &Feedback) {
    let fg = if feedback.is_good() { GOOD_FG } else { BAD_FG };
    let style = CellStyle::new(fg, PANEL_BG).bold();

    let width = feedback_width(feedback);
    let x = frame.x + frame.w.saturating_sub(width) / 2;
    let y = frame.y + 2;

    let mut cx = fb.put_str(x, y, "+", style);
    cx = fb.put_u32(cx, y, feedback.score_gain, style);
    cx = fb.put_str(cx, y, " · Lives ", style);
    let sign = if feedback.lives_delta < 0 { "-" } else { "+" };
    cx = fb.put_str(cx, y, sign, style);
    cx = fb.put_u32(cx, y, feedback.lives_delta.unsigned_abs(), style);
    if feedback.streak_active {
        fb.put_str(cx, y, " ×2 ACTIVE", style);
    }
}

fn feedback_width(feedback: &Feedback) -> u16 {
    let mut w = 1 + crate::fb::decimal_width(feedback.score_gain) + 9 + 1;
    w += crate::fb::decimal_width(feedback.lives_delta.unsigned_abs());
    if feedback.streak_active {
        w += 10;
    }
    w
}

fn draw_overlay_text(fb: &mut FrameBuffer, frame: &Frame, text: &str) {
    let mid_y = frame.y.saturating_add(frame.h / 2);
    let text_w = text.chars().count() as u16;
    let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
    fb.put_str(x, mid_y, text, style);
}
