//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable list of draw
//! commands (or plain numbers for the menu screens).  No game logic is
//! performed; this module only translates playfield units into terminal
//! cells and cells into crossterm commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::entities::PLAYFIELD;
use crate::frame::{Align, DrawCommand, Sprite};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_TITLE: Color = Color::Cyan;
const C_SHIP: Color = Color::Rgb { r: 0x00, g: 0xd2, b: 0xd3 };
const C_ZOMBIE: Color = Color::Green;
const C_BOSS: Color = Color::Magenta;
const C_BASKET: Color = Color::Rgb { r: 0xe6, g: 0x7e, b: 0x22 };
const C_APPLE: Color = Color::Red;
const C_BANANA: Color = Color::Yellow;
const C_BOMB: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Terminal area the square playfield is stretched over.  Row 0 and the last
/// row/column hold the border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    fn inner_cols(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    fn inner_rows(&self) -> u16 {
        self.rows.saturating_sub(2).max(1)
    }

    /// Column for playfield x, unclipped (may fall outside the frame).
    fn col_f(&self, x: f32) -> f32 {
        1.0 + x / PLAYFIELD * self.inner_cols() as f32
    }

    fn row_f(&self, y: f32) -> f32 {
        1.0 + y / PLAYFIELD * self.inner_rows() as f32
    }

    /// Terminal cell for a playfield point, `None` when outside the frame.
    pub fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let c = self.col_f(x).floor();
        let r = self.row_f(y).floor();
        let in_cols = c >= 1.0 && c <= self.inner_cols() as f32;
        let in_rows = r >= 1.0 && r <= self.inner_rows() as f32;
        (in_cols && in_rows).then(|| (c as u16, r as u16))
    }

    /// Cell span `[start, end)` of a horizontal extent, clipped, at least one
    /// cell wide when the extent is positive.
    fn col_span(&self, x: f32, w: f32) -> Option<(u16, u16)> {
        if w <= 0.0 {
            return None;
        }
        let lo = self.col_f(x).floor().max(1.0);
        let hi = self.col_f(x + w).floor().min(self.inner_cols() as f32 + 1.0);
        if lo > self.inner_cols() as f32 || hi < 1.0 {
            return None;
        }
        Some((lo as u16, (hi.max(lo + 1.0)) as u16))
    }

    fn row_span(&self, y: f32, h: f32) -> Option<(u16, u16)> {
        if h <= 0.0 {
            return None;
        }
        let lo = self.row_f(y).floor().max(1.0);
        let hi = self.row_f(y + h).floor().min(self.inner_rows() as f32 + 1.0);
        if lo > self.inner_rows() as f32 || hi < 1.0 {
            return None;
        }
        Some((lo as u16, (hi.max(lo + 1.0)) as u16))
    }
}

// ── Public entry points ──────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    commands: &[DrawCommand],
    viewport: Viewport,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, viewport)?;
    for cmd in commands {
        draw_command(out, cmd, viewport)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, viewport.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Game-selection screen.
pub fn draw_menu<W: Write>(out: &mut W, viewport: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let cx = viewport.cols / 2;
    let cy = viewport.rows / 2;

    let title = "★  POSE  ARCADE  ★";
    centered(out, cx, cy.saturating_sub(5), title, C_TITLE)?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Fruit Catcher", Color::Green, "lean left/right to catch fruit"),
        ("2", "Space Shooter", Color::Yellow, "survive the horde, grab weapons"),
    ];
    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(20), row))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<14}", label)))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!(" {}", desc)))?;
    }

    centered(out, cx, cy + 2, "← → / A D : Move   SPACE : Shoot   Q : Quit", C_HINT)?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

/// End-of-session overlay with the final numbers.
pub fn draw_game_over<W: Write>(
    out: &mut W,
    viewport: Viewport,
    headline: &str,
    score: u32,
    level: u32,
) -> std::io::Result<()> {
    let cx = viewport.cols / 2;
    let start_row = (viewport.rows / 2).saturating_sub(3);

    let framed = format!("║  {:^18}  ║", headline);
    let lines: [(String, Color); 6] = [
        ("╔══════════════════════╗".to_string(), Color::Red),
        (framed, Color::Red),
        ("╚══════════════════════╝".to_string(), Color::Red),
        (format!("Score: {:>6}", score), Color::Yellow),
        (format!("Level: {:>6}", level), Color::Yellow),
        ("ENTER - Menu  Q - Quit".to_string(), Color::White),
    ];
    for (i, (msg, color)) in lines.iter().enumerate() {
        centered(out, cx, start_row + i as u16, msg, *color)?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, viewport: Viewport) -> std::io::Result<()> {
    let w = viewport.cols as usize;
    let h = viewport.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(1)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 1..h.saturating_sub(1) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(viewport.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn draw_command<W: Write>(
    out: &mut W,
    cmd: &DrawCommand,
    viewport: Viewport,
) -> std::io::Result<()> {
    match cmd {
        DrawCommand::Rect { x, y, w, h, color } => {
            let (Some((c0, c1)), Some((r0, r1))) =
                (viewport.col_span(*x, *w), viewport.row_span(*y, *h))
            else {
                return Ok(());
            };
            out.queue(style::SetForegroundColor(*color))?;
            let bar = "█".repeat((c1 - c0) as usize);
            for row in r0..r1 {
                out.queue(cursor::MoveTo(c0, row))?;
                out.queue(Print(&bar))?;
            }
        }
        DrawCommand::Circle { x, y, color, .. } => {
            if let Some((c, r)) = viewport.cell(*x, *y) {
                out.queue(cursor::MoveTo(c, r))?;
                out.queue(style::SetForegroundColor(*color))?;
                out.queue(Print("•"))?;
            }
        }
        DrawCommand::VLine { x, color } => {
            if let Some((c, _)) = viewport.cell(*x, 0.0) {
                out.queue(style::SetForegroundColor(*color))?;
                for row in 1..=viewport.inner_rows() {
                    out.queue(cursor::MoveTo(c, row))?;
                    out.queue(Print("┊"))?;
                }
            }
        }
        DrawCommand::Sprite { sprite, x, y, w, h } => {
            let (glyph, color) = sprite_glyph(*sprite);
            let (cx, cy) = (x + w / 2.0, y + h / 2.0);
            if let Some((c, r)) = viewport.cell(cx, cy) {
                let half = glyph.chars().count() as u16 / 2;
                out.queue(cursor::MoveTo(c.saturating_sub(half).max(1), r))?;
                out.queue(style::SetForegroundColor(color))?;
                out.queue(Print(glyph))?;
            }
        }
        DrawCommand::Text { x, y, text, color, align } => {
            if let Some((c, r)) = viewport.cell((*x).clamp(0.0, PLAYFIELD - 0.01), *y) {
                let len = text.chars().count() as u16;
                let col = match align {
                    Align::Left => c,
                    Align::Right => c.saturating_sub(len).max(1),
                };
                out.queue(cursor::MoveTo(col, r))?;
                out.queue(style::SetForegroundColor(*color))?;
                out.queue(Print(text))?;
            }
        }
    }
    Ok(())
}

fn sprite_glyph(sprite: Sprite) -> (&'static str, Color) {
    match sprite {
        Sprite::Ship => ("/▲\\", C_SHIP),
        Sprite::Zombie => ("«z»", C_ZOMBIE),
        Sprite::Boss => ("<Ω>", C_BOSS),
        Sprite::Basket => ("╰──╯", C_BASKET),
        Sprite::Apple => ("●", C_APPLE),
        Sprite::Banana => (")", C_BANANA),
        Sprite::Bomb => ("✹", C_BOMB),
    }
}

fn centered<W: Write>(
    out: &mut W,
    cx: u16,
    row: u16,
    msg: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(msg))?;
    Ok(())
}
