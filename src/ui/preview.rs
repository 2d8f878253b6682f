/// One-shot terminal preview of the encoded screen state.
///
/// Renders the 18×50 tile grid as colored cells: cell background from
/// the tile's A color, foreground from B, glyph picked by ink
/// coverage. A feedback tool for encoder output, not a player —
/// sub-tile scroll offsets only show in the status line. All terminal
/// commands are batched with `queue!` and flushed once at the end.

use std::io::{self, BufWriter, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};

use crate::domain::color::Color12;
use crate::domain::tile::TILE_COLS;
use crate::session::Session;

/// Widen 4-bit channels to the terminal's 8-bit RGB (0xF → 0xFF).
fn term_color(color: Color12) -> Color {
    Color::Rgb {
        r: color.r() * 17,
        g: color.g() * 17,
        b: color.b() * 17,
    }
}

/// Ink coverage (0–72 set pixels) to a density glyph.
fn coverage_glyph(coverage: u32) -> char {
    match coverage {
        0 => ' ',
        1..=18 => '░',
        19..=36 => '▒',
        37..=54 => '▓',
        _ => '█',
    }
}

pub fn render(session: &Session) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let screen = session.screen();
    let palette = session.palette();

    queue!(
        out,
        Print(format!(
            "border {:2}  background {:2}  offset {}x{} px\r\n",
            screen.border().value(),
            screen.background().value(),
            screen.h_offset(),
            screen.v_offset(),
        ))
    )?;

    for row in screen.tiles().chunks(TILE_COLS) {
        for cell in row {
            queue!(
                out,
                SetBackgroundColor(term_color(palette.get(cell.a))),
                SetForegroundColor(term_color(palette.get(cell.b))),
                Print(coverage_glyph(cell.pattern.coverage())),
            )?;
        }
        queue!(out, ResetColor, Print("\r\n"))?;
    }
    out.flush()
}
