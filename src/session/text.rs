/// Text rendering: characters as font tiles, strings as cursor-driven
/// tile streams.
///
/// Text lives inside the safe area: columns 1–48, rows 1–16. When a
/// line advance runs past the last text row, the session emits exactly
/// one coarse scroll-up packet (paper fill) *before* the next glyph —
/// scrolls land only at line boundaries, so the glyph packets of a
/// line are never displaced by a scroll emitted mid-line.

use crate::domain::color::PaletteIndex;
use crate::domain::font;
use crate::domain::tile::{Direction, TileCoord, TilePattern, SAFE_COLS, SAFE_ROWS};
use crate::error::CdgError;
use crate::session::screen::CURSOR_HOME;
use crate::session::Session;

/// Clear-bit (paper) and set-bit (ink) colors for text tiles.
const TEXT_PAPER: PaletteIndex = PaletteIndex::from_nibble(15);
const TEXT_INK: PaletteIndex = PaletteIndex::from_nibble(1);

impl Session {
    /// Render one character at a tile position. Characters without a
    /// glyph draw as blank paper. Exactly one packet.
    pub fn text_tile(&mut self, ch: char, col: usize, row: usize, xor: bool) -> Result<(), CdgError> {
        let coord = TileCoord::new(row, col)?;
        let pattern = font::glyph(ch).unwrap_or(TilePattern::EMPTY);
        self.write_tile(coord, TEXT_PAPER, TEXT_INK, pattern, xor);
        Ok(())
    }

    /// Render a string at the cursor, wrapping at the safe-area edge
    /// and scrolling up a line when the bottom row overflows.
    pub fn print_screen(&mut self, text: &str, xor: bool) -> Result<(), CdgError> {
        for ch in text.chars() {
            if ch == '\n' {
                let (_, row) = self.screen.cursor();
                let next = row + 1;
                if next >= SAFE_ROWS {
                    self.scroll_text_line_up();
                    self.screen.set_cursor(CURSOR_HOME.0, SAFE_ROWS - 1);
                } else {
                    self.screen.set_cursor(CURSOR_HOME.0, next);
                }
                continue;
            }

            // Wrap lazily, just before a glyph actually lands: a line
            // that exactly fills the last row must not trigger a
            // scroll unless more text follows.
            let (mut col, mut row) = self.screen.cursor();
            if col >= SAFE_COLS {
                col = CURSOR_HOME.0;
                row += 1;
            }
            if row >= SAFE_ROWS {
                self.scroll_text_line_up();
                row = SAFE_ROWS - 1;
            }
            self.text_tile(ch, col, row, xor)?;
            self.screen.set_cursor(col + 1, row);
        }
        Ok(())
    }

    /// One scroll-up line feed in text colors, shared with cursor
    /// advancement.
    pub(crate) fn scroll_text_line_up(&mut self) {
        self.coarse_scroll(Direction::Up, TEXT_PAPER, false);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
