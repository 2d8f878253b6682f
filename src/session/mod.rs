/// The encoding session: one explicit context object owning the screen
/// model, the active palette, and the output stream.
///
/// Command generators are methods on `Session`. Each reads/mutates the
/// screen model and appends packets in strict chronological order —
/// emission order alone decides which tick a packet lands on. A session
/// is single-threaded by design; concurrent encodes each own their own
/// `Session`.

pub mod image;
pub mod palette;
pub mod screen;
pub mod scroll;
pub mod text;

use crate::codec::packet::{self, Instruction, MAX_PAYLOAD};
use crate::codec::stream::StreamAssembler;
use crate::domain::color::{Palette, PaletteIndex};
use crate::domain::tile::{TileCell, TileCoord, TilePattern, TILE_COLS, TILE_ROWS};
use crate::error::CdgError;

pub use image::IndexedImage;
pub use screen::ScreenState;

pub struct Session {
    screen: ScreenState,
    palette: Palette,
    stream: StreamAssembler,
}

impl Session {
    /// A fresh session: black screen, black palette, empty buffer.
    pub fn new() -> Self {
        Session {
            screen: ScreenState::new(),
            palette: Palette::new(),
            stream: StreamAssembler::new(),
        }
    }

    // ── Buffer access ──

    /// Start over: empty buffer, screen and palette reset wholesale.
    /// Idempotent.
    pub fn new_buffer(&mut self) {
        self.screen = ScreenState::new();
        self.palette = Palette::new();
        self.stream.clear();
    }

    /// Snapshot of the accumulated byte stream. Safe to call
    /// mid-sequence; later appends do not alter a returned copy.
    pub fn buffer(&self) -> Vec<u8> {
        self.stream.bytes()
    }

    /// Packet slots emitted so far (= playback ticks covered).
    pub fn packet_count(&self) -> usize {
        self.stream.packet_count()
    }

    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    // ── Timing ──

    /// Append `ticks` padding slots (~6.6 ms each).
    pub fn delay_ticks(&mut self, ticks: u32) {
        self.stream.delay_ticks(ticks);
    }

    pub fn delay_seconds(&mut self, seconds: u32) {
        self.stream.delay_seconds(seconds);
    }

    /// All session payloads are built at full packet width, so
    /// emission cannot fail.
    pub(crate) fn emit(&mut self, instruction: Instruction, payload: [u8; MAX_PAYLOAD]) {
        self.stream.push_raw(packet::encode_full(instruction, &payload));
    }

    // ── Screen-level colors ──

    /// Memory preset: wipe the display to one flat color.
    /// Exactly one packet.
    pub fn set_screen_color(&mut self, color: PaletteIndex) {
        self.screen.set_background(color);
        self.screen.fill(color);
        let mut payload = [0u8; MAX_PAYLOAD];
        payload[0] = color.value();
        // payload[1] is the repeat counter, 0 for a single send
        self.emit(Instruction::MemoryPreset, payload);
    }

    /// Border preset: recolor the fringe outside the tile area.
    /// Exactly one packet.
    pub fn set_border_color(&mut self, color: PaletteIndex) {
        self.screen.set_border(color);
        let mut payload = [0u8; MAX_PAYLOAD];
        payload[0] = color.value();
        self.emit(Instruction::BorderPreset, payload);
    }

    /// Declare one palette slot transparent (for players that overlay
    /// graphics on video). Exactly one packet.
    pub fn set_transparent_color(&mut self, color: PaletteIndex) {
        let mut payload = [0u8; MAX_PAYLOAD];
        payload[0] = color.value();
        self.emit(Instruction::SetTransparent, payload);
    }

    // ── Tiles ──

    /// Draw one 6×12 tile. Normal mode replaces the stored pixel
    /// block; XOR mode combines per pixel with what is already there.
    /// Exactly one packet either way.
    pub fn write_tile(
        &mut self,
        coord: TileCoord,
        a: PaletteIndex,
        b: PaletteIndex,
        pattern: TilePattern,
        xor: bool,
    ) {
        let instruction = if xor {
            self.screen.blit_xor(coord, a, b, pattern);
            Instruction::TileBlockXor
        } else {
            self.screen.blit(coord, TileCell { a, b, pattern });
            Instruction::TileBlock
        };
        let mut payload = [0u8; MAX_PAYLOAD];
        payload[0] = a.value();
        payload[1] = b.value();
        payload[2] = coord.row() as u8;
        payload[3] = coord.col() as u8;
        payload[4..16].copy_from_slice(pattern.rows());
        self.emit(instruction, payload);
    }

    /// Replace-mode blit at raw coordinates.
    pub fn tile_blit(
        &mut self,
        row: usize,
        col: usize,
        a: PaletteIndex,
        b: PaletteIndex,
        pattern: TilePattern,
    ) -> Result<(), CdgError> {
        let coord = TileCoord::new(row, col)?;
        self.write_tile(coord, a, b, pattern, false);
        Ok(())
    }

    /// XOR-mode blit at raw coordinates.
    pub fn xor_blit(
        &mut self,
        row: usize,
        col: usize,
        a: PaletteIndex,
        b: PaletteIndex,
        pattern: TilePattern,
    ) -> Result<(), CdgError> {
        let coord = TileCoord::new(row, col)?;
        self.write_tile(coord, a, b, pattern, true);
        Ok(())
    }

    // ── Text cursor ──

    /// Place the text cursor. Bookkeeping only, no packet.
    pub fn set_cursor(&mut self, col: usize, row: usize) -> Result<(), CdgError> {
        if col >= TILE_COLS {
            return Err(CdgError::OutOfBounds { what: "cursor column", value: col, max: TILE_COLS - 1 });
        }
        if row >= TILE_ROWS {
            return Err(CdgError::OutOfBounds { what: "cursor row", value: row, max: TILE_ROWS - 1 });
        }
        self.screen.set_cursor(col, row);
        Ok(())
    }

    /// Advance the cursor one column, wrapping at the safe-area edge.
    /// Pure bookkeeping until the wrap runs past the last text row — at
    /// that point the scroll generator emits one scroll-up packet.
    pub fn advance_cursor(&mut self) {
        if self.screen.advance_cursor() {
            self.scroll_text_line_up();
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
