/// ScreenState: the logical screen model.
///
/// Tracks what a compliant player's display memory holds after
/// consuming the stream emitted so far: the 18×50 tile grid, border and
/// background colors, sub-tile scroll offsets, and the text cursor.
/// All mutation goes through the methods here; command generators keep
/// this shadow in lockstep with the packets they emit.

use crate::domain::color::PaletteIndex;
use crate::domain::tile::{
    Direction, TileCell, TileCoord, TilePattern, SAFE_COLS, SAFE_ROWS, TILE_COLS, TILE_ROWS,
};

/// Home position of the text cursor: the top-left tile of the safe
/// area (row/column 0 form the border fringe).
pub const CURSOR_HOME: (usize, usize) = (1, 1);

pub struct ScreenState {
    /// Row-major tile grid, `TILE_ROWS × TILE_COLS`.
    tiles: Vec<TileCell>,
    border: PaletteIndex,
    background: PaletteIndex,
    /// Sub-tile scroll offsets, `0..TILE_WIDTH` / `0..TILE_HEIGHT`.
    h_offset: u8,
    v_offset: u8,
    cursor_col: usize,
    cursor_row: usize,
}

impl ScreenState {
    pub fn new() -> Self {
        let black = PaletteIndex::from_nibble(0);
        ScreenState {
            tiles: vec![TileCell::solid(black); TILE_ROWS * TILE_COLS],
            border: black,
            background: black,
            h_offset: 0,
            v_offset: 0,
            cursor_col: CURSOR_HOME.0,
            cursor_row: CURSOR_HOME.1,
        }
    }

    // ── Tiles ──

    pub fn tile(&self, coord: TileCoord) -> &TileCell {
        &self.tiles[coord.row() * TILE_COLS + coord.col()]
    }

    /// Replace a tile outright (normal blit).
    pub fn blit(&mut self, coord: TileCoord, cell: TileCell) {
        self.tiles[coord.row() * TILE_COLS + coord.col()] = cell;
    }

    /// Combine new pixel bits into a tile with per-pixel XOR and adopt
    /// the new local colors. Returns the resulting stored pattern.
    pub fn blit_xor(
        &mut self,
        coord: TileCoord,
        a: PaletteIndex,
        b: PaletteIndex,
        pattern: TilePattern,
    ) -> TilePattern {
        let cell = &mut self.tiles[coord.row() * TILE_COLS + coord.col()];
        cell.pattern = cell.pattern.xor(&pattern);
        cell.a = a;
        cell.b = b;
        cell.pattern
    }

    /// Reset the whole grid to one flat color (memory preset wipes the
    /// player's display memory the same way).
    pub fn fill(&mut self, color: PaletteIndex) {
        self.tiles.fill(TileCell::solid(color));
    }

    pub fn tiles(&self) -> &[TileCell] {
        &self.tiles
    }

    // ── Coarse scrolling ──

    /// Shift the grid one tile in `direction`; the exposed edge becomes
    /// solid `fill`.
    pub fn shift(&mut self, direction: Direction, fill: PaletteIndex) {
        let solid = TileCell::solid(fill);
        match direction {
            Direction::Up => {
                self.tiles.rotate_left(TILE_COLS);
                self.tiles[(TILE_ROWS - 1) * TILE_COLS..].fill(solid);
            }
            Direction::Down => {
                self.tiles.rotate_right(TILE_COLS);
                self.tiles[..TILE_COLS].fill(solid);
            }
            Direction::Left => {
                for row in self.tiles.chunks_mut(TILE_COLS) {
                    row.rotate_left(1);
                    row[TILE_COLS - 1] = solid;
                }
            }
            Direction::Right => {
                for row in self.tiles.chunks_mut(TILE_COLS) {
                    row.rotate_right(1);
                    row[0] = solid;
                }
            }
        }
    }

    /// Rotate the grid one tile in `direction` — wrapped (marquee)
    /// scrolling: content leaving one edge re-enters at the other.
    pub fn rotate(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.tiles.rotate_left(TILE_COLS),
            Direction::Down => self.tiles.rotate_right(TILE_COLS),
            Direction::Left => {
                for row in self.tiles.chunks_mut(TILE_COLS) {
                    row.rotate_left(1);
                }
            }
            Direction::Right => {
                for row in self.tiles.chunks_mut(TILE_COLS) {
                    row.rotate_right(1);
                }
            }
        }
    }

    // ── Colors and offsets ──

    pub fn border(&self) -> PaletteIndex {
        self.border
    }

    pub fn set_border(&mut self, color: PaletteIndex) {
        self.border = color;
    }

    pub fn background(&self) -> PaletteIndex {
        self.background
    }

    pub fn set_background(&mut self, color: PaletteIndex) {
        self.background = color;
    }

    pub fn h_offset(&self) -> u8 {
        self.h_offset
    }

    pub fn v_offset(&self) -> u8 {
        self.v_offset
    }

    pub fn set_h_offset(&mut self, px: u8) {
        self.h_offset = px;
    }

    pub fn set_v_offset(&mut self, px: u8) {
        self.v_offset = px;
    }

    // ── Text cursor ──

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_col, self.cursor_row)
    }

    pub fn set_cursor(&mut self, col: usize, row: usize) {
        self.cursor_col = col;
        self.cursor_row = row;
    }

    /// Move the cursor one column right, wrapping to the start of the
    /// next row at the safe-area edge. Returns true when the wrap
    /// pushed the cursor past the last text row — the caller owes a
    /// scroll before the next glyph lands (the cursor is left pinned
    /// to the last row).
    pub fn advance_cursor(&mut self) -> bool {
        self.cursor_col += 1;
        if self.cursor_col >= SAFE_COLS {
            self.cursor_col = CURSOR_HOME.0;
            self.cursor_row += 1;
        }
        if self.cursor_row >= SAFE_ROWS {
            self.cursor_row = SAFE_ROWS - 1;
            return true;
        }
        false
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new()
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
