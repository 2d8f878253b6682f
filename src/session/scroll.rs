/// Scroll generators.
///
/// The wire carries one scroll state per packet: a fill color, a
/// horizontal byte and a vertical byte, each `cmd << 4 | offset`. The
/// command nibble requests a full-tile shift (1 = down/right,
/// 2 = up/left); the offset nibble is the standing sub-tile
/// displacement (0–5 px horizontally, 0–11 px vertically). Preset
/// scrolls fill the exposed edge with the color byte; copy scrolls
/// wrap the departing edge around (marquee).

use crate::codec::packet::{Instruction, MAX_PAYLOAD};
use crate::domain::color::PaletteIndex;
use crate::domain::tile::Direction;
use crate::error::CdgError;
use crate::session::Session;

impl Session {
    /// One scroll command packet.
    ///
    /// Without `step`: a coarse scroll — the screen content moves one
    /// whole tile in `direction`. With `wrap`, content leaving one edge
    /// re-enters at the opposite edge; otherwise the exposed edge is
    /// filled with `fill`.
    ///
    /// With `step`: a smooth-scroll packet that pins the sub-tile
    /// offset on that axis to `step` pixels (no tile movement).
    pub fn scroll(
        &mut self,
        direction: Direction,
        fill: PaletteIndex,
        step: Option<u8>,
        wrap: bool,
    ) -> Result<(), CdgError> {
        match step {
            Some(px) => {
                if px as usize > direction.max_step() {
                    return Err(CdgError::OutOfBounds {
                        what: if direction.is_vertical() {
                            "vertical scroll step"
                        } else {
                            "horizontal scroll step"
                        },
                        value: px as usize,
                        max: direction.max_step(),
                    });
                }
                if direction.is_vertical() {
                    self.screen.set_v_offset(px);
                } else {
                    self.screen.set_h_offset(px);
                }
                self.emit_scroll(wrap, fill, 0, 0);
            }
            None => self.coarse_scroll(direction, fill, wrap),
        }
        Ok(())
    }

    /// Full-tile scroll step; infallible, so generators that scroll as
    /// a side effect (text overflow) can use it directly.
    pub(crate) fn coarse_scroll(&mut self, direction: Direction, fill: PaletteIndex, wrap: bool) {
        let (h_cmd, v_cmd) = if direction.is_vertical() {
            (0, direction.shift_nibble())
        } else {
            (direction.shift_nibble(), 0)
        };
        if wrap {
            self.screen.rotate(direction);
        } else {
            self.screen.shift(direction, fill);
        }
        self.emit_scroll(wrap, fill, h_cmd, v_cmd);
    }

    /// Advance the display by exactly one pixel in `direction`, one
    /// packet. Call once per tick for continuous motion.
    ///
    /// Sub-tile offsets only span one tile, so every twelfth (or
    /// sixth, horizontally) packet folds the accumulated offset into a
    /// full-tile shift — combined with the offset nibble in the same
    /// packet, the display still moves a single pixel that tick.
    pub fn smooth_scroll(&mut self, direction: Direction) {
        let fill = self.screen.background();
        match direction {
            Direction::Up => {
                let next = self.screen.v_offset() + 1;
                if next as usize == direction.tile_step() {
                    self.screen.set_v_offset(0);
                    self.screen.shift(direction, fill);
                    self.emit_scroll(false, fill, 0, direction.shift_nibble());
                } else {
                    self.screen.set_v_offset(next);
                    self.emit_scroll(false, fill, 0, 0);
                }
            }
            Direction::Down => {
                if self.screen.v_offset() == 0 {
                    self.screen.set_v_offset(direction.max_step() as u8);
                    self.screen.shift(direction, fill);
                    self.emit_scroll(false, fill, 0, direction.shift_nibble());
                } else {
                    let next = self.screen.v_offset() - 1;
                    self.screen.set_v_offset(next);
                    self.emit_scroll(false, fill, 0, 0);
                }
            }
            Direction::Left => {
                let next = self.screen.h_offset() + 1;
                if next as usize == direction.tile_step() {
                    self.screen.set_h_offset(0);
                    self.screen.shift(direction, fill);
                    self.emit_scroll(false, fill, direction.shift_nibble(), 0);
                } else {
                    self.screen.set_h_offset(next);
                    self.emit_scroll(false, fill, 0, 0);
                }
            }
            Direction::Right => {
                if self.screen.h_offset() == 0 {
                    self.screen.set_h_offset(direction.max_step() as u8);
                    self.screen.shift(direction, fill);
                    self.emit_scroll(false, fill, direction.shift_nibble(), 0);
                } else {
                    let next = self.screen.h_offset() - 1;
                    self.screen.set_h_offset(next);
                    self.emit_scroll(false, fill, 0, 0);
                }
            }
        }
    }

    /// Scroll packet from the current standing offsets plus the given
    /// shift command nibbles.
    fn emit_scroll(&mut self, wrap: bool, fill: PaletteIndex, h_cmd: u8, v_cmd: u8) {
        let instruction = if wrap { Instruction::ScrollCopy } else { Instruction::ScrollPreset };
        let mut payload = [0u8; MAX_PAYLOAD];
        payload[0] = fill.value();
        payload[1] = h_cmd << 4 | self.screen.h_offset() & 0x07;
        payload[2] = v_cmd << 4 | self.screen.v_offset() & 0x0F;
        self.emit(instruction, payload);
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
