/// Palette load and fade generators.
///
/// The 16 slots load as two independent halves, 8 colors per packet
/// (two payload bytes per color). Fades are chains of palette loads:
/// 15 interpolation steps — one per 4-bit intensity level — each
/// followed by enough padding to hit the requested cadence.

use crate::codec::packet::{Instruction, MAX_PAYLOAD};
use crate::domain::color::{Color12, Palette, HALF_PALETTE};
use crate::error::CdgError;
use crate::session::Session;

/// Pack 8 colors into a palette-load payload.
fn pack_half(colors: &[Color12; HALF_PALETTE]) -> [u8; MAX_PAYLOAD] {
    let mut payload = [0u8; MAX_PAYLOAD];
    for (i, color) in colors.iter().enumerate() {
        let (hi, lo) = color.packed();
        payload[i * 2] = hi;
        payload[i * 2 + 1] = lo;
    }
    payload
}

/// Stateless packing of a possibly short color list into 8 slots.
///
/// With `duplicates`, a short list repeats to fill the half — senders
/// do this so a scratched disc still lands a usable palette. Without
/// it there is nothing to put in the remaining slots, which is an
/// `AmbiguousFill` error here; a `Session` resolves the same case by
/// retaining its current values instead.
pub fn pack_palette_half(
    colors: &[Color12],
    duplicates: bool,
) -> Result<[u8; MAX_PAYLOAD], CdgError> {
    let full = resolve_half(colors, duplicates, None)?;
    Ok(pack_half(&full))
}

/// Expand `colors` to all 8 slots. Missing slots cycle the input when
/// `duplicates` is set, otherwise fall back to `retained` (the
/// session's current half) — or error when there is nothing to retain.
fn resolve_half(
    colors: &[Color12],
    duplicates: bool,
    retained: Option<&[Color12; HALF_PALETTE]>,
) -> Result<[Color12; HALF_PALETTE], CdgError> {
    if colors.is_empty() {
        return Err(CdgError::AmbiguousFill { got: 0, want: HALF_PALETTE });
    }
    if colors.len() > HALF_PALETTE {
        return Err(CdgError::PaletteRange {
            what: "half-palette colors",
            value: colors.len(),
            max: HALF_PALETTE,
        });
    }
    let mut full = [Color12::BLACK; HALF_PALETTE];
    for (i, slot) in full.iter_mut().enumerate() {
        *slot = if i < colors.len() {
            colors[i]
        } else if duplicates {
            colors[i % colors.len()]
        } else {
            match retained {
                Some(half) => half[i],
                None => {
                    return Err(CdgError::AmbiguousFill {
                        got: colors.len(),
                        want: HALF_PALETTE,
                    })
                }
            }
        };
    }
    Ok(full)
}

impl Session {
    /// Load palette slots 0–7. Exactly one packet.
    pub fn palette_low(&mut self, colors: &[Color12], duplicates: bool) -> Result<(), CdgError> {
        let current = self.palette.low_half();
        let full = resolve_half(colors, duplicates, Some(&current))?;
        self.palette.set_low_half(&full);
        self.emit(Instruction::LoadPaletteLow, pack_half(&full));
        Ok(())
    }

    /// Load palette slots 8–15. Exactly one packet.
    pub fn palette_high(&mut self, colors: &[Color12], duplicates: bool) -> Result<(), CdgError> {
        let current = self.palette.high_half();
        let full = resolve_half(colors, duplicates, Some(&current))?;
        self.palette.set_high_half(&full);
        self.emit(Instruction::LoadPaletteHigh, pack_half(&full));
        Ok(())
    }

    /// Load all 16 slots: one low + one high packet.
    pub fn load_palette(&mut self, palette: &Palette) {
        let low = palette.low_half();
        let high = palette.high_half();
        self.palette.set_low_half(&low);
        self.palette.set_high_half(&high);
        self.emit(Instruction::LoadPaletteLow, pack_half(&low));
        self.emit(Instruction::LoadPaletteHigh, pack_half(&high));
    }

    /// Fade the screen up from black to `target`: 15 steps, `speed`
    /// padding ticks after each, the last step landing the exact
    /// target palette.
    pub fn fade_in(&mut self, speed: u32, target: &Palette) {
        for step in 1..=0x0F_u8 {
            self.load_palette(&target.dimmed(0x0F - step));
            self.delay_ticks(speed);
        }
    }

    /// Fade the given palette down to black at the same cadence.
    pub fn fade_out(&mut self, speed: u32, from: &Palette) {
        for step in 1..=0x0F_u8 {
            self.load_palette(&from.dimmed(step));
            self.delay_ticks(speed);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::packet::{NO_OP, PACKET_SIZE};
    use crate::domain::color::PaletteIndex;

    fn rgb(bits: u16) -> Color12 {
        Color12::from_bits(bits).unwrap()
    }

    fn packets(session: &Session) -> Vec<Vec<u8>> {
        session.buffer().chunks(PACKET_SIZE).map(|c| c.to_vec()).collect()
    }

    #[test]
    fn palette_low_packs_twelve_bit_values_in_order() {
        let colors = [
            rgb(0x000), rgb(0xFFF), rgb(0xF00), rgb(0x0F0),
            rgb(0x00F), rgb(0x888), rgb(0x444), rgb(0xCCC),
        ];
        let mut s = Session::new();
        s.palette_low(&colors, false).unwrap();

        let p = &packets(&s)[0];
        assert_eq!(p[1] & 0x3F, Instruction::LoadPaletteLow as u8);
        let expected = [
            0x00, 0x00, 0x3F, 0x3F, 0x3C, 0x00, 0x03, 0x30,
            0x00, 0x0F, 0x22, 0x08, 0x11, 0x04, 0x33, 0x0C,
        ];
        assert_eq!(&p[4..20], &expected);
    }

    #[test]
    fn palette_high_targets_upper_slots() {
        let mut s = Session::new();
        s.palette_high(&[rgb(0xABC); 8], false).unwrap();
        assert_eq!(packets(&s)[0][1] & 0x3F, Instruction::LoadPaletteHigh as u8);
        assert_eq!(s.palette().get(PaletteIndex::new(8).unwrap()), rgb(0xABC));
        assert_eq!(s.palette().get(PaletteIndex::new(7).unwrap()), Color12::BLACK);
    }

    #[test]
    fn short_list_with_duplicates_cycles() {
        let mut s = Session::new();
        s.palette_low(&[rgb(0x100), rgb(0x200)], true).unwrap();
        let half = s.palette().low_half();
        for i in 0..HALF_PALETTE {
            let want = if i % 2 == 0 { rgb(0x100) } else { rgb(0x200) };
            assert_eq!(half[i], want);
        }
    }

    #[test]
    fn short_list_without_duplicates_retains_prior_slots() {
        let mut s = Session::new();
        s.palette_low(&[rgb(0x111); 8], false).unwrap();
        s.palette_low(&[rgb(0x900), rgb(0x090)], false).unwrap();
        let half = s.palette().low_half();
        assert_eq!(half[0], rgb(0x900));
        assert_eq!(half[1], rgb(0x090));
        for slot in &half[2..] {
            assert_eq!(*slot, rgb(0x111));
        }
    }

    #[test]
    fn empty_or_oversized_lists_are_rejected() {
        let mut s = Session::new();
        assert_eq!(
            s.palette_low(&[], false),
            Err(CdgError::AmbiguousFill { got: 0, want: 8 })
        );
        assert!(matches!(
            s.palette_low(&[rgb(0x111); 9], false),
            Err(CdgError::PaletteRange { what: "half-palette colors", .. })
        ));
        assert_eq!(s.packet_count(), 0);
    }

    #[test]
    fn stateless_packer_has_no_prior_values_to_retain() {
        assert_eq!(
            pack_palette_half(&[rgb(0x123)], false),
            Err(CdgError::AmbiguousFill { got: 1, want: 8 })
        );
        assert!(pack_palette_half(&[rgb(0x123)], true).is_ok());
    }

    fn target_palette() -> Palette {
        let mut colors = [Color12::BLACK; 16];
        for (i, c) in colors.iter_mut().enumerate() {
            *c = Color12::new(i as u8, (15 - i) as u8, 7).unwrap();
        }
        Palette::from_colors(colors)
    }

    #[test]
    fn fade_in_cadence_and_exact_final_palette() {
        let speed = 10;
        let target = target_palette();
        let mut s = Session::new();
        s.fade_in(speed, &target);

        // 15 steps of (low + high + `speed` padding slots).
        assert_eq!(s.packet_count(), 15 * (2 + speed as usize));
        assert_eq!(s.palette(), &target);

        // Last step: two palette packets carrying the exact target,
        // then the padding tail.
        let p = packets(&s);
        let last_loads = &p[p.len() - 2 - speed as usize..];
        let mut check = Session::new();
        check.load_palette(&target);
        let want = packets(&check);
        assert_eq!(last_loads[0], want[0]);
        assert_eq!(last_loads[1], want[1]);
        assert!(last_loads[2..].iter().all(|pkt| pkt[..] == NO_OP[..]));
    }

    #[test]
    fn fade_out_ends_black() {
        let mut s = Session::new();
        let target = target_palette();
        s.load_palette(&target);
        s.fade_out(3, &target);
        assert_eq!(s.palette(), &Palette::new());
        assert_eq!(s.packet_count(), 2 + 15 * (2 + 3));
    }

    #[test]
    fn fade_steps_are_monotonic() {
        let target = target_palette();
        let mut prev = target.dimmed(15);
        for step in 1..=15u8 {
            let cur = target.dimmed(15 - step);
            for i in 0..16 {
                let idx = PaletteIndex::new(i).unwrap();
                assert!(cur.get(idx).r() >= prev.get(idx).r());
                assert!(cur.get(idx).g() >= prev.get(idx).g());
                assert!(cur.get(idx).b() >= prev.get(idx).b());
            }
            prev = cur;
        }
    }
}
