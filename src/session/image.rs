/// Fast-color image rendering.
///
/// The collaborator type `IndexedImage` is an already-quantized pixel
/// grid (palette indices) plus its extracted ≤16-entry palette — image
/// decoding and quantization happen outside the encoder. The one
/// rendering mode here is the "fast color" reduction: each 6×12 block
/// keeps only its two most frequent colors, which is the fastest way
/// the format can paint a full-screen image. More than two distinct
/// colors per tile are irretrievably collapsed — speed traded against
/// fidelity.

use crate::domain::color::{Color12, Palette, PaletteIndex, PALETTE_SIZE};
use crate::domain::tile::{Direction, TileCoord, TilePattern, TILE_COLS, TILE_HEIGHT, TILE_ROWS, TILE_WIDTH};
use crate::error::CdgError;
use crate::session::Session;

/// A palette-indexed pixel grid with its palette.
pub struct IndexedImage {
    width: usize,
    height: usize,
    /// Row-major palette indices, one byte per pixel.
    pixels: Vec<u8>,
    palette: Vec<Color12>,
}

impl IndexedImage {
    pub fn new(
        width: usize,
        height: usize,
        pixels: Vec<u8>,
        palette: Vec<Color12>,
    ) -> Result<Self, CdgError> {
        if palette.is_empty() {
            return Err(CdgError::AmbiguousFill { got: 0, want: PALETTE_SIZE });
        }
        if palette.len() > PALETTE_SIZE {
            return Err(CdgError::PaletteRange {
                what: "image palette entries",
                value: palette.len(),
                max: PALETTE_SIZE,
            });
        }
        if pixels.len() != width * height {
            return Err(CdgError::InvalidPayload { got: pixels.len(), max: width * height });
        }
        if let Some(&bad) = pixels.iter().find(|&&p| p as usize >= palette.len()) {
            return Err(CdgError::PaletteRange {
                what: "pixel color index",
                value: bad as usize,
                max: palette.len() - 1,
            });
        }
        Ok(IndexedImage { width, height, pixels, palette })
    }

    /// Parse the plain-text image format:
    ///
    /// ```text
    /// # comment
    /// palette 000 FFF F00 0F0
    /// 00112233
    /// 01122330
    /// ```
    ///
    /// `palette` lines list 12-bit hex colors (several lines append);
    /// every other non-comment line is a row of hex-digit pixels.
    /// Width comes from the first row; shorter rows pad with index 0,
    /// longer ones truncate.
    pub fn parse(text: &str) -> Result<Self, CdgError> {
        let mut palette = Vec::new();
        let mut rows: Vec<Vec<u8>> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(entries) = line.strip_prefix("palette") {
                for entry in entries.split_whitespace() {
                    let bits = u16::from_str_radix(entry, 16).map_err(|_| {
                        CdgError::PaletteRange {
                            what: "palette entry",
                            value: 0x1000,
                            max: 0xFFF,
                        }
                    })?;
                    palette.push(Color12::from_bits(bits)?);
                }
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                let digit = ch.to_digit(16).ok_or(CdgError::PaletteRange {
                    what: "pixel digit",
                    value: ch as usize,
                    max: 15,
                })?;
                row.push(digit as u8);
            }
            rows.push(row);
        }

        let width = rows.first().map_or(0, |r| r.len());
        let height = rows.len();
        let mut pixels = Vec::with_capacity(width * height);
        for mut row in rows {
            row.resize(width, 0);
            pixels.extend_from_slice(&row);
        }
        IndexedImage::new(width, height, pixels, palette)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn palette(&self) -> &[Color12] {
        &self.palette
    }

    /// The image palette as a full 16-slot palette, unused slots black.
    pub fn to_palette(&self) -> Palette {
        let mut colors = [Color12::BLACK; PALETTE_SIZE];
        colors[..self.palette.len()].copy_from_slice(&self.palette);
        Palette::from_colors(colors)
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    /// Dominant-color reduction of one 6×12 block: returns the most
    /// frequent color, the second most frequent, and the 1-bit pattern
    /// with a set bit exactly where a pixel matches the dominant
    /// color. Ties pick the lower palette index.
    pub fn reduce_tile(
        &self,
        tile_col: usize,
        band: usize,
    ) -> (PaletteIndex, PaletteIndex, TilePattern) {
        let x0 = tile_col * TILE_WIDTH;
        let y0 = band * TILE_HEIGHT;
        let mut freq = [0usize; PALETTE_SIZE];
        for y in 0..TILE_HEIGHT {
            for x in 0..TILE_WIDTH {
                freq[self.pixel(x0 + x, y0 + y) as usize] += 1;
            }
        }

        let mut dominant = 0;
        for (i, &count) in freq.iter().enumerate() {
            if count > freq[dominant] {
                dominant = i;
            }
        }
        let mut secondary = if dominant == 0 { 1 } else { 0 };
        for (i, &count) in freq.iter().enumerate() {
            if i != dominant && count > freq[secondary] {
                secondary = i;
            }
        }

        let pattern =
            TilePattern::from_fn(|x, y| self.pixel(x0 + x, y0 + y) as usize == dominant);
        (
            PaletteIndex::from_nibble(dominant as u8),
            PaletteIndex::from_nibble(secondary as u8),
            pattern,
        )
    }
}

impl Session {
    /// Scroll an image into view from the bottom, one 12-pixel band at
    /// a time: 12 single-pixel scroll-ups, a row of fast-color reduced
    /// tiles on the bottom tile row, then `speed` padding ticks before
    /// the next band. Bands beyond the screen's 50 tile columns, and
    /// the partial band at the image's bottom edge, are dropped.
    pub fn scroll_image_up(&mut self, image: &IndexedImage, speed: u32) -> Result<(), CdgError> {
        let bands = image.height() / TILE_HEIGHT;
        let cols = (image.width() / TILE_WIDTH).min(TILE_COLS);
        for band in 0..bands {
            for _ in 0..TILE_HEIGHT {
                self.smooth_scroll(Direction::Up);
            }
            for tile_col in 0..cols {
                let (dominant, secondary, pattern) = image.reduce_tile(tile_col, band);
                let coord = TileCoord::new(TILE_ROWS - 1, tile_col)?;
                // Set bits mark the dominant color, so it rides in the
                // B slot; everything else collapses to the secondary.
                self.write_tile(coord, secondary, dominant, pattern, false);
            }
            self.delay_ticks(speed);
        }
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::packet::{Instruction, PACKET_SIZE};

    fn rgb(bits: u16) -> Color12 {
        Color12::from_bits(bits).unwrap()
    }

    /// One-tile image whose pixel indices come from a per-pixel rule.
    fn tile_image(f: impl Fn(usize, usize) -> u8) -> IndexedImage {
        let mut pixels = Vec::new();
        for y in 0..TILE_HEIGHT {
            for x in 0..TILE_WIDTH {
                pixels.push(f(x, y));
            }
        }
        IndexedImage::new(TILE_WIDTH, TILE_HEIGHT, pixels, vec![rgb(0x111); 16]).unwrap()
    }

    #[test]
    fn new_validates_dimensions_and_indices() {
        assert!(matches!(
            IndexedImage::new(4, 4, vec![0; 15], vec![rgb(0x111)]),
            Err(CdgError::InvalidPayload { got: 15, max: 16 })
        ));
        assert!(matches!(
            IndexedImage::new(2, 2, vec![0, 0, 0, 3], vec![rgb(0x111); 2]),
            Err(CdgError::PaletteRange { what: "pixel color index", .. })
        ));
        assert!(IndexedImage::new(0, 0, vec![], vec![rgb(0x111)]).is_ok());
    }

    #[test]
    fn parse_reads_palette_and_rows() {
        let img = IndexedImage::parse(
            "# two-color checker\n\
             palette 000 FFF\n\
             0101\n\
             1010\n",
        )
        .unwrap();
        assert_eq!((img.width(), img.height()), (4, 2));
        assert_eq!(img.palette(), &[rgb(0x000), rgb(0xFFF)]);
        assert_eq!(img.pixel(0, 0), 0);
        assert_eq!(img.pixel(1, 0), 1);
        assert_eq!(img.pixel(0, 1), 1);
    }

    #[test]
    fn parse_rejects_non_hex_pixels() {
        assert!(matches!(
            IndexedImage::parse("palette 000\n00g0\n"),
            Err(CdgError::PaletteRange { what: "pixel digit", .. })
        ));
    }

    #[test]
    fn parse_pads_short_rows() {
        let img = IndexedImage::parse("palette 000 111 222 333\n123\n1\n").unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.pixel(1, 1), 0);
    }

    #[test]
    fn to_palette_pads_with_black() {
        let img = IndexedImage::parse("palette 123 456\n01\n").unwrap();
        let p = img.to_palette();
        assert_eq!(p.get(PaletteIndex::new(1).unwrap()), rgb(0x456));
        assert_eq!(p.get(PaletteIndex::new(15).unwrap()), Color12::BLACK);
    }

    // ── Dominant-color reduction ──

    #[test]
    fn flat_tile_is_all_dominant() {
        let img = tile_image(|_, _| 6);
        let (dominant, secondary, pattern) = img.reduce_tile(0, 0);
        assert_eq!(dominant.value(), 6);
        assert_ne!(secondary.value(), 6);
        assert_eq!(pattern, TilePattern::FULL);
    }

    #[test]
    fn two_color_tile_keeps_both_exactly() {
        // 48 pixels of color 2, 24 of color 9.
        let img = tile_image(|x, _| if x < 4 { 2 } else { 9 });
        let (dominant, secondary, pattern) = img.reduce_tile(0, 0);
        assert_eq!(dominant.value(), 2);
        assert_eq!(secondary.value(), 9);
        for y in 0..TILE_HEIGHT {
            for x in 0..TILE_WIDTH {
                assert_eq!(pattern.pixel(x, y), x < 4);
            }
        }
    }

    #[test]
    fn minority_colors_collapse_to_secondary() {
        // Frequencies: color 5 → 36, color 2 → 24, color 9 → 12.
        let img = tile_image(|x, _| match x {
            0..=2 => 5,
            3 | 4 => 2,
            _ => 9,
        });
        let (dominant, secondary, pattern) = img.reduce_tile(0, 0);
        assert_eq!(dominant.value(), 5);
        assert_eq!(secondary.value(), 2);
        // Color 9's pixels read as clear bits = secondary color: the
        // third color is gone from the 1-bit output.
        assert!(!pattern.pixel(5, 0));
    }

    #[test]
    fn frequency_ties_pick_lower_index() {
        let img = tile_image(|x, _| if x < 3 { 7 } else { 3 });
        let (dominant, secondary, _) = img.reduce_tile(0, 0);
        assert_eq!(dominant.value(), 3);
        assert_eq!(secondary.value(), 7);
    }

    // ── scroll_image_up ──

    #[test]
    fn band_emits_scrolls_tiles_then_padding() {
        // Two tiles wide, one band tall.
        let mut pixels = Vec::new();
        for _ in 0..TILE_HEIGHT {
            for x in 0..(2 * TILE_WIDTH) {
                pixels.push(if x < TILE_WIDTH { 1 } else { 4 });
            }
        }
        let img =
            IndexedImage::new(2 * TILE_WIDTH, TILE_HEIGHT, pixels, vec![rgb(0x111); 16]).unwrap();

        let mut s = Session::new();
        s.scroll_image_up(&img, 4).unwrap();

        let packets: Vec<Vec<u8>> =
            s.buffer().chunks(PACKET_SIZE).map(|c| c.to_vec()).collect();
        assert_eq!(packets.len(), TILE_HEIGHT + 2 + 4);
        for p in &packets[..TILE_HEIGHT] {
            assert_eq!(p[1] & 0x3F, Instruction::ScrollPreset as u8);
        }
        // Tiles land on the bottom row, columns in order, dominant
        // color in the B slot.
        let tile0 = &packets[TILE_HEIGHT];
        assert_eq!(tile0[1] & 0x3F, Instruction::TileBlock as u8);
        assert_eq!(&tile0[4..8], &[0, 1, (TILE_ROWS - 1) as u8, 0]);
        let tile1 = &packets[TILE_HEIGHT + 1];
        assert_eq!(&tile1[4..8], &[0, 4, (TILE_ROWS - 1) as u8, 1]);
        for p in &packets[TILE_HEIGHT + 2..] {
            assert!(p.iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn partial_bottom_band_is_dropped() {
        let img = IndexedImage::new(
            TILE_WIDTH,
            TILE_HEIGHT + 5,
            vec![0; TILE_WIDTH * (TILE_HEIGHT + 5)],
            vec![rgb(0x111)],
        )
        .unwrap();
        let mut s = Session::new();
        s.scroll_image_up(&img, 0).unwrap();
        // One full band only: 12 scrolls + 1 tile.
        assert_eq!(s.packet_count(), TILE_HEIGHT + 1);
    }

    #[test]
    fn narrow_or_short_images_emit_nothing() {
        let img = IndexedImage::new(3, 3, vec![0; 9], vec![rgb(0x111)]).unwrap();
        let mut s = Session::new();
        s.scroll_image_up(&img, 5).unwrap();
        assert_eq!(s.packet_count(), 0);
    }
}
