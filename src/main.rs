/// Demo encoder: builds a short graphics program — title text, fade-in,
/// an image scrolled into view, fade-out — and writes the packet
/// stream to a `.cdg` file a player or burner can consume.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use cdgkit::codec::stream::TICKS_PER_SECOND;
use cdgkit::config::DemoConfig;
use cdgkit::domain::color::{Color12, PaletteIndex};
use cdgkit::domain::tile::{SCREEN_WIDTH, TILE_HEIGHT};
use cdgkit::session::{IndexedImage, Session};

fn main() {
    let mut config = DemoConfig::load();
    // A lone positional argument overrides the output path.
    if let Some(path) = env::args().nth(1) {
        config.output = PathBuf::from(path);
    }

    if let Err(e) = run(&config) {
        eprintln!("Encoding failed: {e}");
        std::process::exit(1);
    }
}

fn run(config: &DemoConfig) -> Result<(), Box<dyn Error>> {
    let image = load_image(config)?;
    let palette = image.to_palette();

    let mut session = Session::new();
    let black = PaletteIndex::new(0)?;

    // Draw everything in the dark, then fade the palette up: the title
    // appears without tile-by-tile build-up.
    session.set_border_color(black);
    session.set_screen_color(black);
    session.set_cursor(1, 1)?;
    session.print_screen(&config.text, false)?;
    session.fade_in(config.fade_speed, &palette);
    session.delay_seconds(1);

    session.scroll_image_up(&image, config.band_speed)?;
    session.delay_seconds(config.hold_seconds);
    session.fade_out(config.fade_speed, &palette);

    let bytes = session.buffer();
    fs::write(&config.output, &bytes)?;
    println!(
        "Wrote {} packets ({} bytes, {:.1} s of playback) to {}",
        session.packet_count(),
        bytes.len(),
        session.packet_count() as f64 / TICKS_PER_SECOND as f64,
        config.output.display()
    );

    #[cfg(feature = "preview")]
    if config.preview {
        cdgkit::ui::preview::render(&session)?;
    }

    Ok(())
}

/// The configured image file, or the built-in test pattern when the
/// file is absent or malformed.
fn load_image(config: &DemoConfig) -> Result<IndexedImage, Box<dyn Error>> {
    if let Some(path) = &config.image {
        match fs::read_to_string(path) {
            Ok(text) => match IndexedImage::parse(&text) {
                Ok(image) => return Ok(image),
                Err(e) => {
                    eprintln!("Warning: {} parse error: {e}", path.display());
                    eprintln!("Using the built-in test pattern.");
                }
            },
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
                eprintln!("Using the built-in test pattern.");
            }
        }
    }
    Ok(builtin_image()?)
}

/// Full-width diagonal color-band pattern, six tile rows tall, over a
/// warm 16-entry ramp. Enough structure to show the fast-color
/// reduction and the band-by-band scroll.
fn builtin_image() -> Result<IndexedImage, cdgkit::CdgError> {
    let width = SCREEN_WIDTH;
    let height = 6 * TILE_HEIGHT;
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            pixels.push((((x + 2 * y) / 12) % 16) as u8);
        }
    }
    let palette = (0..16u8)
        .map(|i| Color12::new((2 * i).min(15), i, 15 - i))
        .collect::<Result<Vec<_>, _>>()?;
    IndexedImage::new(width, height, pixels, palette)
}
