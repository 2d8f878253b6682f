/// Demo-binary configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or
/// incomplete. Only the demo script uses this — the encoder library
/// itself takes no configuration.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct DemoConfig {
    /// Where the packet stream lands.
    pub output: PathBuf,
    /// Text printed before the fade-in.
    pub text: String,
    /// Padding ticks per fade interpolation step.
    pub fade_speed: u32,
    /// Padding ticks after each image band scrolled into view.
    pub band_speed: u32,
    /// Hold time on the finished picture.
    pub hold_seconds: u32,
    /// Optional text-format indexed image; built-in pattern otherwise.
    pub image: Option<PathBuf>,
    /// Dump the final screen state to the terminal after encoding.
    pub preview: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    demo: TomlDemo,
}

#[derive(Deserialize, Debug)]
struct TomlDemo {
    #[serde(default = "default_output")]
    output: String,
    #[serde(default = "default_text")]
    text: String,
    #[serde(default = "default_fade_speed")]
    fade_speed: u32,
    #[serde(default = "default_band_speed")]
    band_speed: u32,
    #[serde(default = "default_hold_seconds")]
    hold_seconds: u32,
    #[serde(default)]
    image: Option<String>,
    #[serde(default = "default_preview")]
    preview: bool,
}

// ── Defaults ──

fn default_output() -> String { "out.cdg".into() }
fn default_text() -> String { "CDGKIT DEMO".into() }
fn default_fade_speed() -> u32 { 10 }
fn default_band_speed() -> u32 { 10 }
fn default_hold_seconds() -> u32 { 5 }
fn default_preview() -> bool { true }

impl Default for TomlDemo {
    fn default() -> Self {
        TomlDemo {
            output: default_output(),
            text: default_text(),
            fade_speed: default_fade_speed(),
            band_speed: default_band_speed(),
            hold_seconds: default_hold_seconds(),
            image: None,
            preview: default_preview(),
        }
    }
}

// ── Loading ──

impl DemoConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        DemoConfig {
            output: PathBuf::from(toml_cfg.demo.output),
            text: toml_cfg.demo.text,
            fade_speed: toml_cfg.demo.fade_speed,
            band_speed: toml_cfg.demo.band_speed,
            hold_seconds: toml_cfg.demo.hold_seconds,
            image: toml_cfg.demo.image.map(PathBuf::from),
            preview: toml_cfg.demo.preview,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg: TomlConfig = toml::from_str("[demo]\ntext = \"HELLO\"\n").unwrap();
        assert_eq!(cfg.demo.text, "HELLO");
        assert_eq!(cfg.demo.output, default_output());
        assert_eq!(cfg.demo.fade_speed, default_fade_speed());
        assert!(cfg.demo.image.is_none());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.demo.hold_seconds, default_hold_seconds());
        assert!(cfg.demo.preview);
    }
}
