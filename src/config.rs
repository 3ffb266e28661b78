/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct CardConfig {
    pub timing: TimingConfig,
    pub confetti: ConfettiConfig,
    pub card: CardText,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    pub wish_delay_ticks: u32,   // ticks between "all candles blown" and Surprise
    pub gift_delay_ticks: u32,   // ticks between "accept gift" and Finale
}

#[derive(Clone, Debug)]
pub struct ConfettiConfig {
    pub wish_count: usize,
    pub wish_life: u32,
    pub gift_count: usize,
    pub gift_life: u32,
    pub gravity: f32,    // per-tick downward acceleration, in cells
    pub drift: f32,      // max lateral speed either way
    pub lift_min: f32,   // minimum upward launch speed
    pub lift_span: f32,  // random extra upward speed on top of lift_min
}

#[derive(Clone, Debug)]
pub struct CardText {
    pub recipient: String,
    pub sender: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    confetti: TomlConfetti,
    #[serde(default)]
    card: TomlCard,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_wish_delay")]
    wish_delay_ticks: u32,
    #[serde(default = "default_gift_delay")]
    gift_delay_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlConfetti {
    #[serde(default = "default_wish_count")]
    wish_count: usize,
    #[serde(default = "default_wish_life")]
    wish_life: u32,
    #[serde(default = "default_gift_count")]
    gift_count: usize,
    #[serde(default = "default_gift_life")]
    gift_life: u32,
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_drift")]
    drift: f32,
    #[serde(default = "default_lift_min")]
    lift_min: f32,
    #[serde(default = "default_lift_span")]
    lift_span: f32,
}

#[derive(Deserialize, Debug, Default)]
struct TomlCard {
    #[serde(default)]
    recipient: String,
    #[serde(default)]
    sender: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 60 }
fn default_wish_delay() -> u32 { 42 }   // ~2.5s at 60ms ticks
fn default_gift_delay() -> u32 { 33 }   // ~2s at 60ms ticks

fn default_wish_count() -> usize { 30 }
fn default_wish_life() -> u32 { 80 }    // ~4.8s airborne
fn default_gift_count() -> usize { 50 }
fn default_gift_life() -> u32 { 100 }   // ~6s airborne
fn default_gravity() -> f32 { 0.08 }
fn default_drift() -> f32 { 1.6 }
fn default_lift_min() -> f32 { 0.8 }
fn default_lift_span() -> f32 { 1.8 }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            wish_delay_ticks: default_wish_delay(),
            gift_delay_ticks: default_gift_delay(),
        }
    }
}

impl Default for TomlConfetti {
    fn default() -> Self {
        TomlConfetti {
            wish_count: default_wish_count(),
            wish_life: default_wish_life(),
            gift_count: default_gift_count(),
            gift_life: default_gift_life(),
            gravity: default_gravity(),
            drift: default_drift(),
            lift_min: default_lift_min(),
            lift_span: default_lift_span(),
        }
    }
}

// ── Loading ──

impl CardConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        CardConfig {
            timing: TimingConfig {
                tick_rate_ms: toml_cfg.timing.tick_rate_ms.max(1),
                wish_delay_ticks: toml_cfg.timing.wish_delay_ticks,
                gift_delay_ticks: toml_cfg.timing.gift_delay_ticks,
            },
            confetti: ConfettiConfig {
                wish_count: toml_cfg.confetti.wish_count,
                wish_life: toml_cfg.confetti.wish_life,
                gift_count: toml_cfg.confetti.gift_count,
                gift_life: toml_cfg.confetti.gift_life,
                gravity: toml_cfg.confetti.gravity,
                drift: toml_cfg.confetti.drift,
                lift_min: toml_cfg.confetti.lift_min,
                lift_span: toml_cfg.confetti.lift_span,
            },
            card: CardText {
                recipient: toml_cfg.card.recipient,
                sender: toml_cfg.card.sender,
            },
        }
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
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
    fn empty_toml_gives_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.timing.tick_rate_ms, 60);
        assert_eq!(cfg.timing.wish_delay_ticks, 42);
        assert_eq!(cfg.confetti.wish_count, 30);
        assert_eq!(cfg.confetti.gift_life, 100);
        assert!(cfg.card.recipient.is_empty());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg: TomlConfig = toml::from_str(
            "[timing]\ntick_rate_ms = 30\n\n[card]\nrecipient = \"A\"\n",
        )
        .unwrap();
        assert_eq!(cfg.timing.tick_rate_ms, 30);
        assert_eq!(cfg.timing.gift_delay_ticks, 33);
        assert_eq!(cfg.card.recipient, "A");
        assert_eq!(cfg.confetti.gift_count, 50);
    }

    #[test]
    fn zero_tick_rate_is_clamped() {
        let cfg = CardConfig::from_toml(
            toml::from_str("[timing]\ntick_rate_ms = 0\n").unwrap(),
        );
        assert_eq!(cfg.timing.tick_rate_ms, 1);
    }
}
