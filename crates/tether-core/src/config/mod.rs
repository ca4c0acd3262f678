mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;

pub use loader::{config_dir, config_path, load, try_load};

/// Top-level configuration for Tether.
///
/// Loaded from `~/.config/tether/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Overlay appearance settings.
    pub overlay: OverlayConfig,
    /// File logging settings.
    pub logging: LogConfig,
}

/// Overlay appearance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Hex fill color (e.g. "#1e66f5").
    pub color: String,
    /// Opacity from 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: "#1e66f5".into(),
            opacity: 0.35,
        }
    }
}

impl OverlayConfig {
    /// The fill color, or the default blue if `color` is not valid hex.
    pub fn color(&self) -> Color {
        Color::from_hex(&self.color).unwrap_or(Color {
            r: 0x1E,
            g: 0x66,
            b: 0xF5,
        })
    }

    /// Opacity scaled to a layered-window alpha byte.
    pub fn alpha(&self) -> u8 {
        (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

impl Config {
    /// Clamps overlay values to safe ranges.
    ///
    /// A fully transparent overlay would look like a broken one, so the
    /// opacity never drops below 5%.
    pub fn validate(&mut self) {
        self.overlay.opacity = if self.overlay.opacity.is_nan() {
            OverlayConfig::default().opacity
        } else {
            self.overlay.opacity.clamp(0.05, 1.0)
        };
        if Color::from_hex(&self.overlay.color).is_none() {
            tracing::warn!(color = %self.overlay.color, "invalid overlay color, using default");
            self.overlay.color = OverlayConfig::default().color;
        }
    }
}

/// RGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Parses a hex color string like "#00b4d8" or "00b4d8".
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        Some(Self {
            r: u8::from_str_radix(&hex[0..2], 16).ok()?,
            g: u8::from_str_radix(&hex[2..4], 16).ok()?,
            b: u8::from_str_radix(&hex[4..6], 16).ok()?,
        })
    }
}
