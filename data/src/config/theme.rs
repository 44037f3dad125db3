use iced_core::Color;
use palette::{LinSrgb, Mix, Srgb};
use serde::{Deserialize, Serialize};

/// Chart colors as hex strings, resolved to [`Colors`] once per chart.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub background: String,
    pub text: String,
    pub bullish: String,
    pub bearish: String,
    /// Explicit grid color; when absent the grid is mixed from background toward text.
    pub grid: Option<String>,
    pub grid_mix: f32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#181616".to_string(),
            text: "#C5C9C5".to_string(),
            bullish: "#51CDA0".to_string(),
            bearish: "#C0504D".to_string(),
            grid: None,
            grid_mix: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colors {
    pub background: Color,
    pub text: Color,
    pub grid: Color,
    pub bullish: Color,
    pub bearish: Color,
}

impl ThemeConfig {
    pub fn colors(&self) -> Colors {
        let defaults = ThemeConfig::default();

        let resolve = |hex: &str, fallback: &str| {
            hex_to_color(hex).unwrap_or_else(|| {
                log::warn!("invalid color `{hex}`, using {fallback}");
                hex_to_color(fallback).unwrap_or(Color::BLACK)
            })
        };

        let background = resolve(&self.background, &defaults.background);
        let text = resolve(&self.text, &defaults.text);

        let grid = self
            .grid
            .as_deref()
            .and_then(hex_to_color)
            .unwrap_or_else(|| mix(background, text, self.grid_mix));

        Colors {
            background,
            text,
            grid,
            bullish: resolve(&self.bullish, &defaults.bullish),
            bearish: resolve(&self.bearish, &defaults.bearish),
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        ThemeConfig::default().colors()
    }
}

/// Parses `#RRGGBB` or `#RRGGBBAA`.
pub fn hex_to_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;

    if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    let alpha = if digits.len() == 8 { channel(6)? } else { u8::MAX };

    Some(Color::from_rgba8(
        channel(0)?,
        channel(2)?,
        channel(4)?,
        f32::from(alpha) / 255.0,
    ))
}

/// Linear-light blend, `factor` 0 keeps `from`, 1 reaches `to`.
pub fn mix(from: Color, to: Color, factor: f32) -> Color {
    let from: LinSrgb = Srgb::new(from.r, from.g, from.b).into_linear();
    let to: LinSrgb = Srgb::new(to.r, to.g, to.b).into_linear();

    let mixed: Srgb = Srgb::from_linear(from.mix(to, factor.clamp(0.0, 1.0)));

    Color::from_rgb(mixed.red, mixed.green, mixed.blue)
}
