use std::path::Path;
use std::{fs, io};

use serde::{Deserialize, Serialize};

use crate::chart::viewport::Axis;
use crate::timeframe::{DEFAULT_LADDER, DEFAULT_LADDER_INDEX, Ladder};

pub mod theme;

pub use theme::ThemeConfig;

pub const CONFIG_FILE: &str = "candleview.json";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub layout: LayoutConfig,
    pub zoom: ZoomConfig,
    pub labels: LabelConfig,
    pub ladder: LadderConfig,
    pub theme: ThemeConfig,
}

/// Loads the chart configuration, falling back to defaults when the file is absent.
pub fn load(path: &Path) -> Result<ChartConfig, Error> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!("no config at {}, using defaults", path.display());
            Ok(ChartConfig::default())
        }
        Err(err) => Err(err.into()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Share of the canvas height taken by the full price range.
    pub height_ratio: f32,
    /// Gap between the newest bar and the right edge.
    pub margin: f32,
    pub candle_width: f32,
    pub candle_spacing: f32,
    pub price_axis_width: f32,
    pub time_axis_height: f32,
    pub label_offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            height_ratio: 0.9,
            margin: 50.0,
            candle_width: 10.0,
            candle_spacing: 15.0,
            price_axis_width: 100.0,
            time_axis_height: 30.0,
            label_offset: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScaleLimits {
    pub min: f32,
    pub max: f32,
}

impl ScaleLimits {
    pub fn clamp(&self, value: f32) -> f32 {
        let (min, max) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };

        value.clamp(min, max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub x: ScaleLimits,
    pub y: ScaleLimits,
    pub drag_in: f32,
    pub drag_out: f32,
    pub wheel_step: f32,
}

impl ZoomConfig {
    pub fn limits(&self, axis: Axis) -> ScaleLimits {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            x: ScaleLimits { min: 0.2, max: 4.0 },
            y: ScaleLimits { min: 0.5, max: 4.0 },
            drag_in: 1.02,
            drag_out: 0.98,
            wheel_step: 1.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Price labels on each side of the mid price.
    pub price_levels: u32,
    pub min_time_spacing: f32,
    pub sparse_below: f32,
    pub dense_above: f32,
    pub sparse_divisor: usize,
    pub normal_divisor: usize,
    pub dense_divisor: usize,
}

impl LabelConfig {
    /// Every n-th bar is a time label candidate at this horizontal zoom.
    pub fn density_divisor(&self, scale_x: f32) -> usize {
        let divisor = if scale_x < self.sparse_below {
            self.sparse_divisor
        } else if scale_x > self.dense_above {
            self.dense_divisor
        } else {
            self.normal_divisor
        };

        divisor.max(1)
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            price_levels: 7,
            min_time_spacing: 30.0,
            sparse_below: 0.5,
            dense_above: 2.0,
            sparse_divisor: 5,
            normal_divisor: 3,
            dense_divisor: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LadderConfig {
    pub timeframes: Vec<String>,
    pub initial_index: usize,
}

impl LadderConfig {
    pub fn build(&self) -> Ladder {
        Ladder::from_labels(&self.timeframes, self.initial_index)
    }
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            timeframes: DEFAULT_LADDER.iter().map(ToString::to_string).collect(),
            initial_index: DEFAULT_LADDER_INDEX,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ChartConfig =
            serde_json::from_str(r#"{ "zoom": { "wheel_step": 1.25 }, "layout": { "margin": 80 } }"#)
                .unwrap();

        assert_eq!(config.zoom.wheel_step, 1.25);
        assert_eq!(config.zoom.x, ZoomConfig::default().x);
        assert_eq!(config.layout.margin, 80.0);
        assert_eq!(config.layout.candle_spacing, 15.0);
        assert_eq!(config.labels, LabelConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("candleview-config-that-does-not-exist.json");
        let config = load(&path).unwrap();

        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "candleview-malformed-{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();

        let result = load(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn density_coarsens_as_zoom_decreases() {
        let labels = LabelConfig::default();

        assert_eq!(labels.density_divisor(0.3), 5);
        assert_eq!(labels.density_divisor(1.0), 3);
        assert_eq!(labels.density_divisor(2.0), 3);
        assert_eq!(labels.density_divisor(2.5), 1);
    }

    #[test]
    fn limits_clamp_even_when_inverted() {
        let limits = ScaleLimits { min: 4.0, max: 0.2 };

        assert_eq!(limits.clamp(10.0), 4.0);
        assert_eq!(limits.clamp(0.0), 0.2);
    }
}
