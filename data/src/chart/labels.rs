use crate::bar::BarSeries;
use crate::config::LabelConfig;
use crate::timeframe::Timeframe;

use super::viewport::Viewport;

// enough to lift any positive f32 above 10
const MAX_NORMALIZE_STEPS: u32 = 48;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceLabel {
    pub price: f32,
    pub y: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeLabel {
    pub index: usize,
    pub x: f32,
    pub text: String,
}

/// Real-price distance between neighbouring price labels.
///
/// The mean high-low spread is lifted by powers of ten above 10, rounded to
/// a base step of 50 or 100, brought back down and divided by the label scale.
pub fn price_increment(series: &BarSeries, levels: u32, label_scale: f32) -> f32 {
    let increment = normalized_step(series.mean_spread()).unwrap_or_else(|| {
        let range = series.price_range();
        if range > 0.0 {
            range / (2 * levels.max(1)) as f32
        } else {
            1.0
        }
    });

    increment / label_scale.max(f32::EPSILON)
}

fn normalized_step(mean_spread: f32) -> Option<f32> {
    if !(mean_spread.is_finite() && mean_spread > 0.0) {
        return None;
    }

    let mut value = mean_spread;
    let mut factor = 1.0_f32;

    for _ in 0..MAX_NORMALIZE_STEPS {
        if value > 10.0 {
            break;
        }
        value *= 10.0;
        factor *= 10.0;
    }

    let base = if value <= 50.0 { 50.0 } else { 100.0 };

    Some(base / factor)
}

pub fn format_price(price: f32) -> String {
    if price.abs() < 1000.0 {
        format!("{price:.2}")
    } else {
        format!("{price:.0}")
    }
}

/// Price levels centered on the middle of the series range, clipped to it.
pub fn price_labels(series: &BarSeries, viewport: &Viewport, config: &LabelConfig) -> Vec<PriceLabel> {
    if series.is_empty() {
        return Vec::new();
    }

    let levels = config.price_levels;
    let increment = price_increment(series, levels, viewport.state().y.label);

    let (min, max) = (series.price_min(), series.price_max());
    let center = min + series.price_range() / 2.0;
    let tolerance = increment * 1e-4;

    let levels = i64::from(levels);

    (-levels..=levels)
        .map(|step| center + step as f32 * increment)
        .filter(|price| *price >= min - tolerance && *price <= max + tolerance)
        .map(|price| PriceLabel {
            price,
            y: viewport.price_to_y(price),
            text: format_price(price),
        })
        .collect()
}

/// Time ticks for the visible bars, newest first.
///
/// Candidates are every n-th bar counted from the newest (n from the zoom
/// density), on a boundary of `timeframe`, inside the canvas and at least
/// `min_time_spacing` pixels away from the previous emitted tick.
pub fn time_labels(
    series: &BarSeries,
    viewport: &Viewport,
    timeframe: Timeframe,
    config: &LabelConfig,
) -> Vec<TimeLabel> {
    let Some(latest) = series.len().checked_sub(1) else {
        return Vec::new();
    };

    let width = viewport.size().width;
    let divisor = config.density_divisor(viewport.state().x.factor);

    let mut labels: Vec<TimeLabel> = Vec::new();

    for index in viewport.visible_range().rev() {
        if (latest - index) % divisor != 0 {
            continue;
        }

        let Some(bar) = series.get(index) else {
            continue;
        };

        let x = viewport.index_to_x(index);
        if !(0.0..=width).contains(&x) || !timeframe.is_boundary(&bar.time) {
            continue;
        }

        if labels
            .last()
            .is_some_and(|previous| (previous.x - x).abs() < config.min_time_spacing)
        {
            continue;
        }

        labels.push(TimeLabel {
            index,
            x,
            text: timeframe.format(&bar.time),
        });
    }

    labels
}
