use iced_core::{Color, Point, Size};

use crate::bar::{Bar, BarSeries};
use crate::config::ChartConfig;
use crate::config::theme::Colors;
use crate::timeframe::Timeframe;

use super::labels::{self, PriceLabel, TimeLabel};
use super::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Main,
    PriceAxis,
    TimeAxis,
}

/// How a text command sits relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Centered on the position.
    Center,
    /// Starts at the position, vertically centered.
    West,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        color: Color,
        dashed: bool,
    },
    Rect {
        top_left: Point,
        size: Size,
        color: Color,
    },
    Text {
        content: String,
        position: Point,
        color: Color,
        anchor: Anchor,
    },
}

/// One frame worth of draw commands, per surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub main: Vec<DrawCommand>,
    pub price_axis: Vec<DrawCommand>,
    pub time_axis: Vec<DrawCommand>,
}

impl Scene {
    pub fn surface(&self, surface: Surface) -> &[DrawCommand] {
        match surface {
            Surface::Main => &self.main,
            Surface::PriceAxis => &self.price_axis,
            Surface::TimeAxis => &self.time_axis,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.price_axis.is_empty() && self.time_axis.is_empty()
    }
}

/// Full immediate-mode pass: grid, visible candles, then both axis strips.
pub fn render(
    series: &BarSeries,
    viewport: &Viewport,
    timeframe: Timeframe,
    config: &ChartConfig,
    colors: &Colors,
) -> Scene {
    let surface = |surface| render_surface(surface, series, viewport, timeframe, config, colors);

    Scene {
        main: surface(Surface::Main),
        price_axis: surface(Surface::PriceAxis),
        time_axis: surface(Surface::TimeAxis),
    }
}

/// Draw commands for a single surface, planning only the labels it needs.
pub fn render_surface(
    surface: Surface,
    series: &BarSeries,
    viewport: &Viewport,
    timeframe: Timeframe,
    config: &ChartConfig,
    colors: &Colors,
) -> Vec<DrawCommand> {
    let offset = config.layout.label_offset;

    match surface {
        Surface::Main => {
            let price_labels = labels::price_labels(series, viewport, &config.labels);
            let time_labels = labels::time_labels(series, viewport, timeframe, &config.labels);

            let mut main = Vec::with_capacity(
                price_labels.len() + time_labels.len() + 2 * viewport.visible_range().len(),
            );

            grid(&mut main, viewport, &price_labels, &time_labels, colors.grid);

            for index in viewport.visible_range() {
                if let Some(bar) = series.get(index) {
                    candle(&mut main, viewport, index, bar, colors);
                }
            }

            main
        }
        Surface::PriceAxis => labels::price_labels(series, viewport, &config.labels)
            .into_iter()
            .map(|label| DrawCommand::Text {
                content: label.text,
                position: Point::new(offset, label.y),
                color: colors.text,
                anchor: Anchor::West,
            })
            .collect(),
        Surface::TimeAxis => labels::time_labels(series, viewport, timeframe, &config.labels)
            .into_iter()
            .map(|label| DrawCommand::Text {
                content: label.text,
                position: Point::new(label.x, offset),
                color: colors.text,
                anchor: Anchor::Center,
            })
            .collect(),
    }
}

fn grid(
    commands: &mut Vec<DrawCommand>,
    viewport: &Viewport,
    price_labels: &[PriceLabel],
    time_labels: &[TimeLabel],
    color: Color,
) {
    let Size { width, height } = viewport.size();

    commands.extend(price_labels.iter().map(|label| DrawCommand::Line {
        from: Point::new(0.0, label.y),
        to: Point::new(width, label.y),
        color,
        dashed: true,
    }));

    commands.extend(time_labels.iter().map(|label| DrawCommand::Line {
        from: Point::new(label.x, 0.0),
        to: Point::new(label.x, height),
        color,
        dashed: true,
    }));
}

fn candle(
    commands: &mut Vec<DrawCommand>,
    viewport: &Viewport,
    index: usize,
    bar: &Bar,
    colors: &Colors,
) {
    let color = if bar.is_bullish() {
        colors.bullish
    } else {
        colors.bearish
    };

    let x = viewport.index_to_x(index);
    let width = viewport.candle_width();

    let y_open = viewport.price_to_y(bar.open);
    let y_close = viewport.price_to_y(bar.close);

    commands.push(DrawCommand::Line {
        from: Point::new(x, viewport.price_to_y(bar.high)),
        to: Point::new(x, viewport.price_to_y(bar.low)),
        color,
        dashed: false,
    });

    commands.push(DrawCommand::Rect {
        top_left: Point::new(x - width / 2.0, y_open.min(y_close)),
        size: Size::new(width, (y_open - y_close).abs().max(1.0)),
        color,
    });
}
