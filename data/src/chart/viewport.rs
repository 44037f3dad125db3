use std::ops::Range;

use iced_core::{Size, Vector};

use crate::bar::BarSeries;
use crate::config::LayoutConfig;

/// Price ranges narrower than this are drawn as flat.
const MIN_PRICE_RANGE: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Continuous zoom of one axis plus its step-quantized label echo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub factor: f32,
    pub label: f32,
}

impl Default for AxisScale {
    fn default() -> Self {
        Self {
            factor: 1.0,
            label: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportState {
    pub x: AxisScale,
    pub y: AxisScale,
    /// Pan offset in unscaled chart units.
    pub translation: Vector,
}

impl ViewportState {
    pub fn scale(&self, axis: Axis) -> AxisScale {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn scale_mut(&mut self, axis: Axis) -> &mut AxisScale {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Pans the scene by a pixel delta at the current zoom.
    pub fn translate(&mut self, delta: Vector) {
        self.translation.x += delta.x / self.x.factor.max(f32::EPSILON);
        self.translation.y += delta.y / self.y.factor.max(f32::EPSILON);
    }
}

/// Snapshot mapping (bar index, price) to pixels for one canvas size.
///
/// Prices are scaled about the vertical midpoint of the canvas, bar positions
/// about the newest bar's anchor at `width - margin`. Both homotheties are
/// applied after the pan, so panning moves content by exactly the pixel delta.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    state: ViewportState,
    layout: LayoutConfig,
    size: Size,
    price_min: f32,
    price_range: f32,
    len: usize,
}

impl Viewport {
    pub fn new(series: &BarSeries, state: ViewportState, layout: LayoutConfig, size: Size) -> Self {
        Self {
            state,
            layout,
            size: Size::new(size.width.max(0.0), size.height.max(0.0)),
            price_min: series.price_min(),
            price_range: series.price_range().max(0.0),
            len: series.len(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    fn scale_x(&self) -> f32 {
        self.state.x.factor.max(f32::EPSILON)
    }

    fn scale_y(&self) -> f32 {
        self.state.y.factor.max(f32::EPSILON)
    }

    fn render_height(&self) -> f32 {
        self.layout.height_ratio.clamp(0.0, 1.0) * self.size.height
    }

    fn anchor_x(&self) -> f32 {
        self.size.width - self.layout.margin
    }

    fn spacing(&self) -> f32 {
        self.layout.candle_spacing.max(f32::EPSILON)
    }

    fn is_flat(&self) -> bool {
        self.price_range <= MIN_PRICE_RANGE
    }

    pub fn price_to_y(&self, price: f32) -> f32 {
        let height = self.size.height;
        let render_height = self.render_height();
        let center = height / 2.0;

        let fraction = if self.is_flat() {
            0.5
        } else {
            (price - self.price_min) / self.price_range
        };

        let chart_y = (height - render_height) / 2.0 + (1.0 - fraction) * render_height;

        center + self.scale_y() * (chart_y - center + self.state.translation.y)
    }

    pub fn index_to_x(&self, index: usize) -> f32 {
        let from_latest = self.len as f32 - 1.0 - index as f32;

        self.anchor_x() + self.scale_x() * (self.state.translation.x - from_latest * self.spacing())
    }

    /// Fractional bar index under a horizontal pixel position.
    pub fn x_to_index(&self, x: f32) -> f32 {
        let from_latest =
            (self.state.translation.x - (x - self.anchor_x()) / self.scale_x()) / self.spacing();

        self.len as f32 - 1.0 - from_latest
    }

    /// Bars whose body can intersect `[0, width]`.
    pub fn visible_range(&self) -> Range<usize> {
        if self.len == 0 || self.size.width <= 0.0 {
            return 0..0;
        }

        let half_body = self.candle_width() / 2.0;

        let start = self.x_to_index(-half_body).floor().max(0.0);
        let end = (self.x_to_index(self.size.width + half_body).ceil() + 1.0).min(self.len as f32);

        if start < end {
            start as usize..end as usize
        } else {
            0..0
        }
    }

    pub fn candle_width(&self) -> f32 {
        self.layout.candle_width * self.scale_x()
    }
}
