pub mod interaction;
pub mod labels;
pub mod render;
pub mod viewport;

use iced_core::Size;

use crate::bar::BarSeries;
use crate::config::ChartConfig;
use crate::config::theme::Colors;
use crate::timeframe::{Ladder, Timeframe};

pub use interaction::{Controller, DragSession, PointerEvent, Redraw, Region};
pub use render::{Anchor, DrawCommand, Scene, Surface};
pub use viewport::{Axis, AxisScale, Viewport, ViewportState};

/// One candlestick chart: a fixed series plus its own zoom, pan and drag state.
///
/// Construction only takes configuration. Nothing is drawn and pointer input
/// is ignored until [`Chart::attach`] supplies the laid-out canvas size.
#[derive(Debug, Clone)]
pub struct Chart {
    series: BarSeries,
    config: ChartConfig,
    colors: Colors,
    state: ViewportState,
    ladder: Ladder,
    controller: Controller,
    size: Option<Size>,
}

impl Chart {
    pub fn new(series: BarSeries, config: ChartConfig) -> Self {
        if series.is_empty() {
            log::warn!("chart created without bars");
        } else if series.price_range() <= 0.0 {
            log::debug!("flat series at {}", series.price_min());
        }

        Self {
            colors: config.theme.colors(),
            ladder: config.ladder.build(),
            state: ViewportState::default(),
            controller: Controller::default(),
            size: None,
            series,
            config,
        }
    }

    pub fn attach(&mut self, size: Size) {
        log::debug!(
            "chart attached at {}x{} with {} bars",
            size.width,
            size.height,
            self.series.len()
        );
        self.size = Some(size);
    }

    /// Records a new canvas size, attaching the chart if it was not yet.
    pub fn resize(&mut self, size: Size) -> Redraw {
        match self.size {
            Some(current) if current == size => Redraw::None,
            Some(_) => {
                log::debug!("chart resized to {}x{}", size.width, size.height);
                self.size = Some(size);
                Redraw::Full
            }
            None => {
                self.attach(size);
                Redraw::Full
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.size.is_some()
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.size
            .map(|size| Viewport::new(&self.series, self.state, self.config.layout, size))
    }

    pub fn on_pointer(&mut self, event: PointerEvent) -> Redraw {
        if !self.is_attached() {
            return Redraw::None;
        }

        self.controller.handle(
            event,
            &mut self.state,
            &mut self.ladder,
            &self.config.zoom,
        )
    }

    pub fn on_wheel(&mut self, delta: f32) -> Redraw {
        if !self.is_attached() {
            return Redraw::None;
        }

        self.controller
            .wheel(delta, &mut self.state, &mut self.ladder, &self.config.zoom)
    }

    /// Back to default zoom and pan with the initial label granularity.
    pub fn reset_view(&mut self) -> Redraw {
        self.state = ViewportState::default();
        self.ladder.set_index(self.config.ladder.initial_index);
        self.controller.reset();

        Redraw::Full
    }

    pub fn scene(&self) -> Scene {
        match self.viewport() {
            Some(viewport) => render::render(
                &self.series,
                &viewport,
                self.timeframe(),
                &self.config,
                &self.colors,
            ),
            None => Scene::default(),
        }
    }

    /// Draw commands for one surface; empty until attached.
    pub fn surface(&self, surface: Surface) -> Vec<DrawCommand> {
        match self.viewport() {
            Some(viewport) => render::render_surface(
                surface,
                &self.series,
                &viewport,
                self.timeframe(),
                &self.config,
                &self.colors,
            ),
            None => Vec::new(),
        }
    }

    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn colors(&self) -> &Colors {
        &self.colors
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    pub fn timeframe(&self) -> Timeframe {
        self.ladder.current()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.controller.session()
    }
}
