use iced_core::{Point, Vector};

use crate::config::ZoomConfig;
use crate::timeframe::Ladder;

use super::render::Surface;
use super::viewport::{Axis, ViewportState};

/// Where a pointer press landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Chart,
    PriceAxis,
    TimeAxis,
}

/// What a drag started in a [`Region`] acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Zooms the time axis.
    Horizontal,
    /// Zooms the price axis.
    Vertical,
    /// Pans both axes.
    Combined,
}

impl From<Region> for Channel {
    fn from(region: Region) -> Self {
        match region {
            Region::TimeAxis => Channel::Horizontal,
            Region::PriceAxis => Channel::Vertical,
            Region::Chart => Channel::Combined,
        }
    }
}

impl Channel {
    pub fn axes(self) -> &'static [Axis] {
        match self {
            Channel::Horizontal => &[Axis::X],
            Channel::Vertical => &[Axis::Y],
            Channel::Combined => &[Axis::X, Axis::Y],
        }
    }

    fn tracks(self, axis: Axis) -> bool {
        self.axes().contains(&axis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(Region, Point),
    Moved(Point),
    Released,
}

/// Last pointer sample of the drag in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub channel: Channel,
    pub last_x: Option<f32>,
    pub last_y: Option<f32>,
}

impl DragSession {
    fn start(channel: Channel, position: Point) -> Self {
        Self {
            channel,
            last_x: channel.tracks(Axis::X).then_some(position.x),
            last_y: channel.tracks(Axis::Y).then_some(position.y),
        }
    }

    fn delta(&mut self, position: Point) -> Vector {
        let dx = self.last_x.map_or(0.0, |last| position.x - last);
        let dy = self.last_y.map_or(0.0, |last| position.y - last);

        if let Some(last) = self.last_x.as_mut() {
            *last = position.x;
        }
        if let Some(last) = self.last_y.as_mut() {
            *last = position.y;
        }

        Vector::new(dx, dy)
    }
}

/// Surfaces that must be repainted after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    None,
    Axis(Axis),
    Pan,
    Full,
}

impl Redraw {
    pub fn touches(self, surface: Surface) -> bool {
        match self {
            Redraw::None => false,
            Redraw::Axis(Axis::X) => matches!(surface, Surface::Main | Surface::TimeAxis),
            Redraw::Axis(Axis::Y) => matches!(surface, Surface::Main | Surface::PriceAxis),
            Redraw::Pan | Redraw::Full => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Doubled,
    Halved,
}

/// Multiplies one axis' zoom by `ratio`, clamped to its limits.
///
/// At most one label-scale crossing is taken per call. On the time axis a
/// doubling moves the ladder one entry finer and a halving one entry coarser.
pub fn zoom_axis(
    state: &mut ViewportState,
    ladder: &mut Ladder,
    axis: Axis,
    ratio: f32,
    zoom: &ZoomConfig,
) -> Option<Crossing> {
    let limits = zoom.limits(axis);
    let scale = state.scale_mut(axis);

    scale.factor = limits.clamp(scale.factor * ratio);

    let crossing = if scale.factor > 2.0 * scale.label {
        scale.label *= 2.0;
        Crossing::Doubled
    } else if scale.factor < scale.label / 2.0 {
        scale.label /= 2.0;
        Crossing::Halved
    } else {
        return None;
    };

    if axis == Axis::X {
        let stepped = match crossing {
            Crossing::Doubled => ladder.step_finer(),
            Crossing::Halved => ladder.step_coarser(),
        };

        if stepped {
            log::debug!("time labels now {}", ladder.current());
        }
    }

    log::debug!(
        "{axis:?} label scale {:?} to {} at zoom {:.3}",
        crossing,
        scale.label,
        scale.factor
    );

    Some(crossing)
}

/// Pointer state machine: idle until a press, dragging until release.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    session: Option<DragSession>,
}

impl Controller {
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        state: &mut ViewportState,
        ladder: &mut Ladder,
        zoom: &ZoomConfig,
    ) -> Redraw {
        match event {
            PointerEvent::Pressed(region, position) => {
                self.session = Some(DragSession::start(region.into(), position));
                Redraw::None
            }
            PointerEvent::Moved(position) => {
                let Some(session) = self.session.as_mut() else {
                    return Redraw::None;
                };

                let delta = session.delta(position);

                match session.channel {
                    Channel::Horizontal => drag_zoom(state, ladder, Axis::X, delta.x, zoom),
                    Channel::Vertical => drag_zoom(state, ladder, Axis::Y, delta.y, zoom),
                    Channel::Combined => {
                        if delta == Vector::ZERO {
                            return Redraw::None;
                        }
                        state.translate(delta);
                        Redraw::Pan
                    }
                }
            }
            PointerEvent::Released => {
                self.session = None;
                Redraw::None
            }
        }
    }

    /// Zooms both axes by one wheel step. Ignored while a drag is in progress.
    pub fn wheel(
        &mut self,
        delta: f32,
        state: &mut ViewportState,
        ladder: &mut Ladder,
        zoom: &ZoomConfig,
    ) -> Redraw {
        if self.is_dragging() || delta == 0.0 || !delta.is_finite() {
            return Redraw::None;
        }

        let ratio = if delta > 0.0 {
            zoom.wheel_step
        } else {
            1.0 / zoom.wheel_step
        };

        for axis in Channel::Combined.axes() {
            zoom_axis(state, ladder, *axis, ratio, zoom);
        }

        Redraw::Full
    }

    pub fn reset(&mut self) {
        self.session = None;
    }
}

fn drag_zoom(
    state: &mut ViewportState,
    ladder: &mut Ladder,
    axis: Axis,
    delta: f32,
    zoom: &ZoomConfig,
) -> Redraw {
    if delta == 0.0 {
        return Redraw::None;
    }

    let ratio = if delta > 0.0 {
        zoom.drag_in
    } else {
        zoom.drag_out
    };

    zoom_axis(state, ladder, axis, ratio, zoom);

    Redraw::Axis(axis)
}
