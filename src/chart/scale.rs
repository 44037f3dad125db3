use data::chart::{Axis, Region, Surface};
use iced::widget::canvas::{self, Cache, Event, Geometry};
use iced::{Rectangle, Renderer, Theme, mouse};

use super::{Interaction, Message, forward_pointer, paint};

/// Price or time label strip. Dragging it zooms that axis.
pub struct AxisLabels<'a> {
    pub axis: Axis,
    pub chart: &'a data::Chart,
    pub labels_cache: &'a Cache,
}

impl AxisLabels<'_> {
    fn region(&self) -> Region {
        match self.axis {
            Axis::X => Region::TimeAxis,
            Axis::Y => Region::PriceAxis,
        }
    }

    fn surface(&self) -> Surface {
        match self.axis {
            Axis::X => Surface::TimeAxis,
            Axis::Y => Surface::PriceAxis,
        }
    }

    fn resize_cursor(&self) -> mouse::Interaction {
        match self.axis {
            Axis::X => mouse::Interaction::ResizingHorizontally,
            Axis::Y => mouse::Interaction::ResizingVertically,
        }
    }
}

impl canvas::Program<Message> for AxisLabels<'_> {
    type State = Interaction;

    fn update(
        &self,
        interaction: &mut Interaction,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let Event::Mouse(mouse_event) = event else {
            return None;
        };

        forward_pointer(interaction, self.region(), mouse_event, bounds, cursor)
    }

    fn draw(
        &self,
        _interaction: &Interaction,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let labels = self.labels_cache.draw(renderer, bounds.size(), |frame| {
            paint(frame, &self.chart.surface(self.surface()));
        });

        vec![labels]
    }

    fn mouse_interaction(
        &self,
        interaction: &Interaction,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match interaction {
            Interaction::Dragging => self.resize_cursor(),
            Interaction::None if cursor.is_over(bounds) => self.resize_cursor(),
            Interaction::None => mouse::Interaction::default(),
        }
    }
}
