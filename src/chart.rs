mod scale;

use data::chart::{Anchor, Axis, DrawCommand, PointerEvent, Redraw, Region, Surface};
use iced::widget::canvas::{self, Cache, Canvas, Event, Frame, Geometry, LineDash, Path, Stroke};
use iced::widget::{button, column, container, row, rule, text};
use iced::{Alignment, Element, Length, Point, Rectangle, Renderer, Theme, alignment, mouse};
use scale::AxisLabels;

use crate::style;

const TEXT_SIZE: f32 = 12.0;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    #[default]
    None,
    Dragging,
}

#[derive(Debug, Clone)]
pub enum Message {
    Pointer(PointerEvent),
    Wheel(f32),
    BoundsChanged(Rectangle),
    ResetView,
}

#[derive(Default)]
struct Caches {
    main: Cache,
    x_labels: Cache,
    y_labels: Cache,
}

impl Caches {
    fn clear(&self, redraw: Redraw) {
        if redraw.touches(Surface::Main) {
            self.main.clear();
        }
        if redraw.touches(Surface::TimeAxis) {
            self.x_labels.clear();
        }
        if redraw.touches(Surface::PriceAxis) {
            self.y_labels.clear();
        }
    }
}

/// Candlestick chart widget: the main canvas plus its two axis strips.
pub struct KlineChart {
    chart: data::Chart,
    cache: Caches,
}

impl KlineChart {
    pub fn new(chart: data::Chart) -> Self {
        Self {
            chart,
            cache: Caches::default(),
        }
    }

    pub fn update(&mut self, message: Message) {
        let redraw = match message {
            Message::Pointer(event) => self.chart.on_pointer(event),
            Message::Wheel(delta) => self.chart.on_wheel(delta),
            Message::BoundsChanged(bounds) => self.chart.resize(bounds.size()),
            Message::ResetView => self.chart.reset_view(),
        };

        self.cache.clear(redraw);
    }

    pub fn view(&self) -> Element<'_, Message> {
        let layout = self.chart.config().layout;
        let colors = *self.chart.colors();

        let axis_labels_x = Canvas::new(AxisLabels {
            axis: Axis::X,
            chart: &self.chart,
            labels_cache: &self.cache.x_labels,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let axis_labels_y = Canvas::new(AxisLabels {
            axis: Axis::Y,
            chart: &self.chart,
            labels_cache: &self.cache.y_labels,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let reset_button = button(
            text("R")
                .size(10)
                .align_x(alignment::Horizontal::Center),
        )
        .on_press(Message::ResetView)
        .style(move |_theme, status| style::reset_button(&colors, status));

        let main_chart = row![
            container(Canvas::new(self).width(Length::Fill).height(Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill),
            rule::vertical(1),
            container(axis_labels_y)
                .width(Length::Fixed(layout.price_axis_width))
                .height(Length::Fill),
        ];

        container(column![
            main_chart,
            rule::horizontal(1),
            row![
                container(axis_labels_x)
                    .width(Length::Fill)
                    .height(Length::Fixed(layout.time_axis_height)),
                container(reset_button)
                    .align_x(alignment::Horizontal::Center)
                    .align_y(alignment::Vertical::Center)
                    .width(Length::Fixed(layout.price_axis_width + 1.0))
                    .height(Length::Fixed(layout.time_axis_height)),
            ]
        ])
        .style(move |_theme| style::chart_background(&colors))
        .into()
    }
}

impl canvas::Program<Message> for KlineChart {
    type State = Interaction;

    fn update(
        &self,
        interaction: &mut Interaction,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if self.chart.size() != Some(bounds.size()) {
            return Some(canvas::Action::publish(Message::BoundsChanged(bounds)));
        }

        let Event::Mouse(mouse_event) = event else {
            return None;
        };

        match mouse_event {
            mouse::Event::WheelScrolled { delta } => {
                cursor.position_in(bounds)?;

                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => *y,
                };

                Some(canvas::Action::publish(Message::Wheel(y)).and_capture())
            }
            _ => forward_pointer(interaction, Region::Chart, mouse_event, bounds, cursor),
        }
    }

    fn draw(
        &self,
        _interaction: &Interaction,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let main = self.cache.main.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, frame.size(), self.chart.colors().background);
            paint(frame, &self.chart.surface(Surface::Main));
        });

        vec![main]
    }

    fn mouse_interaction(
        &self,
        interaction: &Interaction,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match interaction {
            Interaction::Dragging => mouse::Interaction::Grabbing,
            Interaction::None if cursor.is_over(bounds) => mouse::Interaction::Crosshair,
            Interaction::None => mouse::Interaction::default(),
        }
    }
}

/// Turns raw mouse input on one surface into core pointer events.
///
/// Moves are reported relative to the surface origin and keep flowing while
/// the press that started them is held, even outside the surface.
fn forward_pointer(
    interaction: &mut Interaction,
    region: Region,
    event: &mouse::Event,
    bounds: Rectangle,
    cursor: mouse::Cursor,
) -> Option<canvas::Action<Message>> {
    let message = match event {
        mouse::Event::ButtonPressed(mouse::Button::Left) => {
            let position = cursor.position_in(bounds)?;
            *interaction = Interaction::Dragging;

            PointerEvent::Pressed(region, position)
        }
        mouse::Event::CursorMoved { .. } if *interaction == Interaction::Dragging => {
            PointerEvent::Moved(cursor.position_from(bounds.position())?)
        }
        mouse::Event::ButtonReleased(mouse::Button::Left)
            if *interaction == Interaction::Dragging =>
        {
            *interaction = Interaction::None;

            return Some(canvas::Action::publish(Message::Pointer(
                PointerEvent::Released,
            )));
        }
        _ => return None,
    };

    Some(canvas::Action::publish(Message::Pointer(message)).and_capture())
}

fn paint(frame: &mut Frame, commands: &[DrawCommand]) {
    for command in commands {
        match command {
            DrawCommand::Line {
                from,
                to,
                color,
                dashed,
            } => {
                let line_dash = if *dashed {
                    LineDash {
                        segments: &[2.0, 4.0],
                        offset: 0,
                    }
                } else {
                    LineDash::default()
                };

                frame.stroke(
                    &Path::line(*from, *to),
                    Stroke::with_color(
                        Stroke {
                            width: 1.0,
                            line_dash,
                            ..Default::default()
                        },
                        *color,
                    ),
                );
            }
            DrawCommand::Rect {
                top_left,
                size,
                color,
            } => {
                frame.fill_rectangle(*top_left, *size, *color);
            }
            DrawCommand::Text {
                content,
                position,
                color,
                anchor,
            } => {
                let align_x = match anchor {
                    Anchor::Center => Alignment::Center,
                    Anchor::West => Alignment::Start,
                };

                frame.fill_text(canvas::Text {
                    content: content.clone(),
                    position: *position,
                    color: *color,
                    size: TEXT_SIZE.into(),
                    align_x: align_x.into(),
                    align_y: Alignment::Center.into(),
                    ..canvas::Text::default()
                });
            }
        }
    }
}
