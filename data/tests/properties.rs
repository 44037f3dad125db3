use chrono::{Duration, NaiveDate};
use data::chart::labels::time_labels;
use data::chart::{PointerEvent, Region, Viewport, ViewportState};
use data::config::{LabelConfig, LayoutConfig};
use data::{Bar, BarSeries, Chart, ChartConfig, Ladder};
use iced_core::{Point, Size, Vector};
use proptest::prelude::*;

fn series(count: usize, step_minutes: i64) -> BarSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    (0..count)
        .map(|i| {
            let low = 2895.0 + (i % 7) as f32;
            Bar::new(
                start + Duration::minutes(i as i64 * step_minutes),
                low + 1.0,
                low + 4.0,
                low,
                low + 2.0,
            )
        })
        .collect()
}

fn viewport(series: &BarSeries, state: ViewportState, size: Size) -> Viewport {
    Viewport::new(series, state, LayoutConfig::default(), size)
}

#[derive(Debug, Clone)]
enum Gesture {
    Wheel(f32),
    DragTime(f32),
    DragPrice(f32),
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        (-3.0f32..3.0).prop_map(Gesture::Wheel),
        (-40.0f32..40.0).prop_map(Gesture::DragTime),
        (-40.0f32..40.0).prop_map(Gesture::DragPrice),
    ]
}

proptest! {
    #[test]
    fn higher_prices_render_higher(
        a in 0.0f32..1.0,
        b in 0.0f32..1.0,
        scale_y in 0.5f32..4.0,
        pan_y in -400.0f32..400.0,
    ) {
        prop_assume!((a - b).abs() > 0.01);

        let series = series(50, 1);
        let mut state = ViewportState::default();
        state.y.factor = scale_y;
        state.translate(Vector::new(0.0, pan_y));
        let vp = viewport(&series, state, Size::new(1200.0, 700.0));

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let p1 = series.price_min() + low * series.price_range();
        let p2 = series.price_min() + high * series.price_range();

        prop_assert!(vp.price_to_y(p1) > vp.price_to_y(p2));
    }

    #[test]
    fn pan_then_reverse_pan_restores_positions(
        dx in -800.0f32..800.0,
        dy in -800.0f32..800.0,
        scale_x in 0.2f32..4.0,
        scale_y in 0.5f32..4.0,
        index in 0usize..60,
        fraction in 0.0f32..1.0,
    ) {
        let series = series(60, 1);
        let mut state = ViewportState::default();
        state.x.factor = scale_x;
        state.y.factor = scale_y;
        let size = Size::new(1200.0, 700.0);
        let price = series.price_min() + fraction * series.price_range();

        let before = viewport(&series, state, size);

        state.translate(Vector::new(dx, dy));
        let panned = viewport(&series, state, size);
        prop_assert!((panned.index_to_x(index) - before.index_to_x(index) - dx).abs() < 1e-2);
        prop_assert!((panned.price_to_y(price) - before.price_to_y(price) - dy).abs() < 1e-2);

        state.translate(Vector::new(-dx, -dy));
        let after = viewport(&series, state, size);

        prop_assert!((after.index_to_x(index) - before.index_to_x(index)).abs() < 1e-2);
        prop_assert!((after.price_to_y(price) - before.price_to_y(price)).abs() < 1e-2);
    }

    #[test]
    fn zoom_and_ladder_stay_bounded(gestures in prop::collection::vec(gesture(), 1..300)) {
        let mut chart = Chart::new(series(120, 1), ChartConfig::default());
        chart.attach(Size::new(1200.0, 700.0));
        let zoom = chart.config().zoom;
        let last = chart.ladder().len() - 1;

        for gesture in gestures {
            let index_before = chart.ladder().index();

            match gesture {
                Gesture::Wheel(delta) => {
                    chart.on_wheel(delta);
                }
                Gesture::DragTime(dx) => {
                    chart.on_pointer(PointerEvent::Pressed(Region::TimeAxis, Point::new(600.0, 15.0)));
                    chart.on_pointer(PointerEvent::Moved(Point::new(600.0 + dx, 15.0)));
                    chart.on_pointer(PointerEvent::Released);
                }
                Gesture::DragPrice(dy) => {
                    chart.on_pointer(PointerEvent::Pressed(Region::PriceAxis, Point::new(50.0, 300.0)));
                    chart.on_pointer(PointerEvent::Moved(Point::new(50.0, 300.0 + dy)));
                    chart.on_pointer(PointerEvent::Released);
                }
            }

            let state = chart.state();
            prop_assert!(state.x.factor >= zoom.x.min && state.x.factor <= zoom.x.max);
            prop_assert!(state.y.factor >= zoom.y.min && state.y.factor <= zoom.y.max);

            let index = chart.ladder().index();
            prop_assert!(index <= last);
            prop_assert!(index.abs_diff(index_before) <= 1);
        }
    }

    #[test]
    fn emitted_time_labels_are_thirty_pixels_apart(
        count in 1usize..400,
        step_minutes in prop::sample::select(vec![1i64, 5, 60, 1440]),
        scale_x in 0.2f32..4.0,
        pan_x in -3000.0f32..3000.0,
        ladder_index in 0usize..13,
        width in 200.0f32..2000.0,
    ) {
        let series = series(count, step_minutes);
        let mut state = ViewportState::default();
        state.x.factor = scale_x;
        state.translate(Vector::new(pan_x, 0.0));
        let vp = viewport(&series, state, Size::new(width, 600.0));

        let mut ladder = Ladder::default();
        ladder.set_index(ladder_index);

        let labels = time_labels(&series, &vp, ladder.current(), &LabelConfig::default());

        for (i, a) in labels.iter().enumerate() {
            prop_assert!(a.x >= 0.0 && a.x <= width);
            for b in &labels[i + 1..] {
                prop_assert!((a.x - b.x).abs() >= 30.0);
            }
        }
    }
}
