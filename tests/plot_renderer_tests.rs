use approx::assert_relative_eq;
use sensor_plot::core::{DataPoint, Interval, TimeSeries, Viewport};
use sensor_plot::plot::{PlotConfig, PlotRenderer};
use sensor_plot::render::{Color, DrawCommand, NullRenderer, RenderFrame, TextHAlign};

const RED: Color = Color::rgb(1.0, 0.0, 0.0);
const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

fn plot(config: PlotConfig) -> PlotRenderer {
    PlotRenderer::new(Viewport::new(1000, 800), config).expect("plot init")
}

fn series_with(title: &str, window_ms: i64, points: &[(f64, i64)], now: i64) -> TimeSeries {
    let series = TimeSeries::with_window(title, window_ms).expect("series");
    for (value, timestamp) in points {
        series.add_point(DataPoint::new(*value, *timestamp), now);
    }
    series
}

fn series_lines(frame: &RenderFrame, color: Color) -> usize {
    frame.lines().filter(|line| line.color == color).count()
}

#[test]
fn range_is_union_of_buffered_series_ranges() {
    let mut renderer = plot(PlotConfig::default());
    let colors = [RED, BLUE, Color::rgb(0.0, 1.0, 0.0)];
    let data: [&[(f64, i64)]; 3] = [&[(0.0, 0), (5.0, 1)], &[(-2.0, 0), (3.0, 1)], &[(10.0, 0)]];
    for (index, points) in data.into_iter().enumerate() {
        let series = series_with(&format!("s{index}"), 5_000, points, 1);
        renderer.add_series(series, colors[index]).expect("add series");
    }

    assert_eq!(renderer.compute_range(), Interval::new(-3.0, 11.0));
}

#[test]
fn domain_is_union_of_series_windows() {
    let mut renderer = plot(PlotConfig::default());
    assert!(renderer.compute_domain().is_empty());

    renderer
        .add_series(TimeSeries::with_window("short", 5_000).expect("series"), RED)
        .expect("add series");
    renderer
        .add_series(TimeSeries::with_window("long", 8_000).expect("series"), BLUE)
        .expect("add series");

    assert_eq!(renderer.compute_domain(), Interval::new(0, 8_000));
}

#[test]
fn plot_without_series_draws_only_axes() {
    let renderer = plot(PlotConfig::default());
    let frame = renderer.build_frame(10_000).expect("frame");

    assert_eq!(frame.lines().count(), 2);
    assert_eq!(frame.circles().count(), 0);
    let titles: Vec<&str> = frame.texts().map(|t| t.text.as_str()).collect();
    assert_eq!(titles, vec!["Time (ms)", "Data"]);
    frame.validate().expect("frame is drawable");
}

#[test]
fn series_without_points_draws_time_axis_labels_only() {
    let mut renderer = plot(PlotConfig::default());
    renderer
        .add_series(TimeSeries::new("idle"), RED)
        .expect("add series");
    let frame = renderer.build_frame(10_000).expect("frame");

    let labels: Vec<&str> = frame
        .texts()
        .filter(|t| t.h_align == TextHAlign::Center && t.rotation_deg == 0.0)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["0", "-5000", "-1000", "-2000", "-3000", "-4000", "Time (ms)"]
    );
    assert_eq!(frame.circles().count(), 0);
    assert!(frame.texts().all(|t| t.h_align != TextHAlign::Right));
}

#[test]
fn points_map_by_age_and_value() {
    let mut renderer = plot(PlotConfig::default().with_range_buffer(0.0));
    let series = series_with("accel", 5_000, &[(0.0, 7_500), (10.0, 10_000)], 10_000);
    renderer.add_series(series, RED).expect("add series");

    let frame = renderer.build_frame(10_000).expect("frame");
    let circles: Vec<(f64, f64)> = frame.circles().map(|c| (c.cx, c.cy)).collect();
    assert_eq!(circles.len(), 2);
    assert_relative_eq!(circles[0].0, 600.0, epsilon = 1e-9);
    assert_relative_eq!(circles[0].1, 550.0, epsilon = 1e-9);
    assert_relative_eq!(circles[1].0, 950.0, epsilon = 1e-9);
    assert_relative_eq!(circles[1].1, 50.0, epsilon = 1e-9);

    let mapping = renderer.axis_mapping().expect("mapping");
    assert_relative_eq!(mapping.map_x(5_000.0), 250.0, epsilon = 1e-9);
    assert_relative_eq!(mapping.map_y(5.0), 300.0, epsilon = 1e-9);
}

#[test]
fn connectors_join_consecutive_visible_points() {
    let mut renderer = plot(PlotConfig::default());
    let series = series_with("accel", 5_000, &[(1.0, 4_000), (2.0, 4_500), (3.0, 5_000)], 5_000);
    renderer.add_series(series, RED).expect("add series");

    let frame = renderer.build_frame(5_000).expect("frame");
    assert_eq!(frame.circles().filter(|c| c.color == RED).count(), 3);
    assert_eq!(series_lines(&frame, RED), 2);
}

#[test]
fn stale_point_between_visible_points_breaks_the_connector() {
    let series = TimeSeries::with_window("accel", 5_000).expect("series");
    series.add_point(DataPoint::new(1.0, 5_000), 5_000);
    series.add_point(DataPoint::new(2.0, 1_000), 5_000);
    series.add_point(DataPoint::new(3.0, 5_500), 5_500);
    assert_eq!(series.len(), 3);

    let mut renderer = plot(PlotConfig::default());
    renderer.add_series(series, RED).expect("add series");

    let frame = renderer.build_frame(6_500).expect("frame");
    assert_eq!(frame.circles().filter(|c| c.color == RED).count(), 2);
    assert_eq!(series_lines(&frame, RED), 0);
}

#[test]
fn flat_series_without_buffer_is_drawn_at_vertical_center() {
    let mut renderer = plot(PlotConfig::default().with_range_buffer(0.0));
    let series = series_with("flat", 5_000, &[(5.0, 0), (5.0, 1_000), (5.0, 2_000)], 2_000);
    renderer.add_series(series, RED).expect("add series");

    let frame = renderer.build_frame(2_000).expect("frame");
    assert!(frame.circles().all(|c| c.cy == 300.0));
    frame.validate().expect("degenerate range stays finite");

    let value_labels: Vec<&str> = frame
        .texts()
        .filter(|t| t.h_align == TextHAlign::Right)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(value_labels, vec!["5"]);
}

#[test]
fn later_series_draw_on_top_of_earlier_ones() {
    let mut renderer = plot(PlotConfig::default());
    renderer
        .add_series(series_with("first", 5_000, &[(1.0, 0), (2.0, 1)], 1), RED)
        .expect("add series");
    renderer
        .add_series(series_with("second", 5_000, &[(3.0, 0), (4.0, 1)], 1), BLUE)
        .expect("add series");

    let frame = renderer.build_frame(1).expect("frame");
    let circle_colors: Vec<Color> = frame
        .commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Circle(circle) => Some(circle.color),
            _ => None,
        })
        .collect();
    assert_eq!(circle_colors, vec![RED, RED, BLUE, BLUE]);

    let first_circle = frame
        .commands
        .iter()
        .position(|command| matches!(command, DrawCommand::Circle(_)))
        .expect("circle drawn");
    let last_axis_text = frame
        .commands
        .iter()
        .rposition(|command| matches!(command, DrawCommand::Text(_)))
        .expect("axis text drawn");
    assert!(last_axis_text < first_circle);
}

#[test]
fn value_axis_title_is_rotated() {
    let renderer = plot(PlotConfig::default());
    let frame = renderer.build_frame(0).expect("frame");

    let value_title = frame
        .texts()
        .find(|t| t.text == "Data")
        .expect("value title");
    assert_eq!(value_title.rotation_deg, 270.0);
    let time_title = frame
        .texts()
        .find(|t| t.text == "Time (ms)")
        .expect("time title");
    assert_eq!(time_title.rotation_deg, 0.0);
}

#[test]
fn legend_lists_series_titles_in_their_colors() {
    let mut renderer = plot(PlotConfig::default().with_legend(true));
    renderer
        .add_series(series_with("accel", 5_000, &[(1.0, 0)], 0), RED)
        .expect("add series");
    renderer
        .add_series(series_with("gyro", 5_000, &[(2.0, 0)], 0), BLUE)
        .expect("add series");

    let frame = renderer.build_frame(0).expect("frame");
    let legend: Vec<(&str, Color)> = frame
        .texts()
        .filter(|t| t.text == "accel" || t.text == "gyro")
        .map(|t| (t.text.as_str(), t.color))
        .collect();
    assert_eq!(legend, vec![("accel", RED), ("gyro", BLUE)]);
}

#[test]
fn removing_a_series_keeps_remaining_order() {
    let mut renderer = plot(PlotConfig::default());
    let a = renderer.add_series(TimeSeries::new("a"), RED).expect("add a");
    renderer.add_series(TimeSeries::new("b"), BLUE).expect("add b");
    renderer
        .add_series(TimeSeries::new("c"), Color::rgb(0.0, 1.0, 0.0))
        .expect("add c");

    assert!(renderer.remove_series(a).is_some());
    assert!(renderer.remove_series(a).is_none());
    let titles: Vec<String> = renderer
        .entries()
        .map(|(_, entry)| entry.series.title().to_owned())
        .collect();
    assert_eq!(titles, vec!["b", "c"]);
}

#[test]
fn render_frame_hands_a_valid_frame_to_the_backend() {
    let mut renderer = plot(PlotConfig::default());
    renderer
        .add_series(series_with("accel", 5_000, &[(1.0, 0), (2.0, 100)], 100), RED)
        .expect("add series");

    let mut backend = NullRenderer::default();
    renderer.render_frame(100, &mut backend).expect("render");
    assert_eq!(backend.frames_rendered, 1);
    assert_eq!(backend.last_circle_count, 2);
}

#[test]
fn invalid_setup_is_rejected() {
    assert!(PlotRenderer::new(Viewport::new(200, 200), PlotConfig::default()).is_err());
    assert!(
        PlotRenderer::new(
            Viewport::new(1000, 800),
            PlotConfig::default().with_range_buffer(-1.0)
        )
        .is_err()
    );

    let mut renderer = plot(PlotConfig::default());
    assert!(
        renderer
            .add_series(TimeSeries::new("bad"), Color::rgba(2.0, 0.0, 0.0, 1.0))
            .is_err()
    );
    assert!(renderer.set_viewport(Viewport::new(10, 10)).is_err());
    assert_eq!(renderer.viewport(), Viewport::new(1000, 800));
}
