use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use sensor_plot::core::{ManualClock, Viewport};
use sensor_plot::host::ChartHost;
use sensor_plot::plot::{PlotConfig, PlotRenderer, SeriesPalette};
use sensor_plot::render::{Color, NullRenderer};

fn host_with(config: PlotConfig, clock: Arc<ManualClock>) -> ChartHost<NullRenderer> {
    let plot = PlotRenderer::new(Viewport::new(1000, 800), config).expect("plot init");
    ChartHost::new(plot, NullRenderer::default(), clock)
}

fn wait_for_frames(host: &ChartHost<NullRenderer>, frames: u64) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if host.frames_rendered() >= frames {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn redraw_now_renders_one_frame_at_clock_time() {
    let clock = Arc::new(ManualClock::new(10_000));
    let host = host_with(PlotConfig::default(), clock.clone());
    let series = host.add_sensor_series("accel", SeriesPalette::default()).expect("series");

    series.add_value(1.0, clock.as_ref());
    clock.advance(100);
    series.add_value(3.0, clock.as_ref());

    host.redraw_now().expect("redraw");
    assert_eq!(host.frames_rendered(), 1);
    assert_eq!(host.failed_frames(), 0);
    // Raw, mean and variance series each plot both samples.
    assert_eq!(host.with_renderer(|r| r.last_circle_count), 6);
}

#[test]
fn sensor_series_registers_raw_mean_and_variance() {
    let clock = Arc::new(ManualClock::new(0));
    let host = host_with(PlotConfig::default().with_window_ms(2_000), clock.clone());
    let palette = SeriesPalette::default();
    let raw = host.add_sensor_series("accel", palette).expect("series");
    assert_eq!(raw.window_ms(), 2_000);

    let registered: Vec<(String, Color)> = host.with_plot(|plot| {
        plot.entries()
            .map(|(_, entry)| (entry.series.title().to_owned(), entry.color))
            .collect()
    });
    assert_eq!(
        registered,
        vec![
            ("accel".to_owned(), palette.raw),
            ("accel mean".to_owned(), palette.mean),
            ("accel variance".to_owned(), palette.variance),
        ]
    );

    raw.add_value(4.0, clock.as_ref());
    let mean_len = host.with_plot(|plot| {
        plot.entries()
            .find(|(_, entry)| entry.series.title() == "accel mean")
            .map(|(_, entry)| entry.series.len())
    });
    assert_eq!(mean_len, Some(1));
}

#[test]
fn periodic_redraw_runs_until_stopped() {
    let clock = Arc::new(ManualClock::new(0));
    let mut host = host_with(PlotConfig::default().with_redraw_interval_ms(2), clock);
    assert_eq!(host.redraw_interval(), Duration::from_millis(2));

    host.start().expect("start");
    host.start().expect("second start is a no-op");
    assert!(host.is_running());
    assert!(wait_for_frames(&host, 3));

    host.stop();
    assert!(!host.is_running());
    let stopped_at = host.frames_rendered();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(host.frames_rendered(), stopped_at);
}

#[test]
fn redraw_continues_without_new_samples() {
    let clock = Arc::new(ManualClock::new(0));
    let mut host = host_with(PlotConfig::default().with_redraw_interval_ms(2), clock.clone());
    let series = host.create_series("accel").expect("series");
    series.add_value(1.0, clock.as_ref());
    host.add_series(series, Color::rgb(1.0, 0.0, 0.0)).expect("add");

    host.start().expect("start");
    assert!(wait_for_frames(&host, 2));
    assert_eq!(host.with_renderer(|r| r.last_circle_count), 1);

    clock.set(6_000);
    let seen = host.frames_rendered();
    assert!(wait_for_frames(&host, seen + 2));
    assert_eq!(host.with_renderer(|r| r.last_circle_count), 0);
    host.stop();
}

#[test]
fn host_can_restart_after_stop() {
    let clock = Arc::new(ManualClock::new(0));
    let mut host = host_with(PlotConfig::default().with_redraw_interval_ms(2), clock);

    host.start().expect("start");
    assert!(wait_for_frames(&host, 1));
    host.stop();
    let first_run = host.frames_rendered();

    host.start().expect("restart");
    assert!(wait_for_frames(&host, first_run + 1));
}

#[test]
fn removed_series_is_no_longer_drawn() {
    let clock = Arc::new(ManualClock::new(0));
    let host = host_with(PlotConfig::default(), clock.clone());
    let series = host.create_series("accel").expect("series");
    series.add_value(1.0, clock.as_ref());
    let id = host
        .add_series(series, Color::rgb(1.0, 0.0, 0.0))
        .expect("add");

    assert!(host.remove_series(id));
    assert!(!host.remove_series(id));
    host.redraw_now().expect("redraw");
    assert_eq!(host.with_renderer(|r| r.last_circle_count), 0);
    assert_eq!(host.clock().now_ms(), 0);
}

#[test]
fn dropping_a_running_host_stops_it() {
    let clock = Arc::new(ManualClock::new(0));
    let mut host = host_with(PlotConfig::default().with_redraw_interval_ms(1), clock);
    host.start().expect("start");
    assert!(wait_for_frames(&host, 1));
    drop(host);
}
