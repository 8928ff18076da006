/// Tick positions strictly inside `[min, max)`, spaced at the power of ten
/// matching the magnitude of `max - min`.
///
/// The first tick is the smallest multiple of the step that is `>= min`.
/// Spans of one unit or less (and non-finite input) produce no ticks.
///
/// ```
/// use sensor_plot::plot::generate_ticks;
///
/// assert_eq!(
///     generate_ticks(43.0, 127.0),
///     vec![50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0, 120.0]
/// );
/// assert!(generate_ticks(0.0, 1.0).is_empty());
/// ```
#[must_use]
pub fn generate_ticks(min: f64, max: f64) -> Vec<f64> {
    let span = max - min;
    if !span.is_finite() || span <= 1.0 {
        return Vec::new();
    }

    let step = tick_step(span);
    let first = (min / step).ceil();
    let mut ticks = Vec::new();
    let mut index = 0.0;
    loop {
        // -0.0 + 0.0 normalizes to 0.0 so labels never print "-0".
        let tick = (first + index) * step + 0.0;
        if tick >= max {
            break;
        }
        ticks.push(tick);
        index += 1.0;
    }
    ticks
}

/// `10^floor(log10(span))`, corrected for `log10` rounding just below an
/// exact power of ten.
pub(crate) fn tick_step(span: f64) -> f64 {
    let mut step = 10_f64.powf(span.log10().floor());
    if step * 10.0 <= span {
        step *= 10.0;
    }
    if step > span {
        step /= 10.0;
    }
    step
}
