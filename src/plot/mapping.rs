use crate::core::Interval;
use crate::plot::Rect;

/// Affine maps from data coordinates into the plot rectangle.
///
/// The time axis is reversed: `x` is an age in milliseconds, so age `0`
/// ("now") lands on the right edge and older samples move left. Values grow
/// upward from the bottom edge. A degenerate or empty axis maps every value
/// to the center of the rectangle instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMapping {
    plot: Rect,
    domain: Interval<f64>,
    range: Interval<f64>,
}

impl AxisMapping {
    #[must_use]
    pub fn new(plot: Rect, domain: Interval<f64>, range: Interval<f64>) -> Self {
        Self {
            plot,
            domain,
            range,
        }
    }

    #[must_use]
    pub fn plot(&self) -> Rect {
        self.plot
    }

    #[must_use]
    pub fn domain(&self) -> Interval<f64> {
        self.domain
    }

    #[must_use]
    pub fn range(&self) -> Interval<f64> {
        self.range
    }

    #[must_use]
    pub fn map_x(&self, age_ms: f64) -> f64 {
        let span = self.domain.span();
        if span <= 0.0 {
            return self.plot.center_x();
        }
        self.plot.right - self.plot.width() / span * (age_ms - self.domain.min)
    }

    #[must_use]
    pub fn map_y(&self, value: f64) -> f64 {
        let span = self.range.span();
        if span <= 0.0 {
            return self.plot.center_y();
        }
        self.plot.bottom - self.plot.height() / span * (value - self.range.min)
    }
}

#[cfg(test)]
mod tests {
    use super::AxisMapping;
    use crate::core::Interval;
    use crate::plot::Rect;

    fn plot() -> Rect {
        Rect::new(100.0, 0.0, 600.0, 400.0)
    }

    #[test]
    fn now_is_on_the_right_edge() {
        let mapping = AxisMapping::new(plot(), Interval::new(0.0, 5_000.0), Interval::new(0.0, 10.0));
        assert_eq!(mapping.map_x(0.0), 600.0);
        assert_eq!(mapping.map_x(5_000.0), 100.0);
        assert_eq!(mapping.map_x(2_500.0), 350.0);
    }

    #[test]
    fn values_grow_upward() {
        let mapping = AxisMapping::new(plot(), Interval::new(0.0, 5_000.0), Interval::new(-2.0, 8.0));
        assert_eq!(mapping.map_y(-2.0), 400.0);
        assert_eq!(mapping.map_y(8.0), 0.0);
        assert_eq!(mapping.map_y(3.0), 200.0);
    }

    #[test]
    fn degenerate_axes_fall_back_to_center() {
        let mapping = AxisMapping::new(plot(), Interval::new(0.0, 0.0), Interval::new(4.0, 4.0));
        assert_eq!(mapping.map_x(123.0), 350.0);
        assert_eq!(mapping.map_y(4.0), 200.0);

        let empty = AxisMapping::new(plot(), Interval::<f64>::EMPTY, Interval::<f64>::EMPTY);
        assert_eq!(empty.map_x(0.0), 350.0);
        assert_eq!(empty.map_y(0.0), 200.0);
    }
}
