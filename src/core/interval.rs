use serde::{Deserialize, Serialize};

/// Closed `[min, max]` pair used for both plot domain and plot range.
///
/// The type does not enforce `min <= max`. An interval with `min > max` is
/// the "empty" sentinel produced by series without data and by renderers with
/// no registered series; it is absorbed by [`Interval::union`].
///
/// `Interval::<f64>::EMPTY` holds infinities, which `serde_json` writes as
/// `null` and cannot read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T: Copy + PartialOrd> Interval<T> {
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn min(self) -> T {
        self.min
    }

    #[must_use]
    pub fn max(self) -> T {
        self.max
    }

    #[must_use]
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn is_empty(self) -> bool {
        !(self.min <= self.max)
    }

    #[must_use]
    pub fn contains(self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Componentwise min/max union. Empty operands contribute nothing.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Self {
            min: if other.min < self.min { other.min } else { self.min },
            max: if other.max > self.max { other.max } else { self.max },
        }
    }
}

impl Interval<f64> {
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    #[must_use]
    pub fn span(self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }

    /// Widens both bounds by `buffer`. Empty intervals stay empty.
    #[must_use]
    pub fn padded(self, buffer: f64) -> Self {
        if self.is_empty() {
            return self;
        }
        Self {
            min: self.min - buffer,
            max: self.max + buffer,
        }
    }
}

impl Interval<i64> {
    pub const EMPTY: Self = Self {
        min: i64::MAX,
        max: i64::MIN,
    };

    #[must_use]
    pub fn span(self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.max - self.min
        }
    }

    #[must_use]
    pub fn to_f64(self) -> Interval<f64> {
        if self.is_empty() {
            return Interval::<f64>::EMPTY;
        }
        Interval::new(self.min as f64, self.max as f64)
    }
}

impl Default for Interval<f64> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Default for Interval<i64> {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::Interval;

    #[test]
    fn union_ignores_empty_operands() {
        let populated = Interval::new(-2.0, 3.0);
        assert_eq!(populated.union(Interval::<f64>::EMPTY), populated);
        assert_eq!(Interval::<f64>::EMPTY.union(populated), populated);
        assert!(
            Interval::<f64>::EMPTY
                .union(Interval::<f64>::EMPTY)
                .is_empty()
        );
    }

    #[test]
    fn padding_keeps_empty_sentinel() {
        assert!(Interval::<f64>::EMPTY.padded(1.0).is_empty());
        assert_eq!(Interval::new(0.0, 5.0).padded(1.0), Interval::new(-1.0, 6.0));
    }

    #[test]
    fn single_value_interval_is_not_empty() {
        let flat = Interval::new(10.0, 10.0);
        assert!(!flat.is_empty());
        assert_eq!(flat.span(), 0.0);
    }

    #[test]
    fn integer_domain_converts_to_float() {
        assert_eq!(Interval::new(0_i64, 5_000).to_f64(), Interval::new(0.0, 5_000.0));
        assert!(Interval::<i64>::EMPTY.to_f64().is_empty());
    }

    #[test]
    fn empty_float_sentinel_does_not_survive_json() {
        let json = serde_json::to_string(&Interval::<f64>::EMPTY).expect("serialize");
        assert_eq!(json, r#"{"min":null,"max":null}"#);
        assert!(serde_json::from_str::<Interval<f64>>(&json).is_err());
    }
}
