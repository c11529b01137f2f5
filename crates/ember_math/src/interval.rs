/// A closed range of reals, used for ray search ranges and bounding box extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// The search range used for secondary rays: `[t_min, +inf)`.
    pub const fn from_min(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    ///
    /// NaN is never contained.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Same interval with a new upper bound.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// The unit interval, used when clamping color channels.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
        assert!(!interval.contains(f32::NAN));
    }

    #[test]
    fn test_interval_from_min() {
        let interval = Interval::from_min(0.001);
        assert!(!interval.contains(0.0));
        assert!(interval.contains(1e30));
        assert!(interval.contains(f32::INFINITY));
    }

    #[test]
    fn test_interval_with_max() {
        let interval = Interval::from_min(0.001).with_max(4.0);
        assert_eq!(interval, Interval::new(0.001, 4.0));
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;

        assert!(!empty.contains(0.0));
        assert!(!empty.contains(f32::INFINITY));
    }

    #[test]
    fn test_interval_surrounding_empty_is_identity() {
        let a = Interval::new(1.0, 5.0);
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &a), a);
    }

    #[test]
    fn test_interval_clamp() {
        assert_eq!(Interval::UNIT.clamp(-5.0), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.5), 0.5);
        assert_eq!(Interval::UNIT.clamp(15.0), 1.0);
    }
}
