// Directional intent: the 2-axis ternary demand produced by an input source each cycle

use serde::{Deserialize, Serialize};

/// One quantized axis of a directional intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl Axis {
    /// Signed value in {-1, 0, 1}
    pub fn value(self) -> i8 {
        match self {
            Axis::Negative => -1,
            Axis::Neutral => 0,
            Axis::Positive => 1,
        }
    }

    /// Clamp any signed value onto the axis (sign only)
    pub fn from_signum(value: i64) -> Self {
        match value {
            v if v < 0 => Axis::Negative,
            0 => Axis::Neutral,
            _ => Axis::Positive,
        }
    }

    /// Threshold a joystick-style value against a symmetric deadband.
    /// Strictly below `-deadband` is Negative, strictly above `deadband` is Positive.
    pub fn from_deadband(value: i64, deadband: i64) -> Self {
        if value < -deadband {
            Axis::Negative
        } else if value > deadband {
            Axis::Positive
        } else {
            Axis::Neutral
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            Axis::Negative => Axis::Positive,
            Axis::Neutral => Axis::Neutral,
            Axis::Positive => Axis::Negative,
        }
    }
}

/// Which input source produced an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Remote,
    Local,
}

/// Control demand for one cycle.
/// `x` is the west/east bias, `y` the south/north bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionalIntent {
    pub x: Axis,
    pub y: Axis,
    pub origin: Origin,
}

impl DirectionalIntent {
    pub fn new(x: Axis, y: Axis, origin: Origin) -> Self {
        Self { x, y, origin }
    }

    /// Build from raw signed values; anything outside {-1, 0, 1} is clamped by sign
    pub fn from_values(x: i64, y: i64, origin: Origin) -> Self {
        Self::new(Axis::from_signum(x), Axis::from_signum(y), origin)
    }

    /// No motion requested
    pub fn neutral(origin: Origin) -> Self {
        Self::new(Axis::Neutral, Axis::Neutral, origin)
    }

    pub fn with_origin(self, origin: Origin) -> Self {
        Self { origin, ..self }
    }

    /// (x, y) as signed values
    pub fn values(&self) -> (i8, i8) {
        (self.x.value(), self.y.value())
    }
}

/// Integer linear re-mapping of `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// Matches the microcontroller `map()` helper: the division truncates toward zero and
/// the input is not clamped. Returns `out_min` for a degenerate input range.
pub fn map_range(value: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    if in_max == in_min {
        return out_min;
    }
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadband_thresholds() {
        assert_eq!(Axis::from_deadband(-11, 10), Axis::Negative);
        assert_eq!(Axis::from_deadband(-10, 10), Axis::Neutral);
        assert_eq!(Axis::from_deadband(0, 10), Axis::Neutral);
        assert_eq!(Axis::from_deadband(10, 10), Axis::Neutral);
        assert_eq!(Axis::from_deadband(11, 10), Axis::Positive);
        assert_eq!(Axis::from_deadband(-100, 10), Axis::Negative);
    }

    #[test]
    fn test_values_are_clamped() {
        let intent = DirectionalIntent::from_values(-255, 7, Origin::Local);
        assert_eq!(intent.values(), (-1, 1));
        assert_eq!(
            DirectionalIntent::from_values(0, 0, Origin::Local).values(),
            (0, 0)
        );
    }

    #[test]
    fn test_map_range_truncates() {
        // 16 + 40 * 34 / 240 = 16 + 5.67 -> 21
        assert_eq!(map_range(100, 60, 300, 16, 50), 21);
        assert_eq!(map_range(60, 60, 300, 16, 50), 16);
        assert_eq!(map_range(300, 60, 300, 16, 50), 50);
    }

    #[test]
    fn test_map_range_joystick_quantization() {
        // Full raw range onto {-1, 0, 1}
        assert_eq!(map_range(0, 0, 255, -1, 1), -1);
        assert_eq!(map_range(127, 0, 255, -1, 1), -1);
        assert_eq!(map_range(128, 0, 255, -1, 1), 0);
        assert_eq!(map_range(254, 0, 255, -1, 1), 0);
        assert_eq!(map_range(255, 0, 255, -1, 1), 1);
    }

    #[test]
    fn test_map_range_degenerate() {
        assert_eq!(map_range(5, 3, 3, 7, 9), 7);
    }

    #[test]
    fn test_with_origin_keeps_axes() {
        let intent = DirectionalIntent::new(Axis::Positive, Axis::Negative, Origin::Local)
            .with_origin(Origin::Remote);
        assert_eq!(intent.values(), (1, -1));
        assert_eq!(intent.origin, Origin::Remote);
        assert_eq!(Axis::Positive.inverted(), Axis::Negative);
    }
}
