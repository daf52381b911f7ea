// Differential-drive motion mapping for the rover
// Converts a directional intent plus the forward distance reading into left/right drive commands.
//
// Only the North heading is scaled by obstacle distance. Turns, rotations, diagonals and
// reverse use fixed duties and never slow for an obstacle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MotionConfig;
use crate::intent::{DirectionalIntent, map_range};

/// Forward range reading in millimetres, or `UNKNOWN` when the sensor produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DistanceReading(pub u32);

impl DistanceReading {
    /// Sentinel for "no valid reading this cycle": the largest representable distance
    pub const UNKNOWN: DistanceReading = DistanceReading(u32::MAX);

    pub fn from_mm(mm: u32) -> Self {
        Self(mm)
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// Millimetres, `None` for the sentinel
    pub fn millimeters(&self) -> Option<u32> {
        (!self.is_unknown()).then_some(self.0)
    }
}

/// How the mapper treats `DistanceReading::UNKNOWN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDistancePolicy {
    /// Fail open: a missing reading counts as "far away" (full forward duty)
    #[default]
    TreatAsFar,
    /// Fail closed: a missing reading counts as inside the dead zone (zero forward duty)
    TreatAsBlocked,
}

/// Default policy for sensor failures: full forward duty when the range is unknown.
/// Override with `MotionConfig::unknown_distance`.
pub const UNKNOWN_DISTANCE_TREATED_AS: UnknownDistancePolicy = UnknownDistancePolicy::TreatAsFar;

/// Commanded rotation of one drive side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
    Stopped,
}

/// Actuation demand for one motor side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveCommand {
    pub duty: u8, // percent, 0..=100
    pub rotation: Rotation,
}

impl DriveCommand {
    pub fn new(duty: u8, rotation: Rotation) -> Self {
        Self { duty, rotation }
    }

    pub fn cw(duty: u8) -> Self {
        Self::new(duty, Rotation::Clockwise)
    }

    pub fn ccw(duty: u8) -> Self {
        Self::new(duty, Rotation::CounterClockwise)
    }

    pub fn stopped() -> Self {
        Self::new(0, Rotation::Stopped)
    }
}

/// Discrete motion intent derived from (x, y)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Stop,
}

impl Heading {
    /// Resolve the heading for an (x, y) pair; anything outside the eight directions is Stop
    pub fn from_xy(x: i8, y: i8) -> Self {
        match (x, y) {
            (0, 1) => Heading::North,
            (1, 1) => Heading::NorthEast,
            (1, 0) => Heading::East,
            (1, -1) => Heading::SouthEast,
            (0, -1) => Heading::South,
            (-1, -1) => Heading::SouthWest,
            (-1, 0) => Heading::West,
            (-1, 1) => Heading::NorthWest,
            _ => Heading::Stop,
        }
    }

    /// Telemetry name, e.g. "NORTH EAST"
    pub fn name(&self) -> &'static str {
        match self {
            Heading::North => "NORTH",
            Heading::NorthEast => "NORTH EAST",
            Heading::East => "EAST",
            Heading::SouthEast => "SOUTH EAST",
            Heading::South => "SOUTH",
            Heading::SouthWest => "SOUTH WEST",
            Heading::West => "WEST",
            Heading::NorthWest => "NORTH WEST",
            Heading::Stop => "STOP",
        }
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Duty source for one side in the heading table
#[derive(Debug, Clone, Copy)]
enum DutyLevel {
    Scaled,
    Max,
    Turn,
    Spin,
    Zero,
}

/// One row of the heading table: (duty, rotation) for left then right
type HeadingRow = [(DutyLevel, Rotation); 2];

const fn row(heading: Heading) -> HeadingRow {
    use DutyLevel::*;
    use Rotation::{Clockwise as Cw, CounterClockwise as Ccw, Stopped};
    match heading {
        Heading::North => [(Scaled, Cw), (Scaled, Cw)],
        Heading::NorthEast => [(Max, Cw), (Turn, Cw)],
        Heading::East => [(Spin, Cw), (Spin, Ccw)],
        Heading::SouthEast => [(Max, Ccw), (Turn, Ccw)],
        Heading::South => [(Max, Ccw), (Max, Ccw)],
        Heading::SouthWest => [(Turn, Ccw), (Max, Ccw)],
        Heading::West => [(Spin, Ccw), (Spin, Cw)],
        Heading::NorthWest => [(Turn, Cw), (Max, Cw)],
        Heading::Stop => [(Zero, Stopped), (Zero, Stopped)],
    }
}

/// Output of one mapping step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionPlan {
    pub left: DriveCommand,
    pub right: DriveCommand,
    pub heading: Heading,
}

impl MotionPlan {
    /// Heading name to publish, `None` when stopped
    pub fn telemetry(&self) -> Option<&'static str> {
        (self.heading != Heading::Stop).then(|| self.heading.name())
    }
}

/// Maps (intent, distance) to per-side drive commands
#[derive(Debug, Clone)]
pub struct MotionMapper {
    config: MotionConfig,
}

impl MotionMapper {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Forward duty for a distance reading.
    ///
    /// Full duty beyond the safe distance, linear from `min_duty` to `max_duty` across
    /// `[dead_zone, safe_distance]`, zero inside the dead zone.
    pub fn scaled_duty(&self, distance: DistanceReading) -> u8 {
        let cfg = &self.config;

        if distance.is_unknown() && cfg.unknown_distance == UnknownDistancePolicy::TreatAsBlocked {
            return 0;
        }

        let d = distance.0;
        if d > cfg.safe_distance_mm {
            cfg.max_duty
        } else if d >= cfg.dead_zone_mm {
            let duty = map_range(
                d as i64,
                cfg.dead_zone_mm as i64,
                cfg.safe_distance_mm as i64,
                cfg.min_duty as i64,
                cfg.max_duty as i64,
            );
            duty.clamp(0, 100) as u8
        } else {
            0
        }
    }

    /// Resolve heading and per-side commands for this cycle
    pub fn map(&self, intent: &DirectionalIntent, distance: DistanceReading) -> MotionPlan {
        let (x, y) = intent.values();
        let heading = Heading::from_xy(x, y);
        let scaled = self.scaled_duty(distance);

        debug!("mapx: {} mapy: {} Duty: {} Heading: {}", x, y, scaled, heading);

        let [left, right] = row(heading).map(|(level, rotation)| {
            let duty = match level {
                DutyLevel::Scaled => scaled,
                DutyLevel::Max => self.config.max_duty,
                DutyLevel::Turn => self.config.max_turn_duty(),
                DutyLevel::Spin => self.config.max_rotation_duty,
                DutyLevel::Zero => 0,
            };
            DriveCommand::new(duty, rotation)
        });

        MotionPlan {
            left,
            right,
            heading,
        }
    }
}

impl Default for MotionMapper {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}
