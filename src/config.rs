// Cycle timing, topics, motion tuning, hardware addresses
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::motion::{UNKNOWN_DISTANCE_TREATED_AS, UnknownDistancePolicy};

// Control cycle period (inter-cycle delay)
pub const CYCLE_PERIOD: Duration = Duration::from_millis(50);

// Zenoh topics
pub const TOPIC_CMD_JOYSTICK: &str = "rover/cmd/joystick"; // remote joystick commands
pub const TOPIC_DIRECTION: &str = "rover/state/direction"; // heading name while moving
pub const TOPIC_LASER: &str = "rover/state/laser"; // forward range
pub const TOPIC_STATUS: &str = "rover/state/status"; // per-cycle status
pub const TOPIC_LOG: &str = "rover/log"; // free-form log lines

// Motion tuning
pub const SAFE_DISTANCE_MM: u32 = 300;
pub const DEAD_ZONE_MM: u32 = 60;
pub const MAX_DUTY: u8 = 50;
pub const MIN_DUTY: u8 = 16;
pub const MAX_ROTATION_DUTY: u8 = 50;

// Remote joystick deadband (raw joystick units)
pub const REMOTE_DEADBAND: i64 = 10;

// Serial port of the I2C bridge
pub const BRIDGE_PORT: &str = "/dev/ttyUSB0";
pub const BRIDGE_BAUDRATE: u32 = 115_200;

// Run against simulated devices instead of the bridge
pub const SIMULATED: bool = false;
pub const SIM_DISTANCE_MM: u32 = 1000; // forward range reported by the simulated sensor

// I2C addresses
pub const LEFT_SHIELD_ADDR: u8 = 0x09;
pub const RIGHT_SHIELD_ADDR: u8 = 0x30;
pub const NUNCHUCK_ADDR: u8 = 0x52;
pub const TOF_ADDR: u8 = 0x29;

// Motor shield setup
pub const MOTOR_PWM_FREQ_HZ: u32 = 1000;
pub const MOTOR_READY_ATTEMPTS: u32 = 200;
pub const MOTOR_READY_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Speed scaling and heading table parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub safe_distance_mm: u32,
    pub dead_zone_mm: u32,
    pub max_duty: u8,
    pub min_duty: u8,
    pub max_rotation_duty: u8,
    /// Defaults to half of `max_duty`
    pub max_turn_duty: Option<u8>,
    pub unknown_distance: UnknownDistancePolicy,
}

impl MotionConfig {
    pub fn max_turn_duty(&self) -> u8 {
        self.max_turn_duty.unwrap_or(self.max_duty / 2)
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            safe_distance_mm: SAFE_DISTANCE_MM,
            dead_zone_mm: DEAD_ZONE_MM,
            max_duty: MAX_DUTY,
            min_duty: MIN_DUTY,
            max_rotation_duty: MAX_ROTATION_DUTY,
            max_turn_duty: None,
            unknown_distance: UNKNOWN_DISTANCE_TREATED_AS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub deadband: i64,
    /// Flip the y axis for joysticks that report "down" as positive
    pub invert_y: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            deadband: REMOTE_DEADBAND,
            invert_y: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Topics {
    pub joystick: String,
    pub direction: String,
    pub laser: String,
    pub status: String,
    pub log: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            joystick: TOPIC_CMD_JOYSTICK.to_string(),
            direction: TOPIC_DIRECTION.to_string(),
            laser: TOPIC_LASER.to_string(),
            status: TOPIC_STATUS.to_string(),
            log: TOPIC_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub simulated: bool,
    pub port: String,
    pub baudrate: u32,
    pub left_shield: u8,
    pub right_shield: u8,
    pub nunchuck: u8,
    pub tof: u8,
    pub pwm_freq_hz: u32,
    pub ready_attempts: u32,
    pub ready_interval_ms: u64,
    /// Distance reported by the simulated sensor
    pub sim_distance_mm: u32,
}

impl HardwareConfig {
    pub fn ready_interval(&self) -> Duration {
        Duration::from_millis(self.ready_interval_ms)
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            simulated: SIMULATED,
            port: BRIDGE_PORT.to_string(),
            baudrate: BRIDGE_BAUDRATE,
            left_shield: LEFT_SHIELD_ADDR,
            right_shield: RIGHT_SHIELD_ADDR,
            nunchuck: NUNCHUCK_ADDR,
            tof: TOF_ADDR,
            pwm_freq_hz: MOTOR_PWM_FREQ_HZ,
            ready_attempts: MOTOR_READY_ATTEMPTS,
            ready_interval_ms: MOTOR_READY_INTERVAL.as_millis() as u64,
            sim_distance_mm: SIM_DISTANCE_MM,
        }
    }
}

/// Full runtime configuration. Every field has a default, so a config file only needs
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cycle_period_ms: u64,
    pub topics: Topics,
    pub motion: MotionConfig,
    pub remote: RemoteConfig,
    pub hardware: HardwareConfig,
    /// Optional zenoh session config file
    pub zenoh_config: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycle_period_ms: CYCLE_PERIOD.as_millis() as u64,
            topics: Topics::default(),
            motion: MotionConfig::default(),
            remote: RemoteConfig::default(),
            hardware: HardwareConfig::default(),
            zenoh_config: None,
        }
    }
}

impl Config {
    /// Load a JSON config file and validate it
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn cycle_period(&self) -> Duration {
        Duration::from_millis(self.cycle_period_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.motion;
        if m.dead_zone_mm >= m.safe_distance_mm {
            return Err(ConfigError::Invalid(format!(
                "dead_zone_mm ({}) must be below safe_distance_mm ({})",
                m.dead_zone_mm, m.safe_distance_mm
            )));
        }
        if m.min_duty > m.max_duty {
            return Err(ConfigError::Invalid(format!(
                "min_duty ({}) exceeds max_duty ({})",
                m.min_duty, m.max_duty
            )));
        }
        for (name, duty) in [
            ("max_duty", m.max_duty),
            ("max_rotation_duty", m.max_rotation_duty),
            ("max_turn_duty", m.max_turn_duty()),
        ] {
            if duty > 100 {
                return Err(ConfigError::Invalid(format!(
                    "{} ({}) is above 100%",
                    name, duty
                )));
            }
        }
        if self.cycle_period_ms == 0 {
            return Err(ConfigError::Invalid("cycle_period_ms must be non-zero".into()));
        }
        if self.remote.deadband < 0 {
            return Err(ConfigError::Invalid("remote deadband must not be negative".into()));
        }
        if self.hardware.ready_attempts == 0 {
            return Err(ConfigError::Invalid("ready_attempts must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cycle_period(), Duration::from_millis(50));
        assert_eq!(config.motion.safe_distance_mm, 300);
        assert_eq!(config.motion.dead_zone_mm, 60);
        assert_eq!(config.motion.max_duty, 50);
        assert_eq!(config.motion.min_duty, 16);
        assert_eq!(config.motion.max_rotation_duty, 50);
        assert_eq!(config.motion.max_turn_duty(), 25);
        assert_eq!(config.motion.unknown_distance, UnknownDistancePolicy::TreatAsFar);
        assert_eq!(config.hardware.sim_distance_mm, SIM_DISTANCE_MM);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = Config::from_json(
            r#"{
                "cycle_period_ms": 20,
                "motion": { "max_duty": 70, "unknown_distance": "treat_as_blocked" },
                "hardware": { "simulated": true, "port": "/dev/ttyACM1" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.cycle_period_ms, 20);
        assert_eq!(config.motion.max_duty, 70);
        assert_eq!(config.motion.max_turn_duty(), 35);
        assert_eq!(config.motion.min_duty, MIN_DUTY);
        assert_eq!(
            config.motion.unknown_distance,
            UnknownDistancePolicy::TreatAsBlocked
        );
        assert!(config.hardware.simulated);
        assert_eq!(config.hardware.port, "/dev/ttyACM1");
        assert_eq!(config.hardware.left_shield, LEFT_SHIELD_ADDR);
        assert_eq!(config.topics.joystick, TOPIC_CMD_JOYSTICK);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_inverted_distances() {
        let err = Config::from_json(r#"{ "motion": { "dead_zone_mm": 300 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_duty_above_100() {
        let err = Config::from_json(r#"{ "motion": { "max_duty": 120, "min_duty": 16 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_min_above_max() {
        let err = Config::from_json(r#"{ "motion": { "min_duty": 60 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/rover.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
