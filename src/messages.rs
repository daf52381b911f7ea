// Define message types for the runtime

use serde::{Deserialize, Serialize};

use crate::intent::Origin;
use crate::motion::{DriveCommand, Heading};

// Joystick command from the remote app -> runtime
// Unknown fields are ignored; a payload without `left_x_mapped` carries no intent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteCommand {
    #[serde(default)]
    pub left_x_mapped: Option<f64>,
    #[serde(default)]
    pub left_y_mapped: Option<f64>,
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    // Distance sensor gave no reading this cycle
    RangeUnknown,
}

// Per-cycle status published by runtime
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleStatus {
    pub origin: Origin,
    pub heading: Heading,
    pub distance_mm: Option<u32>,
    pub left: DriveCommand,
    pub right: DriveCommand,
    pub health: RuntimeHealth,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Rotation;

    #[test]
    fn test_remote_command_ignores_extra_fields() {
        let cmd: RemoteCommand = serde_json::from_str(
            r#"{"left_x_mapped": -40, "left_y_mapped": 12.5, "right_x_mapped": 3, "buttons": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(cmd.left_x_mapped, Some(-40.0));
        assert_eq!(cmd.left_y_mapped, Some(12.5));
    }

    #[test]
    fn test_remote_command_missing_fields() {
        let cmd: RemoteCommand = serde_json::from_str(r#"{"speed": 3}"#).unwrap();
        assert!(cmd.left_x_mapped.is_none());
        assert!(cmd.left_y_mapped.is_none());
    }

    #[test]
    fn test_status_json_shape() {
        let status = CycleStatus {
            origin: Origin::Remote,
            heading: Heading::NorthEast,
            distance_mm: None,
            left: DriveCommand::cw(50),
            right: DriveCommand::new(25, Rotation::Clockwise),
            health: RuntimeHealth::RangeUnknown,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["origin"], "remote");
        assert_eq!(json["heading"], "north_east");
        assert_eq!(json["distance_mm"], serde_json::Value::Null);
        assert_eq!(json["right"]["duty"], 25);
        assert_eq!(json["left"]["rotation"], "clockwise");
        assert_eq!(json["health"], "range_unknown");
    }
}
