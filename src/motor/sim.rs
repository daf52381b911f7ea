// Simulated drive: keeps the last commanded state per side instead of touching hardware

use tracing::debug;

use super::{MotorActuator, Side};
use crate::bus::Result;
use crate::motion::{DriveCommand, Rotation};

#[derive(Debug, Clone)]
pub struct SimulatedDrive {
    left: DriveCommand,
    right: DriveCommand,
}

impl SimulatedDrive {
    pub fn new() -> Self {
        Self {
            left: DriveCommand::stopped(),
            right: DriveCommand::stopped(),
        }
    }

    /// Last commanded state of one side
    pub fn state(&self, side: Side) -> DriveCommand {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut DriveCommand {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

impl Default for SimulatedDrive {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorActuator for SimulatedDrive {
    fn set_duty(&mut self, side: Side, percent: u8) -> Result<()> {
        self.side_mut(side).duty = percent.min(100);
        Ok(())
    }

    fn set_rotation(&mut self, side: Side, rotation: Rotation) -> Result<()> {
        self.side_mut(side).rotation = rotation;
        debug!("Simulated {:?} side: {:?}", side, self.state(side));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        // Like the shields, stopping only changes the output state
        self.left.rotation = Rotation::Stopped;
        self.right.rotation = Rotation::Stopped;
        Ok(())
    }
}
