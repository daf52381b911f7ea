// Motor control module for the rover's differential drive
//
// Provides:
// - The `MotorActuator` trait the control cycle drives
// - I2C motor shield command set
// - Two-sided drivetrain (left + right shield) and a simulated drive

mod driver;
pub mod shield;
mod sim;

pub use driver::DriveTrain;
pub use shield::{MotorShield, ShieldInfo, ShieldStatus};
pub use sim::SimulatedDrive;

use crate::bus::Result;
use crate::motion::{DriveCommand, MotionPlan, Rotation};

/// Physical drive side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Applies drive commands to the two motor sides.
///
/// Duty and rotation are separate writes; the last write per field within a cycle
/// determines the commanded state, so callers may issue them in either order.
pub trait MotorActuator {
    fn set_duty(&mut self, side: Side, percent: u8) -> Result<()>;

    fn set_rotation(&mut self, side: Side, rotation: Rotation) -> Result<()>;

    /// Stop both sides
    fn stop(&mut self) -> Result<()>;

    /// Duty then rotation for one side
    fn apply(&mut self, side: Side, command: DriveCommand) -> Result<()> {
        self.set_duty(side, command.duty)?;
        self.set_rotation(side, command.rotation)
    }

    /// Apply a full plan, left side first.
    /// The right side is still written when the left fails; the first error is returned.
    fn apply_plan(&mut self, plan: &MotionPlan) -> Result<()> {
        let left = self.apply(Side::Left, plan.left);
        let right = self.apply(Side::Right, plan.right);
        left.and(right)
    }
}

impl<A: MotorActuator + ?Sized> MotorActuator for Box<A> {
    fn set_duty(&mut self, side: Side, percent: u8) -> Result<()> {
        (**self).set_duty(side, percent)
    }

    fn set_rotation(&mut self, side: Side, rotation: Rotation) -> Result<()> {
        (**self).set_rotation(side, rotation)
    }

    fn stop(&mut self) -> Result<()> {
        (**self).stop()
    }
}
