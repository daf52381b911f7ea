// Drivetrain for the rover
//
// Two motor shields on one bus: the left shield drives the left motors, the right shield
// the right motors. Both channels of each shield are commanded together.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::shield::{Channel, MotorShield, ShieldStatus};
use super::{MotorActuator, Side};
use crate::bus::{I2cBus, Result};
use crate::config::HardwareConfig;
use crate::motion::Rotation;

pub struct DriveTrain<B: I2cBus> {
    bus: B,
    left: MotorShield,
    right: MotorShield,
}

impl<B: I2cBus> DriveTrain<B> {
    pub fn new(bus: B, left_addr: u8, right_addr: u8) -> Self {
        Self {
            bus,
            left: MotorShield::new(left_addr),
            right: MotorShield::new(right_addr),
        }
    }

    pub fn from_config(bus: B, config: &HardwareConfig) -> Self {
        Self::new(bus, config.left_shield, config.right_shield)
    }

    /// Wait for both shields to report ready, then configure the PWM frequency.
    ///
    /// No command may be issued before this succeeds.
    pub fn initialize(&mut self, attempts: u32, interval: Duration, pwm_freq_hz: u32) -> Result<()> {
        info!("Motor shield init");

        self.left.wait_ready(&mut self.bus, attempts, interval)?;
        self.right.wait_ready(&mut self.bus, attempts, interval)?;

        info!("Setting PWM frequency to {}Hz on both shields", pwm_freq_hz);
        self.left
            .change_freq(&mut self.bus, Channel::Both, pwm_freq_hz)?;
        self.right
            .change_freq(&mut self.bus, Channel::Both, pwm_freq_hz)?;

        info!("Motor shields initialized successfully");
        Ok(())
    }

    fn shield(&self, side: Side) -> MotorShield {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

impl<B: I2cBus> MotorActuator for DriveTrain<B> {
    fn set_duty(&mut self, side: Side, percent: u8) -> Result<()> {
        debug!("{:?} duty {}%", side, percent);
        let shield = self.shield(side);
        shield.change_duty(&mut self.bus, Channel::Both, percent)
    }

    fn set_rotation(&mut self, side: Side, rotation: Rotation) -> Result<()> {
        debug!("{:?} rotation {:?}", side, rotation);
        let shield = self.shield(side);
        shield.change_status(&mut self.bus, Channel::Both, rotation.into())
    }

    fn stop(&mut self) -> Result<()> {
        info!("Stopping all motors");
        // Both shields get the stop even if one of them fails
        let left = self
            .left
            .change_status(&mut self.bus, Channel::Both, ShieldStatus::Stop);
        let right = self
            .right
            .change_status(&mut self.bus, Channel::Both, ShieldStatus::Stop);
        left.and(right)
    }
}

impl<B: I2cBus> Drop for DriveTrain<B> {
    fn drop(&mut self) {
        // Try to stop motors when the drivetrain goes away
        if let Err(e) = self.stop() {
            warn!("Failed to stop motors on drop: {}", e);
        }
    }
}
