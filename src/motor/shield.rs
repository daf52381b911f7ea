// I2C dual-channel DC motor shield
//
// Command frame: [Command, Channel, Params...]. Both channels of a shield drive the
// motors of one vehicle side, so the drivetrain always addresses `Channel::Both`.

use std::thread::sleep;
use std::time::Duration;

use tracing::{debug, info};

use crate::bus::{BusError, I2cBus, Result};
use crate::motion::Rotation;

/// Product id reported by a ready motor shield
pub const PRODUCT_ID_MOTOR: u8 = 0x02;

/// Command set
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum Command {
    GetInfo = 0x01,
    ChangeStatus = 0x04,
    ChangeFreq = 0x05,
    ChangeDuty = 0x06,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Channel {
    A = 0x00,
    B = 0x01,
    Both = 0x02,
}

/// Output stage state
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShieldStatus {
    Stop = 0x00,
    Ccw = 0x01,
    Cw = 0x02,
    ShortBrake = 0x03,
    Standby = 0x04,
}

impl From<Rotation> for ShieldStatus {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Clockwise => ShieldStatus::Cw,
            Rotation::CounterClockwise => ShieldStatus::Ccw,
            Rotation::Stopped => ShieldStatus::Stop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShieldInfo {
    pub product_id: u8,
    pub version: u8,
}

impl ShieldInfo {
    pub fn is_ready(&self) -> bool {
        self.product_id == PRODUCT_ID_MOTOR
    }
}

/// One motor shield on the bus
#[derive(Debug, Clone, Copy)]
pub struct MotorShield {
    addr: u8,
}

impl MotorShield {
    pub fn new(addr: u8) -> Self {
        Self { addr }
    }

    pub fn get_info<B: I2cBus + ?Sized>(&self, bus: &mut B) -> Result<ShieldInfo> {
        let mut buf = [0u8; 2];
        bus.write_read(self.addr, &[Command::GetInfo as u8], &mut buf)?;
        Ok(ShieldInfo {
            product_id: buf[0],
            version: buf[1],
        })
    }

    /// Poll `get_info` until the shield reports the motor product id
    pub fn wait_ready<B: I2cBus + ?Sized>(
        &self,
        bus: &mut B,
        attempts: u32,
        interval: Duration,
    ) -> Result<ShieldInfo> {
        for attempt in 1..=attempts {
            match self.get_info(bus) {
                Ok(info) if info.is_ready() => {
                    info!(
                        "Motor shield 0x{:02X} ready (version {})",
                        self.addr, info.version
                    );
                    return Ok(info);
                }
                Ok(info) => debug!(
                    "Motor shield 0x{:02X} not ready (product id 0x{:02X}), attempt {}",
                    self.addr, info.product_id, attempt
                ),
                Err(e) => debug!(
                    "Motor shield 0x{:02X} info failed on attempt {}: {}",
                    self.addr, attempt, e
                ),
            }
            if attempt < attempts && !interval.is_zero() {
                sleep(interval);
            }
        }

        Err(BusError::DeviceNotReady {
            addr: self.addr,
            attempts,
        })
    }

    pub fn change_freq<B: I2cBus + ?Sized>(
        &self,
        bus: &mut B,
        channel: Channel,
        freq_hz: u32,
    ) -> Result<()> {
        let f = freq_hz.to_le_bytes();
        bus.write(
            self.addr,
            &[Command::ChangeFreq as u8, channel as u8, f[0], f[1], f[2], f[3]],
        )
    }

    /// Duty in percent; sent as hundredths of a percent
    pub fn change_duty<B: I2cBus + ?Sized>(
        &self,
        bus: &mut B,
        channel: Channel,
        percent: u8,
    ) -> Result<()> {
        let raw = (percent.min(100) as u16 * 100).to_le_bytes();
        bus.write(
            self.addr,
            &[Command::ChangeDuty as u8, channel as u8, raw[0], raw[1]],
        )
    }

    pub fn change_status<B: I2cBus + ?Sized>(
        &self,
        bus: &mut B,
        channel: Channel,
        status: ShieldStatus,
    ) -> Result<()> {
        bus.write(
            self.addr,
            &[Command::ChangeStatus as u8, channel as u8, status as u8],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;

    #[test]
    fn test_command_frames() {
        let mut bus = MockBus::with_devices(&[0x30]);
        let shield = MotorShield::new(0x30);

        shield.change_duty(&mut bus, Channel::Both, 50).unwrap();
        shield
            .change_status(&mut bus, Channel::Both, Rotation::CounterClockwise.into())
            .unwrap();
        shield.change_freq(&mut bus, Channel::Both, 1000).unwrap();

        assert_eq!(
            bus.writes_to(0x30),
            vec![
                vec![0x06, 0x02, 0x88, 0x13], // 5000 = 0x1388
                vec![0x04, 0x02, 0x01],
                vec![0x05, 0x02, 0xE8, 0x03, 0x00, 0x00],
            ]
        );
    }

    #[test]
    fn test_duty_clamped_to_100() {
        let mut bus = MockBus::with_devices(&[0x09]);
        MotorShield::new(0x09)
            .change_duty(&mut bus, Channel::A, 200)
            .unwrap();
        assert_eq!(bus.writes_to(0x09), vec![vec![0x06, 0x00, 0x10, 0x27]]);
    }

    #[test]
    fn test_rotation_to_status() {
        assert_eq!(ShieldStatus::from(Rotation::Clockwise), ShieldStatus::Cw);
        assert_eq!(ShieldStatus::from(Rotation::CounterClockwise), ShieldStatus::Ccw);
        assert_eq!(ShieldStatus::from(Rotation::Stopped), ShieldStatus::Stop);
    }

    #[test]
    fn test_wait_ready_polls_until_product_id() {
        let mut bus = MockBus::with_devices(&[0x09]);
        bus.queue_read(0x09, &[0x00, 0x00]);
        bus.queue_read(0x09, &[0xFF, 0x00]);
        bus.queue_read(0x09, &[PRODUCT_ID_MOTOR, 0x03]);

        let info = MotorShield::new(0x09)
            .wait_ready(&mut bus, 5, Duration::ZERO)
            .unwrap();
        assert_eq!(info.version, 3);
        assert_eq!(bus.writes_to(0x09).len(), 3);
    }

    #[test]
    fn test_wait_ready_gives_up() {
        let mut bus = MockBus::with_devices(&[0x09]);
        bus.queue_read(0x09, &[0x00, 0x00]);
        let err = MotorShield::new(0x09)
            .wait_ready(&mut bus, 3, Duration::ZERO)
            .unwrap_err();
        assert!(matches!(
            err,
            BusError::DeviceNotReady {
                addr: 0x09,
                attempts: 3
            }
        ));
    }
}
