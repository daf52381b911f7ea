// Local handheld controller (Wii Nunchuck class) on I2C
//
// Sample layout (6 bytes, each decoded with (b ^ 0x17) + 0x17):
//   [0] joystick x   [1] joystick y
//   [2] accel x MSBs [3] accel y MSBs [4] accel z MSBs
//   [5] bit0 Z (active low), bit1 C (active low), bits 2..7 accel LSB pairs x, y, z

use tracing::{info, warn};

use crate::bus::{I2cBus, Result};
use crate::intent::{Axis, DirectionalIntent, Origin, map_range};

pub const SAMPLE_LEN: usize = 6;

/// Produces the fallback intent each cycle
pub trait LocalController {
    fn poll_intent(&mut self) -> DirectionalIntent;
}

impl<C: LocalController + ?Sized> LocalController for Box<C> {
    fn poll_intent(&mut self) -> DirectionalIntent {
        (**self).poll_intent()
    }
}

pub fn decode_byte(b: u8) -> u8 {
    (b ^ 0x17).wrapping_add(0x17)
}

/// Quantize a full-range raw axis (0..=255) onto {-1, 0, 1}
pub fn quantize_axis(raw: u8) -> Axis {
    Axis::from_signum(map_range(raw as i64, 0, 255, -1, 1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NunchuckSample {
    pub joy_x: u8,
    pub joy_y: u8,
    pub accel_x: u16, // 10-bit
    pub accel_y: u16,
    pub accel_z: u16,
    pub z_button: bool,
    pub c_button: bool,
}

impl NunchuckSample {
    /// Parse an already decoded sample
    pub fn parse(buf: &[u8; SAMPLE_LEN]) -> Self {
        let extra = buf[5];
        let accel = |msb: u8, shift: u8| ((msb as u16) << 2) | ((extra >> shift) & 0x03) as u16;

        Self {
            joy_x: buf[0],
            joy_y: buf[1],
            accel_x: accel(buf[2], 2),
            accel_y: accel(buf[3], 4),
            accel_z: accel(buf[4], 6),
            z_button: extra & 0x01 == 0,
            c_button: extra & 0x02 == 0,
        }
    }

    /// Joystick position as a local intent; buttons and accelerometer are not used
    pub fn intent(&self) -> DirectionalIntent {
        DirectionalIntent::new(
            quantize_axis(self.joy_x),
            quantize_axis(self.joy_y),
            Origin::Local,
        )
    }
}

pub struct Nunchuck<B: I2cBus> {
    bus: B,
    addr: u8,
}

impl<B: I2cBus> Nunchuck<B> {
    pub fn new(bus: B, addr: u8) -> Self {
        Self { bus, addr }
    }

    /// Send the initialization handshake
    pub fn begin(&mut self) -> Result<()> {
        info!("Nunchuck initialise");
        self.bus.write(self.addr, &[0x40, 0x00])
    }

    /// Read and decode one sample, then request the next one
    pub fn read_sample(&mut self) -> Result<NunchuckSample> {
        let mut buf = [0u8; SAMPLE_LEN];
        self.bus.read(self.addr, &mut buf)?;
        for b in buf.iter_mut() {
            *b = decode_byte(*b);
        }
        self.bus.write(self.addr, &[0x00])?;
        Ok(NunchuckSample::parse(&buf))
    }
}

impl<B: I2cBus> LocalController for Nunchuck<B> {
    fn poll_intent(&mut self) -> DirectionalIntent {
        match self.read_sample() {
            Ok(sample) => sample.intent(),
            Err(e) => {
                warn!("Nunchuck read failed: {}", e);
                DirectionalIntent::neutral(Origin::Local)
            }
        }
    }
}

/// Simulated controller with the stick at rest
#[derive(Debug, Clone, Copy, Default)]
pub struct CenteredController;

impl LocalController for CenteredController {
    fn poll_intent(&mut self) -> DirectionalIntent {
        DirectionalIntent::neutral(Origin::Local)
    }
}
