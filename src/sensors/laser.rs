// Forward time-of-flight range sensor (VL53L0X class)
//
// The sensor runs in continuous back-to-back mode; each poll waits briefly for a
// completed measurement, reads it and clears the interrupt. Every failure path
// yields `DistanceReading::UNKNOWN`; an empty field of view is a valid far reading.

use tracing::{debug, info, warn};

use crate::bus::{BusError, I2cBus, Result};
use crate::motion::DistanceReading;

const REG_SYSRANGE_START: u8 = 0x00;
const REG_SYSTEM_INTERRUPT_CLEAR: u8 = 0x0B;
const REG_RESULT_INTERRUPT_STATUS: u8 = 0x13;
const REG_RESULT_RANGE_MM: u8 = 0x14 + 10;
const REG_MODEL_ID: u8 = 0xC0;

const MODEL_ID: u8 = 0xEE;
const MODE_BACK_TO_BACK: u8 = 0x02;

/// Readings at or above this value mean "nothing in range"
pub const OUT_OF_RANGE_MM: u16 = 8190;

/// Reported when nothing is in range: farther than any obstacle the sensor can see
pub const FAR_READING: DistanceReading = DistanceReading(OUT_OF_RANGE_MM as u32);

/// Interrupt status polls before a read counts as failed
const READY_POLLS: u32 = 10;

/// Produces one range reading per control cycle
pub trait DistanceSensor {
    fn read(&mut self) -> DistanceReading;
}

impl<S: DistanceSensor + ?Sized> DistanceSensor for Box<S> {
    fn read(&mut self) -> DistanceReading {
        (**self).read()
    }
}

pub struct TofSensor<B: I2cBus> {
    bus: B,
    addr: u8,
}

impl<B: I2cBus> TofSensor<B> {
    pub fn new(bus: B, addr: u8) -> Self {
        Self { bus, addr }
    }

    /// Check the model id and start continuous ranging
    pub fn begin(&mut self) -> Result<()> {
        let mut id = [0u8; 1];
        self.bus.write_read(self.addr, &[REG_MODEL_ID], &mut id)?;
        if id[0] != MODEL_ID {
            return Err(BusError::InvalidResponse {
                addr: self.addr,
                reason: format!("unexpected model id 0x{:02X}", id[0]),
            });
        }

        self.bus
            .write(self.addr, &[REG_SYSRANGE_START, MODE_BACK_TO_BACK])?;
        info!("Range sensor 0x{:02X} started", self.addr);
        Ok(())
    }

    /// Range in millimetres, `None` when nothing is in range
    pub fn read_range(&mut self) -> Result<Option<u16>> {
        let mut status = [0u8; 1];
        let mut ready = false;
        for _ in 0..READY_POLLS {
            self.bus
                .write_read(self.addr, &[REG_RESULT_INTERRUPT_STATUS], &mut status)?;
            if status[0] & 0x07 != 0 {
                ready = true;
                break;
            }
        }
        if !ready {
            return Err(BusError::Timeout { addr: self.addr });
        }

        let mut range = [0u8; 2];
        self.bus
            .write_read(self.addr, &[REG_RESULT_RANGE_MM], &mut range)?;
        self.bus.write(self.addr, &[REG_SYSTEM_INTERRUPT_CLEAR, 0x01])?;

        let mm = u16::from_be_bytes(range);
        Ok((mm < OUT_OF_RANGE_MM).then_some(mm))
    }
}

impl<B: I2cBus> DistanceSensor for TofSensor<B> {
    fn read(&mut self) -> DistanceReading {
        match self.read_range() {
            Ok(Some(mm)) => DistanceReading::from_mm(mm as u32),
            Ok(None) => {
                debug!("Range sensor: out of range");
                FAR_READING
            }
            Err(e) => {
                warn!("Range sensor read failed: {}", e);
                DistanceReading::UNKNOWN
            }
        }
    }
}

/// Simulated sensor that always reports the same reading
#[derive(Debug, Clone, Copy)]
pub struct FixedDistance(pub DistanceReading);

impl DistanceSensor for FixedDistance {
    fn read(&mut self) -> DistanceReading {
        self.0
    }
}
