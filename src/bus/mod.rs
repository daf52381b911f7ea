// I2C bus access for the rover peripherals
//
// Provides:
// - The `I2cBus` trait every device driver is written against
// - A serial I2C bridge implementation
// - Bus scanning used at startup

pub mod bridge;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

pub use bridge::SerialI2cBridge;

/// Error types for bus and device communication
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid response from device 0x{addr:02X}: {reason}")]
    InvalidResponse { addr: u8, reason: String },

    #[error("Checksum mismatch for device 0x{addr:02X}")]
    ChecksumMismatch { addr: u8 },

    #[error("Device 0x{addr:02X} did not acknowledge (status 0x{status:02X})")]
    Nack { addr: u8, status: u8 },

    #[error("Timeout waiting for response from device 0x{addr:02X}")]
    Timeout { addr: u8 },

    #[error("Device 0x{addr:02X} not ready after {attempts} attempts")]
    DeviceNotReady { addr: u8, attempts: u32 },

    #[error("No I2C devices found")]
    NoDevices,
}

pub type Result<T> = std::result::Result<T, BusError>;

/// Minimal I2C master interface
pub trait I2cBus {
    /// Write `bytes` to the device at `addr`
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<()>;

    /// Read exactly `buf.len()` bytes from the device at `addr`
    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<()>;

    /// Check whether a device acknowledges at `addr`
    fn probe(&mut self, addr: u8) -> Result<bool>;

    /// Register-style access: write `bytes` then read into `buf`
    fn write_read(&mut self, addr: u8, bytes: &[u8], buf: &mut [u8]) -> Result<()> {
        self.write(addr, bytes)?;
        self.read(addr, buf)
    }
}

impl<B: I2cBus + ?Sized> I2cBus for &mut B {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<()> {
        (**self).write(addr, bytes)
    }

    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<()> {
        (**self).read(addr, buf)
    }

    fn probe(&mut self, addr: u8) -> Result<bool> {
        (**self).probe(addr)
    }

    fn write_read(&mut self, addr: u8, bytes: &[u8], buf: &mut [u8]) -> Result<()> {
        (**self).write_read(addr, bytes, buf)
    }
}

/// One bus handed out to several device drivers.
/// The control cycle is single-threaded, so a `RefCell` is enough.
pub struct SharedBus<B>(Rc<RefCell<B>>);

impl<B> SharedBus<B> {
    pub fn new(bus: B) -> Self {
        Self(Rc::new(RefCell::new(bus)))
    }
}

impl<B> Clone for SharedBus<B> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<B: I2cBus> I2cBus for SharedBus<B> {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<()> {
        self.0.borrow_mut().write(addr, bytes)
    }

    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<()> {
        self.0.borrow_mut().read(addr, buf)
    }

    fn probe(&mut self, addr: u8) -> Result<bool> {
        self.0.borrow_mut().probe(addr)
    }

    fn write_read(&mut self, addr: u8, bytes: &[u8], buf: &mut [u8]) -> Result<()> {
        self.0.borrow_mut().write_read(addr, bytes, buf)
    }
}

/// Scan the 7-bit address space and return every responding address.
/// An empty bus is an error: nothing downstream can work without devices.
pub fn scan<B: I2cBus + ?Sized>(bus: &mut B) -> Result<Vec<u8>> {
    info!("Scanning I2C bus for connected devices...");

    let mut found = Vec::new();
    for addr in 1..127u8 {
        match bus.probe(addr) {
            Ok(true) => {
                info!("I2C device found at address 0x{:02X}", addr);
                found.push(addr);
            }
            Ok(false) => {}
            Err(e) => debug!("Probe error at address 0x{:02X}: {}", addr, e),
        }
    }

    if found.is_empty() {
        return Err(BusError::NoDevices);
    }

    info!("I2C scan complete. Found {} devices", found.len());
    Ok(found)
}
