// Serial I2C bridge protocol
//
// The bridge board forwards I2C transactions it receives over a serial link.
// Packet format: [0xFF, 0xFF, ADDR, Length, Instruction, Params..., Checksum]
// Response:      [0xFF, 0xFF, ADDR, Length, Status, Data..., Checksum]

use serialport::{self, SerialPort};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::debug;

use super::{BusError, I2cBus, Result};

/// Serial read timeout for the bridge
pub const DEFAULT_TIMEOUT_MS: u64 = 20;

/// Packet header bytes
const HEADER: [u8; 2] = [0xFF, 0xFF];

/// Instruction set
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum Instruction {
    Probe = 0x01,
    Read = 0x02,  // params: [count]
    Write = 0x03, // params: bytes to write
}

/// I2C bus reached through a serial bridge
pub struct SerialI2cBridge {
    port: Box<dyn SerialPort>,
}

impl SerialI2cBridge {
    /// Open with custom baudrate
    pub fn open_with_baudrate(port_name: &str, baudrate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baudrate)
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .open()?;

        Ok(Self { port })
    }

    /// Calculate checksum for a packet (excluding header)
    fn checksum(data: &[u8]) -> u8 {
        let sum: u32 = data.iter().map(|&b| b as u32).sum();
        (!sum & 0xFF) as u8
    }

    /// Build a packet with header and checksum
    fn build_packet(addr: u8, instruction: Instruction, params: &[u8]) -> Vec<u8> {
        let length = (params.len() + 2) as u8; // params + instruction + checksum
        let mut packet = Vec::with_capacity(6 + params.len());

        packet.extend_from_slice(&HEADER);
        packet.push(addr);
        packet.push(length);
        packet.push(instruction as u8);
        packet.extend_from_slice(params);

        let checksum_data = &packet[2..]; // skip header
        packet.push(Self::checksum(checksum_data));

        packet
    }

    /// Validate a response frame (without header) and return its data bytes
    fn parse_response(expected_addr: u8, addr: u8, body: &[u8]) -> Result<Vec<u8>> {
        if addr != expected_addr {
            return Err(BusError::InvalidResponse {
                addr: expected_addr,
                reason: format!("address mismatch: got 0x{:02X}", addr),
            });
        }
        if body.len() < 2 {
            return Err(BusError::InvalidResponse {
                addr,
                reason: format!("response too short ({} bytes)", body.len()),
            });
        }

        let mut checksum_data = vec![addr, body.len() as u8];
        checksum_data.extend_from_slice(&body[..body.len() - 1]);
        if Self::checksum(&checksum_data) != body[body.len() - 1] {
            return Err(BusError::ChecksumMismatch { addr });
        }

        let status = body[0];
        if status != 0 {
            return Err(BusError::Nack { addr, status });
        }

        Ok(body[1..body.len() - 1].to_vec())
    }

    fn send_packet(&mut self, packet: &[u8]) -> Result<()> {
        self.port.write_all(packet)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_response(&mut self, expected_addr: u8) -> Result<Vec<u8>> {
        let mut header = [0u8; 2];
        self.port.read_exact(&mut header).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                BusError::Timeout { addr: expected_addr }
            } else {
                BusError::Io(e)
            }
        })?;

        if header != HEADER {
            return Err(BusError::InvalidResponse {
                addr: expected_addr,
                reason: format!("Invalid header: {:02X?}", header),
            });
        }

        let mut addr_length = [0u8; 2];
        self.port.read_exact(&mut addr_length)?;
        let addr = addr_length[0];
        let length = addr_length[1] as usize;

        // status + data + checksum = length bytes
        let mut body = vec![0u8; length];
        self.port.read_exact(&mut body)?;

        Self::parse_response(expected_addr, addr, &body)
    }

    fn transact(&mut self, addr: u8, instruction: Instruction, params: &[u8]) -> Result<Vec<u8>> {
        let packet = Self::build_packet(addr, instruction, params);
        self.send_packet(&packet)?;
        self.read_response(addr)
    }
}

impl I2cBus for SerialI2cBridge {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<()> {
        debug!("I2C write to 0x{:02X}: {:02X?}", addr, bytes);
        self.transact(addr, Instruction::Write, bytes)?;
        Ok(())
    }

    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<()> {
        let data = self.transact(addr, Instruction::Read, &[buf.len() as u8])?;
        if data.len() != buf.len() {
            return Err(BusError::InvalidResponse {
                addr,
                reason: format!("Expected {} bytes, got {}", buf.len(), data.len()),
            });
        }
        buf.copy_from_slice(&data);
        Ok(())
    }

    fn probe(&mut self, addr: u8) -> Result<bool> {
        match self.transact(addr, Instruction::Probe, &[]) {
            Ok(_) => Ok(true),
            Err(BusError::Timeout { .. }) | Err(BusError::Nack { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
