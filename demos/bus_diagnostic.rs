// Bus diagnostic: READ-ONLY check of every rover peripheral
//
// Scans the I2C bus, reads motor shield info, one Nunchuck sample and one range reading.
// Nothing here changes motor state. Run this before drive_test.
//
// Usage: cargo run --example bus_diagnostic -- [port]
// Example: cargo run --example bus_diagnostic -- /dev/ttyUSB0

use rover_zenoh_runtime::bus::{self, SerialI2cBridge, SharedBus};
use rover_zenoh_runtime::config::{self, HardwareConfig};
use rover_zenoh_runtime::motor::MotorShield;
use rover_zenoh_runtime::sensors::{DistanceSensor, Nunchuck, TofSensor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let hw = HardwareConfig::default();
    let port = std::env::args().nth(1).unwrap_or(hw.port.clone());

    println!("Rover bus diagnostic (read-only)");
    println!("Serial port: {}", port);
    println!();

    println!("Step 1: Opening I2C bridge...");
    let bridge = match SerialI2cBridge::open_with_baudrate(&port, hw.baudrate) {
        Ok(bridge) => {
            println!("  ✓ Bridge opened");
            bridge
        }
        Err(e) => {
            println!("  ✗ Failed to open bridge: {}", e);
            println!("  - Check the port path and the USB cable");
            return Err(e.into());
        }
    };
    let mut shared = SharedBus::new(bridge);
    println!();

    println!("Step 2: Scanning bus...");
    let found = bus::scan(&mut shared)?;
    for (name, addr) in [
        ("Left motor shield", hw.left_shield),
        ("Right motor shield", hw.right_shield),
        ("Nunchuck", hw.nunchuck),
        ("Range sensor", hw.tof),
    ] {
        let mark = if found.contains(&addr) { "✓" } else { "✗ MISSING" };
        println!("  {} (0x{:02X}): {}", name, addr, mark);
    }
    println!();

    println!("Step 3: Motor shields...");
    for (name, addr) in [("Left", hw.left_shield), ("Right", hw.right_shield)] {
        match MotorShield::new(addr).get_info(&mut shared) {
            Ok(info) => println!(
                "  {} (0x{:02X}): product 0x{:02X}, version {} {}",
                name,
                addr,
                info.product_id,
                info.version,
                if info.is_ready() { "(ready)" } else { "(NOT READY)" }
            ),
            Err(e) => println!("  {} (0x{:02X}): ERROR - {}", name, addr, e),
        }
    }
    println!();

    println!("Step 4: Nunchuck sample...");
    let mut nunchuck = Nunchuck::new(shared.clone(), hw.nunchuck);
    match nunchuck.begin().and_then(|_| nunchuck.read_sample()) {
        Ok(sample) => {
            println!("  Joystick: x={} y={}", sample.joy_x, sample.joy_y);
            println!(
                "  Accel: x={} y={} z={}",
                sample.accel_x, sample.accel_y, sample.accel_z
            );
            println!("  Buttons: C={} Z={}", sample.c_button, sample.z_button);
            println!("  Intent: {:?}", sample.intent().values());
        }
        Err(e) => println!("  ERROR - {}", e),
    }
    println!();

    println!("Step 5: Range sensor...");
    let mut sensor = TofSensor::new(shared, hw.tof);
    match sensor.begin() {
        Ok(()) => match sensor.read().millimeters() {
            Some(mm) => println!("  Range: {} mm", mm),
            None => println!("  Range: unknown (read failed)"),
        },
        Err(e) => println!("  ERROR - {}", e),
    }
    println!();

    println!("Diagnostic complete.");
    println!(
        "Next step: cargo run --example drive_test with wheels OFF THE GROUND ({})",
        config::BRIDGE_PORT
    );

    Ok(())
}
