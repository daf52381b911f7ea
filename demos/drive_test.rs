// Drive test: step through every heading with the wheels off the ground
//
// IMPORTANT: Run bus_diagnostic FIRST to verify both motor shields respond.
//
// Usage: cargo run --example drive_test -- [port]
// Example: cargo run --example drive_test -- /dev/ttyUSB0

use rover_zenoh_runtime::bus::SerialI2cBridge;
use rover_zenoh_runtime::config::HardwareConfig;
use rover_zenoh_runtime::intent::{DirectionalIntent, Origin};
use rover_zenoh_runtime::motion::{DistanceReading, MotionMapper};
use rover_zenoh_runtime::motor::{DriveTrain, MotorActuator};
use std::io::{self, Write};
use std::thread::sleep;
use std::time::Duration;

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let hw = HardwareConfig::default();
    let port = std::env::args().nth(1).unwrap_or(hw.port.clone());

    println!("Rover drive test (WITH WRITES)");
    println!("  ⚠  This tool WILL drive the motors!");
    println!("  ⚠  Make sure wheels are OFF THE GROUND before proceeding!");
    println!();
    println!("Serial port: {}", port);
    println!();

    if !confirm("Have you run bus_diagnostic and seen both motor shields ready?")? {
        println!("Please run: cargo run --example bus_diagnostic -- {}", port);
        return Ok(());
    }
    if !confirm("Are the rover's wheels OFF THE GROUND?")? {
        println!("Please elevate the rover so the wheels can spin freely.");
        return Ok(());
    }

    let bridge = SerialI2cBridge::open_with_baudrate(&port, hw.baudrate)?;
    let mut drive = DriveTrain::from_config(bridge, &hw);

    println!("Step 1: Waiting for motor shields...");
    drive.initialize(hw.ready_attempts, hw.ready_interval(), hw.pwm_freq_hz)?;
    println!("  ✓ Shields ready, PWM at {}Hz", hw.pwm_freq_hz);
    println!();

    println!("Step 2: Heading sweep (0.5s each, nothing in front of the sensor)");
    if !confirm("Proceed with motion test?")? {
        drive.stop()?;
        return Ok(());
    }

    let mapper = MotionMapper::default();
    let far = DistanceReading::UNKNOWN;
    let test_duration = Duration::from_millis(500);
    let pause_duration = Duration::from_millis(500);

    let sweep = [(0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1)];
    for (x, y) in sweep {
        let intent = DirectionalIntent::from_values(x, y, Origin::Local);
        let plan = mapper.map(&intent, far);
        println!(
            "  {:<10} left={:?} right={:?}",
            plan.heading.name(),
            plan.left,
            plan.right
        );

        drive.apply_plan(&plan)?;
        sleep(test_duration);

        drive.stop()?;
        sleep(pause_duration);
    }

    println!();
    println!("Step 3: Forward duty against distance");
    for mm in [400, 300, 200, 100, 60, 30] {
        println!(
            "  {:>4} mm -> {}%",
            mm,
            mapper.scaled_duty(DistanceReading::from_mm(mm))
        );
    }

    drive.stop()?;
    println!();
    println!("Test complete. Start the runtime with: cargo run");

    Ok(())
}
