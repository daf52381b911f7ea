// Keyboard joystick: WASD steer (combine for diagonals), R/F deflection, Q quit
// Publishes the same JSON the remote app sends: {"left_x_mapped": x, "left_y_mapped": y}
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::info;

use rover_zenoh_runtime::config::TOPIC_CMD_JOYSTICK;

const DEFLECTIONS: [i32; 3] = [20, 60, 100]; // joystick units, deadband is ±10
const INPUT_TIMEOUT_MS: u64 = 150; // Centre the stick after this much time with no input

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD_JOYSTICK).await?;

    info!("Controls: W/S=north/south, A/D=west/east, R/F=deflection, Q=quit");
    info!("Deflection: LOW");

    enable_raw_mode()?;
    let result = run_joystick(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_joystick(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut level: usize = 0;

    // Stick position, y positive = north
    let mut x = 0;
    let mut y = 0;
    let mut last_x_input = Instant::now();
    let mut last_y_input = Instant::now();

    loop {
        // Poll for key with 50ms timeout (one message per control cycle)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    KeyCode::Char('w') if pressed => {
                        y = DEFLECTIONS[level];
                        last_y_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        y = -DEFLECTIONS[level];
                        last_y_input = Instant::now();
                    }
                    KeyCode::Char('a') if pressed => {
                        x = -DEFLECTIONS[level];
                        last_x_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        x = DEFLECTIONS[level];
                        last_x_input = Instant::now();
                    }

                    KeyCode::Char('r') if pressed => {
                        level = (level + 1).min(2);
                        print_level(level);
                    }
                    KeyCode::Char('f') if pressed => {
                        level = level.saturating_sub(1);
                        print_level(level);
                    }

                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        // Axes centre independently so held diagonals keep both components
        let timeout = Duration::from_millis(INPUT_TIMEOUT_MS);
        if last_x_input.elapsed() > timeout {
            x = 0;
        }
        if last_y_input.elapsed() > timeout {
            y = 0;
        }

        let cmd = json!({
            "left_x_mapped": x,
            "left_y_mapped": y
        });
        publisher.put(cmd.to_string()).await?;
    }

    // Leave the rover stopped
    let cmd = json!({ "left_x_mapped": 0, "left_y_mapped": 0 });
    publisher.put(cmd.to_string()).await?;

    Ok(())
}

fn print_level(idx: usize) {
    let label = ["LOW", "MED", "HIGH"][idx];
    info!("Deflection: {}", label);
}
