// Control loop: remote + local input -> arbitration -> distance -> motion mapping -> motors
// One cycle runs to completion before the next; the interval sets the cadence.
// Remote payloads queue up in the subscriber and are drained at the start of each cycle.

use std::error::Error;

use tokio::time::interval;
use tracing::{info, warn};

use crate::arbiter;
use crate::bus::{self, BusError, SerialI2cBridge, SharedBus};
use crate::config::Config;
use crate::intent::DirectionalIntent;
use crate::messages::{CycleStatus, RuntimeHealth};
use crate::motion::{DistanceReading, MotionMapper, MotionPlan};
use crate::motor::{DriveTrain, MotorActuator, SimulatedDrive};
use crate::remote::RemoteInput;
use crate::sensors::{
    CenteredController, DistanceSensor, FixedDistance, LocalController, Nunchuck, TofSensor,
};

/// What one cycle decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutput {
    pub intent: DirectionalIntent,
    pub distance: DistanceReading,
    pub plan: MotionPlan,
}

impl CycleOutput {
    pub fn health(&self) -> RuntimeHealth {
        if self.distance.is_unknown() {
            RuntimeHealth::RangeUnknown
        } else {
            RuntimeHealth::Ok
        }
    }

    pub fn status(&self) -> CycleStatus {
        CycleStatus {
            origin: self.intent.origin,
            heading: self.plan.heading,
            distance_mm: self.distance.millimeters(),
            left: self.plan.left,
            right: self.plan.right,
            health: self.health(),
        }
    }

    /// Payload for the laser topic
    pub fn laser_payload(&self) -> String {
        match self.distance.millimeters() {
            Some(mm) => mm.to_string(),
            None => "unknown".to_string(),
        }
    }
}

pub struct Runtime<L, S, M> {
    remote: RemoteInput,
    local: L,
    sensor: S,
    mapper: MotionMapper,
    motors: M,
}

/// Runtime with devices chosen at startup
pub type DeviceRuntime =
    Runtime<Box<dyn LocalController>, Box<dyn DistanceSensor>, Box<dyn MotorActuator>>;

impl<L, S, M> Runtime<L, S, M>
where
    L: LocalController,
    S: DistanceSensor,
    M: MotorActuator,
{
    pub fn new(config: &Config, local: L, sensor: S, motors: M) -> Self {
        Self {
            remote: RemoteInput::new(config.remote.clone()),
            local,
            sensor,
            mapper: MotionMapper::new(config.motion.clone()),
            motors,
        }
    }

    /// Feed one raw remote payload received since the last cycle
    pub fn on_remote_payload(&mut self, payload: &[u8]) -> bool {
        self.remote.on_payload(payload)
    }

    /// Run one control cycle. If the plan cannot be applied the motors are stopped
    /// before the error is returned.
    pub fn step(&mut self) -> Result<CycleOutput, BusError> {
        let remote = self.remote.poll();
        let local = self.local.poll_intent();
        let intent = arbiter::select_poll(remote, local);

        let distance = self.sensor.read();
        let plan = self.mapper.map(&intent, distance);

        if let Err(e) = self.motors.apply_plan(&plan) {
            // Never leave one side running on the last good command
            if let Err(stop_err) = self.motors.stop() {
                warn!("Failed to stop motors after drive error: {}", stop_err);
            }
            return Err(e);
        }

        Ok(CycleOutput {
            intent,
            distance,
            plan,
        })
    }

    pub fn motors(&self) -> &M {
        &self.motors
    }

    pub fn stop(&mut self) -> Result<(), BusError> {
        self.motors.stop()
    }
}

impl DeviceRuntime {
    /// Devices simulated in-process: stick centred, fixed range, recorded motor state
    pub fn simulated(config: &Config) -> Self {
        info!(
            "Using simulated devices ({}mm forward range)",
            config.hardware.sim_distance_mm
        );
        Self::new(
            config,
            Box::new(CenteredController),
            Box::new(FixedDistance(DistanceReading::from_mm(
                config.hardware.sim_distance_mm,
            ))),
            Box::new(SimulatedDrive::new()),
        )
    }

    /// Open the I2C bridge, discover devices and bring up sensors and motor shields
    pub fn hardware(config: &Config) -> Result<Self, BusError> {
        let hw = &config.hardware;
        info!("Opening I2C bridge on {} @ {} baud", hw.port, hw.baudrate);
        let bridge = SerialI2cBridge::open_with_baudrate(&hw.port, hw.baudrate)?;
        let mut shared = SharedBus::new(bridge);

        bus::scan(&mut shared)?;

        let mut sensor = TofSensor::new(shared.clone(), hw.tof);
        if let Err(e) = sensor.begin() {
            warn!("Range sensor init failed, readings will be unknown: {}", e);
        }

        let mut nunchuck = Nunchuck::new(shared.clone(), hw.nunchuck);
        if let Err(e) = nunchuck.begin() {
            warn!("Nunchuck init failed: {}", e);
        }

        let mut drive = DriveTrain::from_config(shared, hw);
        drive.initialize(hw.ready_attempts, hw.ready_interval(), hw.pwm_freq_hz)?;

        Ok(Self::new(
            config,
            Box::new(nunchuck),
            Box::new(sensor),
            Box::new(drive),
        ))
    }
}

pub async fn run(config: Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut runtime = if config.hardware.simulated {
        DeviceRuntime::simulated(&config)
    } else {
        DeviceRuntime::hardware(&config)?
    };

    info!("Opening Zenoh session...");
    let zenoh_config = match &config.zenoh_config {
        Some(path) => zenoh::Config::from_file(path)?,
        None => zenoh::Config::default(),
    };
    let session = zenoh::open(zenoh_config).await?;

    info!("Setting up publishers and subscribers...");
    let topics = &config.topics;
    let subscriber = session.declare_subscriber(topics.joystick.as_str()).await?;
    let pub_direction = session.declare_publisher(topics.direction.as_str()).await?;
    let pub_laser = session.declare_publisher(topics.laser.as_str()).await?;
    let pub_status = session.declare_publisher(topics.status.as_str()).await?;
    let pub_log = session.declare_publisher(topics.log.as_str()).await?;

    pub_log.put("Connected".to_string()).await?;

    let mut tick = interval(config.cycle_period());

    info!(
        "Runtime started: {}ms cycle, safe distance {}mm, dead zone {}mm",
        config.cycle_period_ms, config.motion.safe_distance_mm, config.motion.dead_zone_mm
    );
    info!("Subscribed to: {}", topics.joystick);
    info!(
        "Publishing to: {}, {}, {}, {}",
        topics.direction, topics.laser, topics.status, topics.log
    );

    loop {
        tick.tick().await;

        // 1. Drain all pending remote commands (non-blocking), latest wins
        while let Ok(Some(sample)) = subscriber.try_recv() {
            let payload = sample.payload().to_bytes();
            runtime.on_remote_payload(&payload);
        }

        // 2. Arbitrate, read range, map and drive
        let output = match runtime.step() {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to apply drive commands: {}", e);
                continue;
            }
        };

        // 3. Publish heading while moving
        if let Some(direction) = output.plan.telemetry() {
            pub_direction.put(direction.to_string()).await?;
        }

        // 4. Publish range and status
        pub_laser.put(output.laser_payload()).await?;
        let status_json = serde_json::to_string(&output.status())?;
        pub_status.put(status_json).await?;
    }
}
