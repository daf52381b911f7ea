// Input devices polled once per control cycle: the forward range sensor and the
// local handheld controller.

pub mod laser;
pub mod nunchuck;

pub use laser::{DistanceSensor, FixedDistance, TofSensor};
pub use nunchuck::{CenteredController, LocalController, Nunchuck, NunchuckSample};
