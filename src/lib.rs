// Drive runtime for a small differential-drive rover
//
// Remote joystick (zenoh) and local Nunchuck input are arbitrated each cycle, combined with
// the forward range reading, and mapped onto left/right motor shield commands.

pub mod arbiter;
pub mod bus;
pub mod config;
pub mod intent;
pub mod messages;
pub mod motion;
pub mod motor;
pub mod remote;
pub mod runtime;
pub mod sensors;
