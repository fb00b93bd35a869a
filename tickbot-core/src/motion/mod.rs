//! Incremental motion
//!
//! The step law both faders and servos advance by, one logic tick at a time.

pub mod step;

pub use step::{pwm_step, servo_step, Speed};
