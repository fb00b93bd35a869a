//! Pass-through peripheral drivers
//!
//! These channels have no motion of their own; each call goes straight to
//! the hardware and returns:
//!
//! - Analog inputs scaled onto a caller-chosen range
//! - Buzzers sounded in blocking on/off patterns
//! - Plain digital inputs and outputs
//! - Ultrasonic sonars (trigger/echo) with averaging over several scans
//! - Servo angle to pulse-width conversion for PWM-driven actuators
//!
//! [`Accessories`] ties them to the channel tables so callers work with the
//! same typed ids the core hands out.

#![no_std]
#![deny(unsafe_code)]

pub mod accessory;
pub mod analog;
pub mod buzzer;
pub mod servo_pulse;
pub mod sonar;

pub use accessory::{Accessories, AccessoryError};
