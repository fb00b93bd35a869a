//! RP2040 implementations of the tickbot HAL traits
//!
//! - [`FlexBank`]: pin-addressed digital I/O and echo timing over `Flex` pins
//! - [`PwmBank`]: 8-bit duty outputs on PWM slices
//! - [`RpServo`]: one servo on a PWM slice with 1 µs resolution
//! - [`AdcBank`]: the four ADC-capable pins, normalized to 10 bits
//! - [`EmbassyClock`]: millisecond clock from `embassy-time`
//!
//! PWM slices and ADC channels are typed by pin in embassy-rp, so the
//! firmware wires them per board; plain digital pins can be handed over by
//! number with [`take_pin!`].

#![no_std]

pub mod adc;
pub mod clock;
pub mod pins;
pub mod pwm;
pub mod servo;

pub use adc::AdcBank;
pub use clock::EmbassyClock;
pub use pins::{FlexBank, PinError};
pub use pwm::{PwmBank, PwmSide};
pub use servo::RpServo;
