//! Tickbot Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the tick scheduler and
//! the pass-through peripherals are written against. Chip-specific crates
//! (RP2040 today) implement them; host tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tickbot-firmware, etc.)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tickbot-core / tickbot-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tickbot-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌────────────────┐
//!            │ tickbot-hal-   │
//!            │    rp2040      │
//!            └────────────────┘
//! ```
//!
//! Pins are addressed by number, the way a board layout names them. A
//! channel remembers its pin and hands it back to the HAL on every access.
//!
//! # Traits
//!
//! - [`gpio::DigitalIo`] - Pin direction, digital reads and writes
//! - [`pwm::PwmOutput`] - 8-bit pulse-width (analog) outputs
//! - [`adc::AnalogInput`] - Analog-to-digital samples
//! - [`servo::ServoActuator`] - Hobby servo attach/detach/write
//! - [`clock::Clock`] - Monotonic millisecond clock
//! - [`pulse::PulseTimer`] - Pulse width measurement (sonar echo)

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod clock;
pub mod gpio;
pub mod pulse;
pub mod pwm;
pub mod servo;

// Re-export key traits at crate root for convenience
pub use adc::AnalogInput;
pub use clock::Clock;
pub use gpio::{DigitalIo, Level, PinMode};
pub use pulse::PulseTimer;
pub use pwm::PwmOutput;
pub use servo::ServoActuator;
