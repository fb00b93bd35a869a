//! Channel registry
//!
//! Fixed-capacity tables, one per channel kind. Fields touched by both the
//! tick context and the main context are atomics with exactly one writer:
//!
//! | Field                         | Writer           |
//! |-------------------------------|------------------|
//! | `current` (pulse-width/servo) | tick scheduler   |
//! | `target` + `speed` word       | command surface  |
//! | servo attach request          | command surface  |
//! | servo attached status         | tick scheduler   |
//! | switch press timestamp        | tick scheduler   |
//! | sonar range                   | command surface  |
//!
//! Target and speed share one 16-bit word so a fade or move command lands
//! in a single store.

pub mod id;
pub mod pwm;
pub mod servo;
pub mod sonar;
pub mod switch;
pub mod table;

pub use id::{
    AnalogInputId, BuzzerId, ChannelId, ChannelKind, DigitalInputId, DigitalOutputId, PwmId,
    ServoId, SonarId, SwitchId, UnknownKind,
};
pub use pwm::PwmChannel;
pub use servo::ServoChannel;
pub use sonar::SonarChannel;
pub use switch::{SwitchChannel, RELEASED};
pub use table::{ChannelTables, TickSignal};

use crate::motion::Speed;

/// Pack a target and speed into one command word
const fn pack_command(target: u8, speed: Speed) -> u16 {
    ((speed.code() as u16) << 8) | target as u16
}

/// Split a command word into target and speed
const fn unpack_command(word: u16) -> (u8, Speed) {
    ((word & 0xFF) as u8, Speed::from_bits((word >> 8) as u8))
}
