//! Board-agnostic core logic for the tickbot controller
//!
//! This crate contains all logic that does not depend on a specific board:
//!
//! - Channel registry with lock-free per-channel state
//! - Step law for pulse-width outputs and servos
//! - Tick scheduler that advances channels from a periodic timer
//! - Command surface used by the application, including async waits
//! - Configuration constants and the board layout parser
//!
//! ```text
//!   app task                       tick task (high priority)
//!      │                                  │
//!      ▼                                  ▼
//! ┌──────────┐  target/speed  ┌───────────────────┐
//! │ Commands │ ─────────────▶ │  ChannelTables    │ ◀── TickScheduler
//! └──────────┘ ◀───────────── └───────────────────┘      │
//!      ▲        current/latch                             │
//!      └──────────── tick signal ◀────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod channel;
pub mod command;
pub mod config;
pub mod error;
pub mod motion;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::{ChannelId, ChannelKind, ChannelTables};
pub use command::Commands;
pub use error::ControlError;
pub use motion::Speed;
pub use scheduler::TickScheduler;
