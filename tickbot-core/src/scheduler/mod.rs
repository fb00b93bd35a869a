//! Tick scheduler
//!
//! Drives every channel's motion from a periodic hardware tick.

pub mod tick;

pub use tick::TickScheduler;
