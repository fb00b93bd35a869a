//! Embassy async tasks
//!
//! The tick task runs on the high-priority interrupt executor; the
//! application task runs on the thread executor and only talks to it
//! through the channel tables.

pub mod app;
pub mod tick;

pub use app::{app_task, DemoChannels};
pub use tick::{tick_task, BoardScheduler};
