//! Millisecond clock on the embassy time driver

use embassy_time::Instant;
use tickbot_hal::Clock;

/// Milliseconds since boot, wrapping after about 49 days
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
