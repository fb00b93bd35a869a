//! Hardware tick task
//!
//! Drives the tick scheduler every [`HARDWARE_TICK_US`]. Every
//! `LOGIC_TICK_DIVISOR`-th call steps the servos, latches the switches,
//! steps the pulse-width outputs and raises the tick signal.

use defmt::*;
use embassy_time::{Duration, Ticker};
use tickbot_core::config::HARDWARE_TICK_US;
use tickbot_core::TickScheduler;
use tickbot_hal_rp2040::{EmbassyClock, FlexBank, PwmBank, RpServo};

/// Scheduler over the board's banks
pub type BoardScheduler = TickScheduler<'static, FlexBank, PwmBank, RpServo, EmbassyClock>;

/// Logic ticks between heartbeat traces (about 10 s)
const TRACE_EVERY: u32 = 1000;

/// Tick task - owns the scheduler and the hardware it drives
#[embassy_executor::task]
pub async fn tick_task(mut scheduler: BoardScheduler) {
    info!("Tick task started ({} us hardware tick)", HARDWARE_TICK_US);

    let mut ticker = Ticker::every(Duration::from_micros(HARDWARE_TICK_US as u64));

    loop {
        ticker.next().await;

        if scheduler.on_hardware_tick() && scheduler.logic_ticks() % TRACE_EVERY == 0 {
            trace!("logic tick {}", scheduler.logic_ticks());
        }
    }
}
