//! Application task
//!
//! A small demo routine over the board layout: hold the start switch to
//! sweep the arm at a speed set by the knob, with the LED fading alongside
//! and the horn sounding if the sonar sees something close.

use defmt::*;
use embassy_time::{Delay, Timer};
use tickbot_core::channel::{AnalogInputId, BuzzerId, PwmId, ServoId, SonarId, SwitchId};
use tickbot_core::config::MAX_SPEED_CODE;
use tickbot_core::Commands;
use tickbot_drivers::{Accessories, AccessoryError};
use tickbot_hal_rp2040::{AdcBank, EmbassyClock, FlexBank};

/// Accessories over the board's banks
pub type BoardAccessories = Accessories<'static, FlexBank, AdcBank, FlexBank, Delay>;

/// Channels the demo drives, resolved from the layout by name
#[derive(Debug, Clone, Copy)]
pub struct DemoChannels {
    pub start: SwitchId,
    pub arm: ServoId,
    pub led: PwmId,
    pub front: SonarId,
    pub horn: BuzzerId,
    pub knob: AnalogInputId,
}

/// Switch hold time before a press counts (ms)
const START_HOLD_MS: u32 = 50;

/// Sweep end points (degrees)
const SWEEP_LOW: u8 = 20;
const SWEEP_HIGH: u8 = 160;
const ARM_REST: u8 = 90;

/// Anything closer than this sounds the horn (cm)
const CLOSE_CM: u16 = 30;

/// Pings averaged per sonar reading
const SONAR_SCANS: u8 = 3;

/// Pause after a failed cycle before the next try (ms)
const RETRY_DELAY_MS: u64 = 500;

/// Application task - runs the demo routine forever
#[embassy_executor::task]
pub async fn app_task(
    commands: Commands<'static, EmbassyClock>,
    mut accessories: BoardAccessories,
    channels: DemoChannels,
) {
    info!("App task started");

    loop {
        if let Err(e) = run_once(&commands, &mut accessories, &channels).await {
            warn!("demo cycle failed: {}", e);
            commands.stop_servos();
            Timer::after_millis(RETRY_DELAY_MS).await;
        }
    }
}

/// One press-to-release cycle
async fn run_once(
    commands: &Commands<'static, EmbassyClock>,
    accessories: &mut BoardAccessories,
    ch: &DemoChannels,
) -> Result<(), AccessoryError> {
    commands.wait_for_switch_on(ch.start, START_HOLD_MS).await?;

    let speed = accessories.read_value(ch.knob, 1, u16::from(MAX_SPEED_CODE))? as u8;
    info!("start pressed, sweeping at speed {}", speed);

    commands.fade(ch.led, 255)?;
    commands.move_to(ch.arm, SWEEP_LOW, Some(speed))?;
    commands.wait_for_servo(ch.arm).await?;
    commands.move_to(ch.arm, SWEEP_HIGH, None)?;
    commands.wait_for_servo(ch.arm).await?;

    let cm = accessories.read_sonar(ch.front, SONAR_SCANS)?;
    debug!("sonar reads {} cm", cm);
    if cm != 0 && cm < CLOSE_CM {
        accessories.play_buzzer(ch.horn, 100, 2)?;
    }

    commands.move_to(ch.arm, ARM_REST, None)?;
    commands.rest_servo(ch.arm).await?;

    commands.fade(ch.led, 0)?;
    commands.wait_for_pwm(ch.led).await?;

    commands.wait_for_switch_off(ch.start, START_HOLD_MS).await?;
    info!("cycle done");
    Ok(())
}
