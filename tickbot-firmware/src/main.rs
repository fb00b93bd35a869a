//! tickbot - Interrupt-driven actuator controller firmware
//!
//! Main firmware binary for RP2040-based robots. The channel layout comes
//! from board.toml, embedded at compile time; a high-priority executor runs
//! the tick scheduler while the application task issues commands.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tickbot_core::channel::ChannelId;
use tickbot_core::config::{parse_layout, BoardLayout, MAX_LAYOUT_CHANNELS, MAX_NAME_LEN};
use tickbot_core::{ChannelKind, ChannelTables, Commands, TickScheduler};
use tickbot_drivers::Accessories;
use tickbot_hal_rp2040::EmbassyClock;

use crate::tasks::DemoChannels;

mod board;
mod tasks;
mod wiring;

/// Embedded channel layout (compiled into firmware)
/// Edit board.toml and rebuild to customize
const BOARD_LAYOUT: &str = include_str!("../board.toml");

/// Channel tables shared by the tick and application contexts
static TABLES: StaticCell<ChannelTables> = StaticCell::new();

/// Executor for the tick task, preempting the thread executor
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    unsafe { EXECUTOR_HIGH.on_interrupt() }
}

/// Registered channel names, in layout order
type ChannelNames = Vec<(heapless::String<MAX_NAME_LEN>, ChannelId), MAX_LAYOUT_CHANNELS>;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("tickbot firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    let board = match board::init(p) {
        Ok(board) => board,
        Err(e) => {
            error!("Board bring-up failed: {:?}", e);
            park().await
        }
    };
    info!("Peripherals initialized");

    let layout = match parse_layout(BOARD_LAYOUT) {
        Ok(layout) => layout,
        Err(e) => {
            // build.rs validates board.toml, so this only trips on parser drift
            error!("Failed to parse embedded layout: {:?}", e);
            park().await
        }
    };

    let mut tick_pins = board.tick_pins;
    let mut app_pins = board.app_pins;

    // Register channels; switches belong to the tick context, everything
    // else that needs a digital pin to the application
    let tables = TABLES.init(ChannelTables::new());
    let mut names = ChannelNames::new();
    for spec in &layout.channels {
        let registered = match spec.kind {
            ChannelKind::Switch => tables.register_spec(spec, &mut tick_pins),
            _ => tables.register_spec(spec, &mut app_pins),
        };
        match registered {
            Ok(id) => {
                info!("{} '{}' on GPIO{}", spec.kind.as_str(), spec.name, spec.pin);
                let _ = names.push((spec.name.clone(), id));
            }
            Err(e) => warn!("{} '{}' not registered: {}", spec.kind.as_str(), spec.name, e),
        }
    }
    let tables: &'static ChannelTables = tables;

    let servos = board::order_servos(board.servos, tables.servos().iter().map(|s| s.pin()));
    let scheduler = match TickScheduler::new(tables, tick_pins, board.pwm, servos, EmbassyClock) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            error!("Tick scheduler not created: {}", e);
            park().await
        }
    };

    // Tick task on the interrupt executor
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    unwrap!(high_spawner.spawn(tasks::tick_task(scheduler)));

    let Some(channels) = resolve_demo(&layout, &names) else {
        warn!("Layout lacks a demo channel, application idle");
        park().await
    };

    let commands = Commands::new(tables, EmbassyClock);
    let accessories = Accessories::new(
        tables,
        app_pins,
        board.adc,
        board.echo_pins,
        embassy_time::Delay,
    );
    unwrap!(spawner.spawn(tasks::app_task(commands, accessories, channels)));

    info!("All tasks spawned, firmware running");

    // All work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Look up the demo's channels by name
fn resolve_demo(layout: &BoardLayout, names: &ChannelNames) -> Option<DemoChannels> {
    let id = |name: &str| {
        let found = names
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, id)| *id);
        if found.is_none() && layout.find(name).is_none() {
            warn!("no channel named '{}' in board.toml", name);
        }
        found
    };

    Some(DemoChannels {
        start: id("start")?.as_switch()?,
        arm: id("arm")?.as_servo()?,
        led: id("led")?.as_pwm()?,
        front: id("front")?.as_sonar()?,
        horn: id("horn")?.as_buzzer()?,
        knob: id("knob")?.as_analog_input()?,
    })
}

/// Idle forever after a fatal setup error
async fn park() -> ! {
    loop {
        embassy_time::Timer::after_secs(60).await;
    }
}
