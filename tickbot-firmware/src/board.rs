//! Board bring-up (Raspberry Pi Pico)
//!
//! Binds the typed RP2040 peripherals to the pin-addressed banks the rest of
//! the firmware uses. The pins taken here must match `wiring.rs`, which
//! build.rs checks board.toml against.

use defmt::*;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::Pull;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::Peripherals;
use heapless::Vec;
use tickbot_core::config::SERVOS_MAX;
use tickbot_drivers::servo_pulse::{DEFAULT_MAX_PULSE_US, DEFAULT_MIN_PULSE_US};
use tickbot_hal_rp2040::{take_pin, AdcBank, FlexBank, PinError, PwmBank, PwmSide, RpServo};

use crate::wiring::{ANALOG_PINS, APP_PINS, ECHO_PINS, PWM_PINS, SERVO_PINS, TICK_PINS};

/// Hardware handed out at boot
pub struct Board {
    /// Switch lines, owned by the tick context
    pub tick_pins: FlexBank,
    /// Buzzers, digital lines and sonar triggers
    pub app_pins: FlexBank,
    /// Sonar echo inputs
    pub echo_pins: FlexBank,
    /// Duty-cycle outputs
    pub pwm: PwmBank,
    /// Servo actuators, not yet ordered by channel id
    pub servos: Vec<RpServo, SERVOS_MAX>,
    /// Analog inputs
    pub adc: AdcBank,
}

/// Take every wired peripheral
pub fn init(p: Peripherals) -> Result<Board, PinError> {
    let mut tick_pins = FlexBank::new();
    tick_pins.insert(15, take_pin!(p, 15))?;

    let mut app_pins = FlexBank::new();
    app_pins.insert(10, take_pin!(p, 10))?;
    app_pins.insert(11, take_pin!(p, 11))?;
    app_pins.insert(12, take_pin!(p, 12))?;
    app_pins.insert(14, take_pin!(p, 14))?;

    let mut echo_pins = FlexBank::new();
    echo_pins.insert(13, take_pin!(p, 13))?;

    let mut pwm = PwmBank::new();
    let led = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_25, pwm::Config::default());
    if let Err(e) = pwm.add(25, led, PwmSide::B) {
        warn!("GPIO25 duty output not added: {:?}", e);
    }

    let mut servos = Vec::new();
    let arm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm::Config::default());
    let arm = RpServo::new(16, arm, PwmSide::A, DEFAULT_MIN_PULSE_US, DEFAULT_MAX_PULSE_US);
    if servos.push(arm).is_err() {
        warn!("no room for the GPIO16 servo");
    }

    let mut adc = AdcBank::new(Adc::new_blocking(p.ADC, adc::Config::default()));
    if !adc.add(26, Channel::new_pin(p.PIN_26, Pull::None)) {
        warn!("no room for the GPIO26 ADC channel");
    }

    check_wiring("tick", TICK_PINS, |pin| tick_pins.owns(pin));
    check_wiring("app", APP_PINS, |pin| app_pins.owns(pin));
    check_wiring("echo", ECHO_PINS, |pin| echo_pins.owns(pin));
    check_wiring("pwm", PWM_PINS, |pin| pwm.owns(pin));
    check_wiring("servo", SERVO_PINS, |pin| servos.iter().any(|s| s.pin() == pin));
    check_wiring("analog", ANALOG_PINS, |pin| adc.owns(pin));

    Ok(Board {
        tick_pins,
        app_pins,
        echo_pins,
        pwm,
        servos,
        adc,
    })
}

/// Warn about wired pins the bring-up code did not take
fn check_wiring(bank: &str, wired: &[u8], owns: impl Fn(u8) -> bool) {
    for &pin in wired {
        if !owns(pin) {
            warn!("{} bank is missing GPIO{}", bank, pin);
        }
    }
}

/// Reorder actuators to match the registered servo channels
///
/// The tick scheduler pairs actuator `i` with servo channel `i`. Actuators
/// left over (wired but not in the layout) are dropped.
pub fn order_servos(
    mut servos: Vec<RpServo, SERVOS_MAX>,
    channel_pins: impl Iterator<Item = u8>,
) -> Vec<RpServo, SERVOS_MAX> {
    let mut ordered = Vec::new();
    for pin in channel_pins {
        match servos.iter().position(|s| s.pin() == pin) {
            Some(index) => {
                // Capacity matches `servos`, so this cannot fail
                let _ = ordered.push(servos.swap_remove(index));
            }
            None => warn!("servo channel on GPIO{} has no actuator", pin),
        }
    }
    for spare in &servos {
        debug!("servo on GPIO{} is not in the layout", spare.pin());
    }
    ordered
}
