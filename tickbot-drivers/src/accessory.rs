//! Accessory access by channel id
//!
//! [`Accessories`] owns the hardware the pass-through channels need and
//! resolves typed ids through the shared channel tables. It runs in the
//! application context; the tick scheduler never touches these pins.

use core::fmt;

use embedded_hal::delay::DelayNs;
use tickbot_core::channel::{AnalogInputId, BuzzerId, ChannelTables, DigitalInputId, DigitalOutputId, SonarId};
use tickbot_core::ControlError;
use tickbot_hal::{AnalogInput, DigitalIo, PulseTimer};

use crate::{analog, buzzer, sonar};

/// Errors from accessory calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccessoryError {
    /// Channel lookup failed
    Control(ControlError),
    /// Sonar range outside 1-500 cm
    InvalidRange,
}

impl From<ControlError> for AccessoryError {
    fn from(err: ControlError) -> Self {
        AccessoryError::Control(err)
    }
}

impl fmt::Display for AccessoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessoryError::Control(err) => write!(f, "{}", err),
            AccessoryError::InvalidRange => f.write_str("sonar range must be 1-500 cm"),
        }
    }
}

/// Pass-through peripherals bound to the channel tables
///
/// - `IO` drives buzzers, digital lines and sonar triggers
/// - `A` samples analog inputs
/// - `P` times sonar echoes
/// - `D` provides blocking delays
pub struct Accessories<'a, IO, A, P, D> {
    tables: &'a ChannelTables,
    io: IO,
    adc: A,
    pulse: P,
    delay: D,
}

impl<'a, IO, A, P, D> Accessories<'a, IO, A, P, D>
where
    IO: DigitalIo,
    A: AnalogInput,
    P: PulseTimer,
    D: DelayNs,
{
    /// Create the accessory set
    pub fn new(tables: &'a ChannelTables, io: IO, adc: A, pulse: P, delay: D) -> Self {
        Self {
            tables,
            io,
            adc,
            pulse,
            delay,
        }
    }

    /// Sample an analog input on the 0-1023 scale
    pub fn read_raw(&mut self, id: AnalogInputId) -> Result<u16, AccessoryError> {
        let pin = self.tables.analog_input_pin(id)?;
        Ok(self.adc.read_raw(pin))
    }

    /// Sample an analog input scaled onto `from..=to`
    pub fn read_value(&mut self, id: AnalogInputId, from: u16, to: u16) -> Result<u16, AccessoryError> {
        let raw = self.read_raw(id)?;
        Ok(analog::scale_reading(raw, from, to))
    }

    /// Sound a buzzer `times` times; blocks until the pattern ends
    pub fn play_buzzer(&mut self, id: BuzzerId, duration_ms: u32, times: u8) -> Result<(), AccessoryError> {
        let pin = self.tables.buzzer_pin(id)?;
        buzzer::beep(&mut self.io, &mut self.delay, pin, duration_ms, times);
        Ok(())
    }

    /// Check if a digital input reads high
    pub fn is_on(&self, id: DigitalInputId) -> Result<bool, AccessoryError> {
        let pin = self.tables.digital_input_pin(id)?;
        Ok(self.io.is_high(pin))
    }

    /// Check if a digital input reads low
    pub fn is_off(&self, id: DigitalInputId) -> Result<bool, AccessoryError> {
        Ok(!self.is_on(id)?)
    }

    /// Drive a digital output high
    pub fn turn_on(&mut self, id: DigitalOutputId) -> Result<(), AccessoryError> {
        let pin = self.tables.digital_output_pin(id)?;
        self.io.set_high(pin);
        Ok(())
    }

    /// Drive a digital output low
    pub fn turn_off(&mut self, id: DigitalOutputId) -> Result<(), AccessoryError> {
        let pin = self.tables.digital_output_pin(id)?;
        self.io.set_low(pin);
        Ok(())
    }

    /// Average distance over `scans` pings, or 0 if nothing is in range
    pub fn read_sonar(&mut self, id: SonarId, scans: u8) -> Result<u16, AccessoryError> {
        let channel = self.tables.sonar(id)?;
        Ok(sonar::measure(
            &mut self.io,
            &mut self.pulse,
            &mut self.delay,
            channel.trigger_pin(),
            channel.echo_pin(),
            channel.range_cm(),
            scans,
        ))
    }

    /// Change how far a sonar looks (1-500 cm)
    pub fn set_sonar_range(&self, id: SonarId, cm: u16) -> Result<(), AccessoryError> {
        let channel = self.tables.sonar(id)?;
        if !sonar::range_is_valid(cm) {
            return Err(AccessoryError::InvalidRange);
        }
        channel.set_range_cm(cm);
        Ok(())
    }

    /// Check if a sonar sees anything within its range
    pub fn sonar_sees_something(&mut self, id: SonarId, scans: u8) -> Result<bool, AccessoryError> {
        Ok(self.read_sonar(id, scans)? != 0)
    }

    /// Get the digital I/O
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Get the digital I/O mutably
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickbot_hal::{Level, PinMode};

    struct Pins {
        levels: [Level; 32],
    }

    impl Pins {
        fn new() -> Self {
            Self {
                levels: [Level::Low; 32],
            }
        }
    }

    impl DigitalIo for Pins {
        fn configure(&mut self, _pin: u8, _mode: PinMode) {}

        fn write(&mut self, pin: u8, level: Level) {
            self.levels[pin as usize] = level;
        }

        fn read(&self, pin: u8) -> Level {
            self.levels[pin as usize]
        }
    }

    /// Every pin reads `self.0`
    struct FixedAdc(u16);

    impl AnalogInput for FixedAdc {
        fn read_raw(&mut self, _pin: u8) -> u16 {
            self.0
        }
    }

    /// Every echo is `self.0` µs wide
    struct FixedEcho(u32);

    impl PulseTimer for FixedEcho {
        fn pulse_in(&mut self, _pin: u8, _level: Level, timeout_us: u32) -> u32 {
            if self.0 > timeout_us {
                0
            } else {
                self.0
            }
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_analog_read_uses_registered_pin() {
        let mut tables = ChannelTables::new();
        let knob = tables.add_analog_input(26).unwrap();
        let mut acc = Accessories::new(&tables, Pins::new(), FixedAdc(1023), FixedEcho(0), NoDelay);

        assert_eq!(acc.read_raw(knob), Ok(1023));
        assert_eq!(acc.read_value(knob, 0, 180), Ok(180));
        assert_eq!(acc.read_value(knob, 100, 0), Ok(0));
    }

    #[test]
    fn test_digital_lines() {
        let mut tables = ChannelTables::new();
        let mut pins = Pins::new();
        let button = tables.add_digital_input(2, &mut pins).unwrap();
        let lamp = tables.add_digital_output(6, &mut pins).unwrap();
        let mut acc = Accessories::new(&tables, pins, FixedAdc(0), FixedEcho(0), NoDelay);

        assert_eq!(acc.is_on(button), Ok(false));
        assert_eq!(acc.is_off(button), Ok(true));
        acc.io_mut().write(2, Level::High);
        assert_eq!(acc.is_on(button), Ok(true));

        acc.turn_on(lamp).unwrap();
        assert!(acc.io().is_high(6));
        acc.turn_off(lamp).unwrap();
        assert!(acc.io().is_low(6));
    }

    #[test]
    fn test_buzzer_ends_silent() {
        let mut tables = ChannelTables::new();
        let mut pins = Pins::new();
        let horn = tables.add_buzzer(12, &mut pins).unwrap();
        let mut acc = Accessories::new(&tables, pins, FixedAdc(0), FixedEcho(0), NoDelay);

        acc.play_buzzer(horn, 50, 3).unwrap();
        assert!(acc.io().is_low(12));
    }

    #[test]
    fn test_sonar_range_limits_readings() {
        let mut tables = ChannelTables::new();
        let mut pins = Pins::new();
        let front = tables.add_sonar(14, 13, &mut pins).unwrap();
        // About 150 cm
        let mut acc = Accessories::new(&tables, pins, FixedAdc(0), FixedEcho(8824), NoDelay);

        assert_eq!(acc.read_sonar(front, 3), Ok(0));
        assert_eq!(acc.sonar_sees_something(front, 3), Ok(false));

        acc.set_sonar_range(front, 200).unwrap();
        assert_eq!(acc.read_sonar(front, 3), Ok(150));
        assert_eq!(acc.sonar_sees_something(front, 1), Ok(true));
        assert!(acc.io().is_low(14));
    }

    #[test]
    fn test_sonar_range_validation() {
        let mut tables = ChannelTables::new();
        let front = tables.add_sonar(14, 13, &mut Pins::new()).unwrap();
        let acc = Accessories::new(&tables, Pins::new(), FixedAdc(0), FixedEcho(0), NoDelay);

        assert_eq!(acc.set_sonar_range(front, 0), Err(AccessoryError::InvalidRange));
        assert_eq!(acc.set_sonar_range(front, 501), Err(AccessoryError::InvalidRange));
        assert_eq!(tables.sonar(front).unwrap().range_cm(), 100);
    }

    #[test]
    fn test_unknown_ids() {
        let mut tables = ChannelTables::new();
        let mut pins = Pins::new();
        let horn = tables.add_buzzer(12, &mut pins).unwrap();
        let empty = ChannelTables::new();
        let mut acc = Accessories::new(&empty, pins, FixedAdc(0), FixedEcho(0), NoDelay);

        assert_eq!(
            acc.play_buzzer(horn, 10, 1),
            Err(AccessoryError::Control(ControlError::InvalidChannel))
        );
    }
}
