//! Pin-addressed digital I/O
//!
//! Board layouts name pins by GPIO number. [`FlexBank`] owns a set of pins
//! as `Flex` drivers and serves [`DigitalIo`] and [`PulseTimer`] by number;
//! pins it does not own are ignored on write and read low.

use embassy_rp::gpio::{self, AnyPin, Flex, Pull};
use embassy_rp::Peri;
use embassy_time::{Duration, Instant};
use tickbot_hal::{DigitalIo, Level, PinMode, PulseTimer};

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Macro to take a pin by number from peripherals
///
/// Usage:
/// ```ignore
/// bank.insert(15, take_pin!(p, 15))?; // Moves p.PIN_15 in as Peri<AnyPin>
/// ```
#[macro_export]
macro_rules! take_pin {
    ($p:expr, 0) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_0) };
    ($p:expr, 1) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_1) };
    ($p:expr, 2) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_2) };
    ($p:expr, 3) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_3) };
    ($p:expr, 4) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_4) };
    ($p:expr, 5) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_5) };
    ($p:expr, 6) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_6) };
    ($p:expr, 7) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_7) };
    ($p:expr, 8) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_8) };
    ($p:expr, 9) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_9) };
    ($p:expr, 10) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_10) };
    ($p:expr, 11) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_11) };
    ($p:expr, 12) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_12) };
    ($p:expr, 13) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_13) };
    ($p:expr, 14) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_14) };
    ($p:expr, 15) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_15) };
    ($p:expr, 16) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_16) };
    ($p:expr, 17) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_17) };
    ($p:expr, 18) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_18) };
    ($p:expr, 19) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_19) };
    ($p:expr, 20) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_20) };
    ($p:expr, 21) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_21) };
    ($p:expr, 22) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_22) };
    ($p:expr, 23) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_23) };
    ($p:expr, 24) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_24) };
    ($p:expr, 25) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_25) };
    ($p:expr, 26) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_26) };
    ($p:expr, 27) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_27) };
    ($p:expr, 28) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_28) };
    ($p:expr, 29) => { embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_29) };
}

/// Error when handing a pin to a bank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already in the bank
    AlreadyTaken,
}

/// Bank of GPIOs addressed by number
pub struct FlexBank {
    pins: [Option<Flex<'static>>; GPIO_COUNT],
}

impl Default for FlexBank {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexBank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self {
            pins: core::array::from_fn(|_| None),
        }
    }

    /// Add a pin; it starts as a floating input
    pub fn insert(&mut self, pin_num: u8, pin: Peri<'static, AnyPin>) -> Result<(), PinError> {
        let slot = self
            .pins
            .get_mut(pin_num as usize)
            .ok_or(PinError::InvalidPin)?;
        if slot.is_some() {
            return Err(PinError::AlreadyTaken);
        }

        let mut flex = Flex::new(pin);
        flex.set_as_input();
        *slot = Some(flex);
        Ok(())
    }

    /// Check if the bank owns a pin
    pub fn owns(&self, pin_num: u8) -> bool {
        self.get(pin_num).is_some()
    }

    fn get(&self, pin_num: u8) -> Option<&Flex<'static>> {
        self.pins.get(pin_num as usize)?.as_ref()
    }

    fn get_mut(&mut self, pin_num: u8) -> Option<&mut Flex<'static>> {
        self.pins.get_mut(pin_num as usize)?.as_mut()
    }
}

impl DigitalIo for FlexBank {
    fn configure(&mut self, pin: u8, mode: PinMode) {
        let Some(flex) = self.get_mut(pin) else {
            return;
        };
        match mode {
            PinMode::Input => {
                flex.set_pull(Pull::None);
                flex.set_as_input();
            }
            PinMode::InputPullUp => {
                flex.set_pull(Pull::Up);
                flex.set_as_input();
            }
            PinMode::Output => flex.set_as_output(),
        }
    }

    fn write(&mut self, pin: u8, level: Level) {
        if let Some(flex) = self.get_mut(pin) {
            flex.set_level(if level.is_high() {
                gpio::Level::High
            } else {
                gpio::Level::Low
            });
        }
    }

    fn read(&self, pin: u8) -> Level {
        self.get(pin)
            .map_or(Level::Low, |flex| Level::from(flex.is_high()))
    }
}

impl PulseTimer for FlexBank {
    /// Busy-waits; the whole call is bounded by `timeout_us`
    fn pulse_in(&mut self, pin: u8, level: Level, timeout_us: u32) -> u32 {
        let Some(flex) = self.get(pin) else {
            return 0;
        };
        let active = level.is_high();
        let deadline = Instant::now() + Duration::from_micros(u64::from(timeout_us));

        // Let a pulse already in progress pass, then catch the next edge
        while flex.is_high() == active {
            if Instant::now() >= deadline {
                return 0;
            }
        }
        while flex.is_high() != active {
            if Instant::now() >= deadline {
                return 0;
            }
        }

        let start = Instant::now();
        while flex.is_high() == active {
            if Instant::now() >= deadline {
                return 0;
            }
        }
        (Instant::now() - start).as_micros() as u32
    }
}
