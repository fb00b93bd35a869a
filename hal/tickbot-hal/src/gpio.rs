//! GPIO pin abstractions
//!
//! Provides a pin-number addressed digital I/O trait that can be implemented
//! by chip-specific HALs.

/// Logic level of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    #[default]
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Check if this is the high level
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// Check if this is the low level
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Self::Output {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Direction and bias of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Floating input
    Input,
    /// Input with the internal pull-up enabled
    InputPullUp,
    /// Push-pull output
    Output,
}

/// Digital I/O addressed by pin number
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip. Pins the implementation does not own should be
/// ignored on write and read as [`Level::Low`].
pub trait DigitalIo {
    /// Configure the direction (and bias) of a pin
    fn configure(&mut self, pin: u8, mode: PinMode);

    /// Drive an output pin to a level
    fn write(&mut self, pin: u8, level: Level);

    /// Sample the level of a pin
    fn read(&self, pin: u8) -> Level;

    /// Drive an output pin high
    fn set_high(&mut self, pin: u8) {
        self.write(pin, Level::High);
    }

    /// Drive an output pin low
    fn set_low(&mut self, pin: u8) {
        self.write(pin, Level::Low);
    }

    /// Check if a pin reads high
    fn is_high(&self, pin: u8) -> bool {
        self.read(pin).is_high()
    }

    /// Check if a pin reads low
    fn is_low(&self, pin: u8) -> bool {
        self.read(pin).is_low()
    }
}

impl<T: DigitalIo + ?Sized> DigitalIo for &mut T {
    fn configure(&mut self, pin: u8, mode: PinMode) {
        (**self).configure(pin, mode);
    }

    fn write(&mut self, pin: u8, level: Level) {
        (**self).write(pin, level);
    }

    fn read(&self, pin: u8) -> Level {
        (**self).read(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert_eq!(!Level::High, Level::Low);
    }

    struct OnePin {
        level: Level,
        mode: Option<PinMode>,
    }

    impl DigitalIo for OnePin {
        fn configure(&mut self, _pin: u8, mode: PinMode) {
            self.mode = Some(mode);
        }

        fn write(&mut self, _pin: u8, level: Level) {
            self.level = level;
        }

        fn read(&self, _pin: u8) -> Level {
            self.level
        }
    }

    #[test]
    fn test_default_helpers() {
        let mut pin = OnePin {
            level: Level::Low,
            mode: None,
        };
        pin.configure(3, PinMode::Output);
        pin.set_high(3);
        assert!(pin.is_high(3));
        pin.set_low(3);
        assert!(pin.is_low(3));
        assert_eq!(pin.mode, Some(PinMode::Output));
    }
}
