//! ADC channel management
//!
//! The RP2040 converter is 12-bit; readings are shifted down to the 10-bit
//! scale the rest of the firmware uses.

use embassy_rp::adc::{Adc, Blocking, Channel};
use heapless::Vec;
use tickbot_hal::AnalogInput;

/// GPIOs with an ADC input
pub const ADC_PINS: [u8; 4] = [26, 27, 28, 29];

/// Analog inputs addressed by GPIO number
pub struct AdcBank {
    adc: Adc<'static, Blocking>,
    channels: Vec<(u8, Channel<'static>), 4>,
}

impl AdcBank {
    /// Wrap a blocking converter with no channels yet
    pub fn new(adc: Adc<'static, Blocking>) -> Self {
        Self {
            adc,
            channels: Vec::new(),
        }
    }

    /// Add the channel for `pin`; returns `false` if the bank is full
    pub fn add(&mut self, pin: u8, channel: Channel<'static>) -> bool {
        self.channels.push((pin, channel)).is_ok()
    }

    /// Check if the bank samples a pin
    pub fn owns(&self, pin: u8) -> bool {
        self.channels.iter().any(|(p, _)| *p == pin)
    }
}

impl AnalogInput for AdcBank {
    fn read_raw(&mut self, pin: u8) -> u16 {
        let Some((_, channel)) = self.channels.iter_mut().find(|(p, _)| *p == pin) else {
            return 0;
        };
        match self.adc.blocking_read(channel) {
            Ok(raw) => raw >> 2,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("ADC read failed on GPIO{}", pin);
                0
            }
        }
    }
}
