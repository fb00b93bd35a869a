//! Duty-cycle outputs on PWM slices

use embassy_rp::pwm::{Config, Pwm};
use heapless::Vec;
use tickbot_hal::PwmOutput;

/// Largest number of outputs one bank drives (two per slice)
pub const MAX_PWM_OUTPUTS: usize = 16;

/// Counter wrap for 8-bit duty; a compare of 255 holds the output high
const DUTY_TOP: u16 = 254;

/// Integer clock divider, about 30 kHz at 125 MHz
const DUTY_DIVIDER: u8 = 16;

/// Which output of a slice a pin is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmSide {
    A,
    B,
}

struct DutyOutput {
    pin: u8,
    pwm: Pwm<'static>,
    config: Config,
    side: PwmSide,
}

/// Error when adding an output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmBankError {
    /// Bank is full
    Full,
    /// Pin already has an output
    Duplicate,
}

/// Pulse-width outputs addressed by GPIO number
#[derive(Default)]
pub struct PwmBank {
    outputs: Vec<DutyOutput, MAX_PWM_OUTPUTS>,
}

impl PwmBank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slice output wired to `pin`, starting at duty 0
    ///
    /// `pwm` comes from `Pwm::new_output_a` or `Pwm::new_output_b` on the
    /// slice that owns the pin.
    pub fn add(&mut self, pin: u8, mut pwm: Pwm<'static>, side: PwmSide) -> Result<(), PwmBankError> {
        if self.owns(pin) {
            return Err(PwmBankError::Duplicate);
        }
        if self.outputs.is_full() {
            return Err(PwmBankError::Full);
        }

        let mut config = Config::default();
        config.top = DUTY_TOP;
        config.divider = DUTY_DIVIDER.into();
        config.compare_a = 0;
        config.compare_b = 0;
        config.enable = true;
        pwm.set_config(&config);

        self.outputs
            .push(DutyOutput {
                pin,
                pwm,
                config,
                side,
            })
            .map_err(|_| PwmBankError::Full)
    }

    /// Check if the bank drives a pin
    pub fn owns(&self, pin: u8) -> bool {
        self.outputs.iter().any(|o| o.pin == pin)
    }
}

impl PwmOutput for PwmBank {
    fn set_duty(&mut self, pin: u8, duty: u8) {
        let Some(output) = self.outputs.iter_mut().find(|o| o.pin == pin) else {
            return;
        };
        match output.side {
            PwmSide::A => output.config.compare_a = u16::from(duty),
            PwmSide::B => output.config.compare_b = u16::from(duty),
        }
        output.pwm.set_config(&output.config);
    }
}
