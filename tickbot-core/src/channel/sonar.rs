//! Sonar channel state

use portable_atomic::{AtomicU16, Ordering};

use crate::config::SONAR_DEFAULT_RANGE_CM;

/// One ultrasonic range finder (HC-SR04 style)
#[derive(Debug)]
pub struct SonarChannel {
    trigger_pin: u8,
    echo_pin: u8,
    /// Readings beyond this are discarded
    range_cm: AtomicU16,
}

impl SonarChannel {
    pub(crate) const fn new(trigger_pin: u8, echo_pin: u8) -> Self {
        Self {
            trigger_pin,
            echo_pin,
            range_cm: AtomicU16::new(SONAR_DEFAULT_RANGE_CM),
        }
    }

    /// Trigger output pin
    pub fn trigger_pin(&self) -> u8 {
        self.trigger_pin
    }

    /// Echo input pin
    pub fn echo_pin(&self) -> u8 {
        self.echo_pin
    }

    /// Maximum distance reported, in centimetres
    pub fn range_cm(&self) -> u16 {
        self.range_cm.load(Ordering::Acquire)
    }

    /// Change the maximum distance; callers validate the value
    pub fn set_range_cm(&self, cm: u16) {
        self.range_cm.store(cm, Ordering::Release);
    }
}
