//! Ultrasonic ranging
//!
//! Trigger/echo sensors of the HC-SR04 family: a short high pulse on the
//! trigger starts a ping, and the echo line stays high for the round trip.
//! Sound covers about 0.034 cm/µs, so one centimetre of range is 1/0.017 µs
//! of echo.

use embedded_hal::delay::DelayNs;
use tickbot_core::config::SONAR_MAX_RANGE_CM;
use tickbot_hal::{DigitalIo, Level, PulseTimer};

/// Width of the trigger pulse
pub const TRIGGER_PULSE_US: u32 = 3;

/// Quiet time after each echo before the next ping
pub const SCAN_GAP_US: u32 = 3;

/// Longest echo worth waiting for at a given range
pub fn echo_timeout_us(max_cm: u16) -> u32 {
    u32::from(max_cm) * 1000 / 12
}

/// Convert an echo width to centimetres
pub fn echo_to_cm(echo_us: u32) -> u32 {
    echo_us.saturating_mul(17) / 1000
}

/// Check a range setting
pub fn range_is_valid(cm: u16) -> bool {
    (1..=SONAR_MAX_RANGE_CM).contains(&cm)
}

/// Running average over the in-range readings of a burst
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanAverage {
    sum: u32,
    valid: u32,
}

impl ScanAverage {
    /// Add a reading; zero or out-of-range readings are dropped
    pub fn add(&mut self, cm: u32, max_cm: u16) {
        if cm > 0 && cm <= u32::from(max_cm) {
            self.sum += cm;
            self.valid += 1;
        }
    }

    /// Number of readings kept
    pub fn valid(&self) -> u32 {
        self.valid
    }

    /// Average of the kept readings, or 0 when there are none
    pub fn distance_cm(&self) -> u16 {
        match self.sum.checked_div(self.valid) {
            // Bounded by max_cm
            Some(avg) => avg as u16,
            None => 0,
        }
    }
}

/// Fire `scans` pings and average the valid distances
pub fn measure<IO, P, D>(
    io: &mut IO,
    timer: &mut P,
    delay: &mut D,
    trigger_pin: u8,
    echo_pin: u8,
    max_cm: u16,
    scans: u8,
) -> u16
where
    IO: DigitalIo,
    P: PulseTimer,
    D: DelayNs,
{
    let timeout_us = echo_timeout_us(max_cm);
    let mut average = ScanAverage::default();

    for _ in 0..scans {
        io.set_high(trigger_pin);
        delay.delay_us(TRIGGER_PULSE_US);
        io.set_low(trigger_pin);

        let echo_us = timer.pulse_in(echo_pin, Level::High, timeout_us);
        delay.delay_us(SCAN_GAP_US);
        average.add(echo_to_cm(echo_us), max_cm);
    }

    average.distance_cm()
}
