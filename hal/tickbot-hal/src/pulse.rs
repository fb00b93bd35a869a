//! Pulse width measurement

use crate::gpio::Level;

/// Measures the width of a single pulse on an input pin
///
/// Used for ultrasonic echo timing.
pub trait PulseTimer {
    /// Wait for `pin` to go to `level`, then time how long it stays there
    ///
    /// Returns the pulse width in microseconds, or 0 if no complete pulse
    /// was seen within `timeout_us`.
    fn pulse_in(&mut self, pin: u8, level: Level, timeout_us: u32) -> u32;
}

impl<T: PulseTimer + ?Sized> PulseTimer for &mut T {
    fn pulse_in(&mut self, pin: u8, level: Level, timeout_us: u32) -> u32 {
        (**self).pulse_in(pin, level, timeout_us)
    }
}
