//! Pulse-width output abstractions
//!
//! An 8-bit duty cycle per pin, the classic "analog write". Outputs must
//! start at duty 0 so a freshly registered channel matches its table entry.

/// Pulse-width outputs addressed by pin number
pub trait PwmOutput {
    /// Set the duty cycle of a pin (0 = off, 255 = fully on)
    fn set_duty(&mut self, pin: u8, duty: u8);
}

impl<T: PwmOutput + ?Sized> PwmOutput for &mut T {
    fn set_duty(&mut self, pin: u8, duty: u8) {
        (**self).set_duty(pin, duty);
    }
}
