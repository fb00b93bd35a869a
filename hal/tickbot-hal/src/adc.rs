//! Analog input abstractions

/// Full-scale reading of the normalized analog range (10-bit)
pub const ADC_FULL_SCALE: u16 = 1023;

/// Analog-to-digital inputs addressed by pin number
///
/// Implementations normalize their converter to a 10-bit range so callers
/// see the same scale on every chip.
pub trait AnalogInput {
    /// Take one sample, scaled to `0..=ADC_FULL_SCALE`
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_raw(&mut self, pin: u8) -> u16;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read_raw(&mut self, pin: u8) -> u16 {
        (**self).read_raw(pin)
    }
}
