//! Analog input scaling

use tickbot_hal::adc::ADC_FULL_SCALE;

/// Map a raw reading linearly onto `from..=to`
///
/// `to` may be below `from` to invert the scale. Readings above full scale
/// are clamped. Integer division truncates toward `from`.
pub fn scale_reading(raw: u16, from: u16, to: u16) -> u16 {
    let raw = i32::from(raw.min(ADC_FULL_SCALE));
    let from = i32::from(from);
    let span = i32::from(to) - from;
    let scaled = from + raw * span / i32::from(ADC_FULL_SCALE);
    // Always between `from` and `to`
    scaled as u16
}
