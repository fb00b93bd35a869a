//! Servo pulse-width math
//!
//! Hobby servos read the width of a pulse repeated every 20 ms. The width
//! range differs per model; the defaults here match the common SG90 limits.

use tickbot_hal::servo::SERVO_MAX_ANGLE;

/// Length of one control frame
pub const FRAME_US: u32 = 20_000;

/// Pulse width at 0 degrees
pub const DEFAULT_MIN_PULSE_US: u16 = 544;

/// Pulse width at 180 degrees
pub const DEFAULT_MAX_PULSE_US: u16 = 2400;

/// Map an angle linearly onto `min_us..=max_us`
///
/// Angles above 180 are clamped.
pub fn angle_to_pulse_us(angle: u8, min_us: u16, max_us: u16) -> u16 {
    let angle = i32::from(angle.min(SERVO_MAX_ANGLE));
    let min = i32::from(min_us);
    let span = i32::from(max_us) - min;
    // Always between min_us and max_us
    (min + angle * span / i32::from(SERVO_MAX_ANGLE)) as u16
}
