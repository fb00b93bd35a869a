// Board wiring (Raspberry Pi Pico), shared with build.rs.
//
// PWM slices and ADC channels are bound to typed pins at boot, so a layout
// can only use the pins listed here for those kinds.

/// GPIOs driven as 8-bit duty outputs (on-board LED: slice 4, output B)
pub const PWM_PINS: &[u8] = &[25];

/// GPIOs driving servos (slice 0, output A)
pub const SERVO_PINS: &[u8] = &[16];

/// GPIOs sampled by the ADC
pub const ANALOG_PINS: &[u8] = &[26];

/// GPIOs read by the tick context (switch lines)
pub const TICK_PINS: &[u8] = &[15];

/// GPIOs timed as sonar echoes
pub const ECHO_PINS: &[u8] = &[13];

/// GPIOs driven and read by the application (buzzers, digital lines, sonar triggers)
pub const APP_PINS: &[u8] = &[10, 11, 12, 14];
