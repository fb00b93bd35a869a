//! Configuration
//!
//! Compile-time limits and defaults for the channel tables and the tick
//! scheduler, plus the board layout that names which pin drives which
//! channel.

pub mod layout;

pub use layout::{parse_layout, BoardLayout, ChannelSpec, LayoutError, MAX_LAYOUT_CHANNELS, MAX_NAME_LEN};

/// Maximum pulse-width (analog output) channels
pub const PWMS_MAX: usize = 12;

/// Maximum servo channels
pub const SERVOS_MAX: usize = 12;

/// Maximum switch channels
pub const SWITCHES_MAX: usize = 12;

/// Maximum analog input channels
pub const ANALOG_INPUTS_MAX: usize = 12;

/// Maximum buzzer channels
pub const BUZZERS_MAX: usize = 12;

/// Maximum digital input channels
pub const DIGITAL_INPUTS_MAX: usize = 12;

/// Maximum digital output channels
pub const DIGITAL_OUTPUTS_MAX: usize = 12;

/// Maximum ultrasonic sonar channels
pub const SONARS_MAX: usize = 12;

/// Hardware ticks per logic tick
pub const LOGIC_TICK_DIVISOR: u8 = 25;

/// Hardware tick period in microseconds
pub const HARDWARE_TICK_US: u32 = 400;

/// Logic tick period in milliseconds (divisor × hardware tick)
pub const LOGIC_TICK_MS: u32 = LOGIC_TICK_DIVISOR as u32 * HARDWARE_TICK_US / 1000;

/// Highest speed code; stride doubles with every step up from 1
pub const MAX_SPEED_CODE: u8 = 5;

/// Speed code given to pulse-width channels at registration (snap)
pub const PWM_DEFAULT_SPEED: u8 = 0;

/// Speed code callers use for a "normal" fade
pub const PWM_FADE_SPEED: u8 = 5;

/// Speed code given to servo channels at registration
pub const SERVO_DEFAULT_SPEED: u8 = 3;

/// Angle servos start at
pub const SERVO_NEUTRAL_ANGLE: u8 = 90;

/// Default sonar range limit in centimetres
pub const SONAR_DEFAULT_RANGE_CM: u16 = 100;

/// Largest accepted sonar range limit in centimetres
pub const SONAR_MAX_RANGE_CM: u16 = 500;
