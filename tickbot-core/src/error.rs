//! Controller errors

use core::fmt;

use crate::channel::ChannelKind;

/// Errors reported by registration and the command surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError {
    /// The kind's table is full
    CapacityExceeded(ChannelKind),
    /// A sonar was registered without its echo pin
    MissingAuxPin,
    /// Id does not name a registered channel of the expected kind
    InvalidChannel,
    /// Speed code out of range for the channel kind
    InvalidSpeed,
    /// Servo angle above 180 degrees
    InvalidAngle,
    /// Scheduler given a different number of actuators than registered servos
    ActuatorCountMismatch,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::CapacityExceeded(kind) => write!(f, "no free {} slot", kind),
            ControlError::MissingAuxPin => f.write_str("sonar needs an echo pin"),
            ControlError::InvalidChannel => f.write_str("unknown channel"),
            ControlError::InvalidSpeed => f.write_str("speed code out of range"),
            ControlError::InvalidAngle => f.write_str("servo angle above 180"),
            ControlError::ActuatorCountMismatch => {
                f.write_str("actuator count differs from registered servos")
            }
        }
    }
}
