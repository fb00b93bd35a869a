//! Step-law evaluator
//!
//! Maps `(current, target, speed)` to the next value. The stride for speed
//! code `n` (1-5) is `2^(n-1)`: one shift, no floating point. Code 0 means
//! "snap" for pulse-width outputs.
//!
//! Near the target the two variants clamp differently:
//!
//! - pulse-width: once the remaining distance is shorter than the stride,
//!   advance one unit per tick until arrival
//! - servo: once the remaining distance is shorter than the stride, cover
//!   it in a single tick
//!
//! Both variants never pass the target, and are fixed at it.

use crate::config::MAX_SPEED_CODE;
use crate::error::ControlError;

/// Ramp speed code (0-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Speed(u8);

impl Speed {
    /// Jump straight to the target
    pub const SNAP: Speed = Speed(0);

    /// Slowest ramp, one unit per tick
    pub const SLOWEST: Speed = Speed(1);

    /// Fastest ramp, 16 units per tick
    pub const FASTEST: Speed = Speed(MAX_SPEED_CODE);

    /// Validate a speed code
    pub const fn new(code: u8) -> Result<Self, ControlError> {
        if code > MAX_SPEED_CODE {
            Err(ControlError::InvalidSpeed)
        } else {
            Ok(Self(code))
        }
    }

    /// Validate a speed code for a channel without snap mode (1-5)
    pub const fn moving(code: u8) -> Result<Self, ControlError> {
        if code == 0 {
            Err(ControlError::InvalidSpeed)
        } else {
            Self::new(code)
        }
    }

    /// Build from a stored code, masking it into range
    pub(crate) const fn from_bits(code: u8) -> Self {
        if code > MAX_SPEED_CODE {
            Self(MAX_SPEED_CODE)
        } else {
            Self(code)
        }
    }

    /// The raw speed code
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Check if this is snap mode
    pub const fn is_snap(self) -> bool {
        self.0 == 0
    }

    /// Units moved per tick away from the target, or `None` in snap mode
    pub const fn stride(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(1 << (self.0 - 1))
        }
    }
}

/// Advance a pulse-width level one tick toward its target
pub fn pwm_step(current: u8, target: u8, speed: Speed) -> u8 {
    if current == target {
        return current;
    }

    let Some(stride) = speed.stride() else {
        return target;
    };

    let stride = if current.abs_diff(target) < stride {
        1
    } else {
        stride
    };

    advance(current, target, stride)
}

/// Advance a servo angle one tick toward its target
///
/// Servos have no snap mode; speed 0 moves at the minimum stride.
pub fn servo_step(current: u8, target: u8, speed: Speed) -> u8 {
    if current == target {
        return current;
    }

    let stride = speed.stride().unwrap_or(1);
    let stride = stride.min(current.abs_diff(target));

    advance(current, target, stride)
}

/// Move `stride` units toward `target`; `stride` never exceeds the distance
fn advance(current: u8, target: u8, stride: u8) -> u8 {
    if current < target {
        current + stride
    } else {
        current - stride
    }
}
