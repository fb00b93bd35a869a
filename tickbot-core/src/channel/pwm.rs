//! Pulse-width channel state

use portable_atomic::{AtomicU16, AtomicU8, Ordering};

use super::{pack_command, unpack_command};
use crate::config::PWM_DEFAULT_SPEED;
use crate::motion::{pwm_step, Speed};

/// One pulse-width (analog) output
#[derive(Debug)]
pub struct PwmChannel {
    pin: u8,
    /// Last level written to the output
    current: AtomicU8,
    /// Packed target level and speed code
    command: AtomicU16,
}

impl PwmChannel {
    pub(crate) const fn new(pin: u8) -> Self {
        Self {
            pin,
            current: AtomicU8::new(0),
            command: AtomicU16::new(pack_command(0, Speed::from_bits(PWM_DEFAULT_SPEED))),
        }
    }

    /// Output pin
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Level currently on the output
    pub fn current(&self) -> u8 {
        self.current.load(Ordering::Acquire)
    }

    /// Commanded level
    pub fn target(&self) -> u8 {
        self.command().0
    }

    /// Ramp speed used toward the target
    pub fn speed(&self) -> Speed {
        self.command().1
    }

    /// Commanded level and speed, read together
    pub fn command(&self) -> (u8, Speed) {
        unpack_command(self.command.load(Ordering::Acquire))
    }

    /// Check if the output has reached its target
    pub fn is_settled(&self) -> bool {
        self.current() == self.target()
    }

    /// Store a new target and speed (command surface only)
    pub(crate) fn set_command(&self, target: u8, speed: Speed) {
        self.command
            .store(pack_command(target, speed), Ordering::Release);
    }

    /// Step toward the target (tick scheduler only)
    ///
    /// Returns the new level if it changed.
    pub(crate) fn advance(&self) -> Option<u8> {
        let current = self.current();
        let (target, speed) = self.command();
        if current == target {
            return None;
        }

        let next = pwm_step(current, target, speed);
        self.current.store(next, Ordering::Release);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_defaults() {
        let channel = PwmChannel::new(5);
        assert_eq!(channel.pin(), 5);
        assert_eq!(channel.current(), 0);
        assert_eq!(channel.target(), 0);
        assert!(channel.speed().is_snap());
        assert!(channel.is_settled());
    }

    #[test]
    fn test_advance_reports_changes_only() {
        let channel = PwmChannel::new(5);
        assert_eq!(channel.advance(), None);

        channel.set_command(10, Speed::new(4).unwrap());
        assert!(!channel.is_settled());
        assert_eq!(channel.advance(), Some(8));
        assert_eq!(channel.advance(), Some(9));
        assert_eq!(channel.advance(), Some(10));
        assert_eq!(channel.advance(), None);
        assert!(channel.is_settled());
    }

    #[test]
    fn test_snap_lands_in_one_advance() {
        let channel = PwmChannel::new(5);
        channel.set_command(180, Speed::SNAP);
        assert_eq!(channel.advance(), Some(180));
        assert!(channel.is_settled());
    }
}
