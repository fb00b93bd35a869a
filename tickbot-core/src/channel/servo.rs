//! Servo channel state

use portable_atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

use super::{pack_command, unpack_command};
use crate::config::{SERVO_DEFAULT_SPEED, SERVO_NEUTRAL_ANGLE};
use crate::motion::{servo_step, Speed};

/// One positional servo
///
/// Attaching and detaching the actuator is requested by the command surface
/// and carried out by the scheduler, which only detaches a settled servo.
#[derive(Debug)]
pub struct ServoChannel {
    pin: u8,
    /// Angle last written to the actuator
    current: AtomicU8,
    /// Packed target angle and speed code
    command: AtomicU16,
    /// Whether the actuator should be powered
    attach_requested: AtomicBool,
    /// Whether the actuator is powered
    attached: AtomicBool,
}

impl ServoChannel {
    pub(crate) const fn new(pin: u8) -> Self {
        Self {
            pin,
            current: AtomicU8::new(SERVO_NEUTRAL_ANGLE),
            command: AtomicU16::new(pack_command(
                SERVO_NEUTRAL_ANGLE,
                Speed::from_bits(SERVO_DEFAULT_SPEED),
            )),
            attach_requested: AtomicBool::new(true),
            attached: AtomicBool::new(false),
        }
    }

    /// Signal pin
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Angle currently commanded to the actuator
    pub fn current(&self) -> u8 {
        self.current.load(Ordering::Acquire)
    }

    /// Angle the servo is heading for
    pub fn target(&self) -> u8 {
        self.command().0
    }

    /// Ramp speed used toward the target
    pub fn speed(&self) -> Speed {
        self.command().1
    }

    /// Target angle and speed, read together
    pub fn command(&self) -> (u8, Speed) {
        unpack_command(self.command.load(Ordering::Acquire))
    }

    /// Check if the servo has reached its target
    pub fn is_settled(&self) -> bool {
        self.current() == self.target()
    }

    /// Check if the actuator is powered
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Check if the actuator should be powered
    pub fn attach_requested(&self) -> bool {
        self.attach_requested.load(Ordering::Acquire)
    }

    /// Store a new target and speed (command surface only)
    pub(crate) fn set_command(&self, target: u8, speed: Speed) {
        self.command
            .store(pack_command(target, speed), Ordering::Release);
    }

    /// Ask for the actuator to be attached or rested (command surface only)
    pub(crate) fn request_attach(&self, attach: bool) {
        self.attach_requested.store(attach, Ordering::Release);
    }

    /// Publish the actuator's power state (tick scheduler only)
    pub(crate) fn set_attached(&self, attached: bool) {
        self.attached.store(attached, Ordering::Release);
    }

    /// Step toward the target (tick scheduler only)
    ///
    /// Returns the new angle if it changed.
    pub(crate) fn advance(&self) -> Option<u8> {
        let current = self.current();
        let (target, speed) = self.command();
        if current == target {
            return None;
        }

        let next = servo_step(current, target, speed);
        self.current.store(next, Ordering::Release);
        Some(next)
    }
}
