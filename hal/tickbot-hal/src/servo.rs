//! Hobby servo actuator abstraction

/// Largest angle a servo accepts, in degrees
pub const SERVO_MAX_ANGLE: u8 = 180;

/// A single positional servo output
///
/// While detached the servo receives no control pulses and its motor is
/// unpowered. Attaching binds the actuator to a pin; writing an angle while
/// detached only records it.
pub trait ServoActuator {
    /// Start driving control pulses on `pin`
    fn attach(&mut self, pin: u8);

    /// Stop driving control pulses
    fn detach(&mut self);

    /// Command an angle in degrees (0-180)
    fn write(&mut self, angle: u8);

    /// Check if the actuator is currently attached
    fn attached(&self) -> bool;
}
