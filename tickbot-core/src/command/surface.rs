//! Synchronous commands and state queries

use tickbot_hal::servo::SERVO_MAX_ANGLE;
use tickbot_hal::Clock;

use crate::channel::{ChannelId, ChannelKind, ChannelTables, PwmId, ServoId, SwitchId};
use crate::config::PWM_FADE_SPEED;
use crate::error::ControlError;
use crate::motion::Speed;

/// Application-side handle on the channel tables
///
/// Every setter is a single atomic store per channel, so the scheduler never
/// observes a target without its matching speed.
pub struct Commands<'a, C> {
    pub(super) tables: &'a ChannelTables,
    pub(super) clock: C,
}

impl<'a, C: Clock> Commands<'a, C> {
    /// Create a command surface over registered tables
    pub fn new(tables: &'a ChannelTables, clock: C) -> Self {
        Self { tables, clock }
    }

    /// Get the underlying tables
    pub fn tables(&self) -> &'a ChannelTables {
        self.tables
    }

    /// Current time on the switch clock
    pub fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }

    // ── Pulse-width outputs ─────────────────────────────────────────────

    /// Retarget an output, keeping its stored speed
    pub fn set_target(&self, id: PwmId, level: u8) -> Result<(), ControlError> {
        let channel = self.tables.pwm(id)?;
        channel.set_command(level, channel.speed());
        Ok(())
    }

    /// Jump an output to `level` on the next logic tick
    pub fn set_level(&self, id: PwmId, level: u8) -> Result<(), ControlError> {
        self.tables.pwm(id)?.set_command(level, Speed::SNAP);
        Ok(())
    }

    /// Ramp an output to `level` at speed code 0-5
    pub fn fade_to(&self, id: PwmId, level: u8, speed: u8) -> Result<(), ControlError> {
        let speed = Speed::new(speed)?;
        self.tables.pwm(id)?.set_command(level, speed);
        Ok(())
    }

    /// Ramp an output to `level` at the fastest fade speed
    pub fn fade(&self, id: PwmId, level: u8) -> Result<(), ControlError> {
        self.fade_to(id, level, PWM_FADE_SPEED)
    }

    /// Level currently on an output
    pub fn pwm_level(&self, id: PwmId) -> Result<u8, ControlError> {
        Ok(self.tables.pwm(id)?.current())
    }

    /// Check if an output has reached its target
    pub fn pwm_settled(&self, id: PwmId) -> Result<bool, ControlError> {
        Ok(self.tables.pwm(id)?.is_settled())
    }

    // ── Servos ──────────────────────────────────────────────────────────

    /// Move a servo to `angle`, optionally changing its speed (1-5)
    ///
    /// A rested servo is re-attached first.
    pub fn move_to(&self, id: ServoId, angle: u8, speed: Option<u8>) -> Result<(), ControlError> {
        if angle > SERVO_MAX_ANGLE {
            return Err(ControlError::InvalidAngle);
        }
        let channel = self.tables.servo(id)?;
        let speed = match speed {
            Some(code) => Speed::moving(code)?,
            None => channel.speed(),
        };

        channel.request_attach(true);
        channel.set_command(angle, speed);
        Ok(())
    }

    /// Change a servo's speed without touching its target
    pub fn set_servo_speed(&self, id: ServoId, speed: u8) -> Result<(), ControlError> {
        let speed = Speed::moving(speed)?;
        let channel = self.tables.servo(id)?;
        channel.set_command(channel.target(), speed);
        Ok(())
    }

    /// Change every servo's speed
    pub fn set_servo_speeds(&self, speed: u8) -> Result<(), ControlError> {
        let speed = Speed::moving(speed)?;
        for channel in self.tables.servos() {
            channel.set_command(channel.target(), speed);
        }
        Ok(())
    }

    /// Angle currently commanded to a servo
    pub fn servo_position(&self, id: ServoId) -> Result<u8, ControlError> {
        Ok(self.tables.servo(id)?.current())
    }

    /// Check if a servo has reached its target
    pub fn servo_settled(&self, id: ServoId) -> Result<bool, ControlError> {
        Ok(self.tables.servo(id)?.is_settled())
    }

    /// Hold a servo where it is
    pub fn stop_servo(&self, id: ServoId) -> Result<(), ControlError> {
        let channel = self.tables.servo(id)?;
        channel.set_command(channel.current(), channel.speed());
        Ok(())
    }

    /// Hold every servo where it is
    pub fn stop_servos(&self) {
        for channel in self.tables.servos() {
            channel.set_command(channel.current(), channel.speed());
        }
    }

    // ── Settled state ───────────────────────────────────────────────────

    /// Check if a pulse-width or servo channel has reached its target
    ///
    /// Other kinds have no motion and return `InvalidChannel`.
    pub fn is_settled(&self, id: ChannelId) -> Result<bool, ControlError> {
        match id {
            ChannelId::Pwm(pwm) => self.pwm_settled(pwm),
            ChannelId::Servo(servo) => self.servo_settled(servo),
            _ => Err(ControlError::InvalidChannel),
        }
    }

    /// Check if every channel of a kind has reached its target
    ///
    /// Kinds without motion are always settled.
    pub fn all_settled(&self, kind: ChannelKind) -> bool {
        match kind {
            ChannelKind::Pwm => self.tables.pwms().iter().all(|c| c.is_settled()),
            ChannelKind::Servo => self.tables.servos().iter().all(|c| c.is_settled()),
            _ => true,
        }
    }

    // ── Switches ────────────────────────────────────────────────────────

    /// Check if a switch has been held for at least `min_hold_ms`
    pub fn switch_active(&self, id: SwitchId, min_hold_ms: u32) -> Result<bool, ControlError> {
        let switch = self.tables.switch(id)?;
        Ok(switch.held_for(&self.clock, min_hold_ms))
    }

    /// Check if a switch is released
    pub fn switch_inactive(&self, id: SwitchId) -> Result<bool, ControlError> {
        Ok(self.tables.switch(id)?.pressed_at().is_none())
    }
}
