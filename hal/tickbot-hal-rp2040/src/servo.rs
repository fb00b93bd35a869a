//! Servo actuator on a PWM slice
//!
//! The slice runs at 1 MHz with a 20 ms frame, so the compare value is the
//! pulse width in microseconds. Detaching drops the compare to zero, which
//! stops the pulses without disturbing the other output of the slice.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use tickbot_drivers::servo_pulse::{angle_to_pulse_us, FRAME_US};
use tickbot_hal::ServoActuator;

use crate::pwm::PwmSide;

/// One hobby servo
pub struct RpServo {
    pin: u8,
    pwm: Pwm<'static>,
    config: Config,
    side: PwmSide,
    min_us: u16,
    max_us: u16,
    angle: u8,
    attached: bool,
}

impl RpServo {
    /// Take over a slice output wired to `pin`; the servo starts detached
    pub fn new(pin: u8, mut pwm: Pwm<'static>, side: PwmSide, min_us: u16, max_us: u16) -> Self {
        // One tick per microsecond
        let divider = (clk_sys_freq() / 1_000_000).clamp(1, 255) as u8;

        let mut config = Config::default();
        config.top = (FRAME_US - 1) as u16;
        config.phase_correct = false;
        config.divider = divider.into();
        config.compare_a = 0;
        config.compare_b = 0;
        config.enable = true;
        pwm.set_config(&config);

        Self {
            pin,
            pwm,
            config,
            side,
            min_us,
            max_us,
            angle: 0,
            attached: false,
        }
    }

    /// Pin the servo is wired to
    pub fn pin(&self) -> u8 {
        self.pin
    }

    fn set_pulse_us(&mut self, us: u16) {
        match self.side {
            PwmSide::A => self.config.compare_a = us,
            PwmSide::B => self.config.compare_b = us,
        }
        self.pwm.set_config(&self.config);
    }
}

impl ServoActuator for RpServo {
    fn attach(&mut self, pin: u8) {
        if pin != self.pin {
            #[cfg(feature = "defmt")]
            defmt::warn!("servo on GPIO{} asked to attach to GPIO{}", self.pin, pin);
            return;
        }
        self.attached = true;
        self.set_pulse_us(angle_to_pulse_us(self.angle, self.min_us, self.max_us));
    }

    fn detach(&mut self) {
        self.attached = false;
        self.set_pulse_us(0);
    }

    fn write(&mut self, angle: u8) {
        self.angle = angle;
        if self.attached {
            self.set_pulse_us(angle_to_pulse_us(angle, self.min_us, self.max_us));
        }
    }

    fn attached(&self) -> bool {
        self.attached
    }
}
