//! Mock hardware shared by the unit tests

use core::cell::{Cell, RefCell};

use heapless::Vec;
use tickbot_hal::{Clock, DigitalIo, Level, PinMode, PwmOutput, ServoActuator};

/// Something a mock output did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Duty { pin: u8, duty: u8 },
    Angle { pin: u8, angle: u8 },
    Attach(u8),
    Detach(u8),
}

/// Ordered record of output activity across mocks
#[derive(Default)]
pub struct OutputLog(RefCell<Vec<Output, 512>>);

impl OutputLog {
    pub fn push(&self, output: Output) {
        let _ = self.0.borrow_mut().push(output);
    }

    pub fn take(&self) -> Vec<Output, 512> {
        core::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Pin bank with every line idling high
pub struct MockPins {
    levels: [Level; 32],
    modes: [Option<PinMode>; 32],
}

impl Default for MockPins {
    fn default() -> Self {
        Self {
            levels: [Level::High; 32],
            modes: [None; 32],
        }
    }
}

impl MockPins {
    /// Drive an input line from outside
    pub fn set(&mut self, pin: u8, level: Level) {
        self.levels[pin as usize] = level;
    }

    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        self.modes[pin as usize]
    }
}

impl DigitalIo for MockPins {
    fn configure(&mut self, pin: u8, mode: PinMode) {
        self.modes[pin as usize] = Some(mode);
    }

    fn write(&mut self, pin: u8, level: Level) {
        self.levels[pin as usize] = level;
    }

    fn read(&self, pin: u8) -> Level {
        self.levels[pin as usize]
    }
}

pub struct MockPwm<'a> {
    pub log: &'a OutputLog,
}

impl PwmOutput for MockPwm<'_> {
    fn set_duty(&mut self, pin: u8, duty: u8) {
        self.log.push(Output::Duty { pin, duty });
    }
}

pub struct MockServo<'a> {
    pub log: &'a OutputLog,
    pub pin: Option<u8>,
    pub angle: u8,
}

impl<'a> MockServo<'a> {
    pub fn new(log: &'a OutputLog) -> Self {
        Self {
            log,
            pin: None,
            angle: 0,
        }
    }
}

impl ServoActuator for MockServo<'_> {
    fn attach(&mut self, pin: u8) {
        self.pin = Some(pin);
        self.log.push(Output::Attach(pin));
    }

    fn detach(&mut self) {
        if let Some(pin) = self.pin.take() {
            self.log.push(Output::Detach(pin));
        }
    }

    fn write(&mut self, angle: u8) {
        self.angle = angle;
        if let Some(pin) = self.pin {
            self.log.push(Output::Angle { pin, angle });
        }
    }

    fn attached(&self) -> bool {
        self.pin.is_some()
    }
}

/// Clock moved by hand
#[derive(Default)]
pub struct ManualClock(Cell<u32>);

impl ManualClock {
    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}
