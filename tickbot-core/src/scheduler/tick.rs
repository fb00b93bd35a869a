//! Periodic tick scheduler
//!
//! The firmware calls [`TickScheduler::on_hardware_tick`] from a fast
//! periodic timer. Every `divisor` hardware ticks one logic tick runs:
//!
//! 1. servo update (attach, step, write, detach once rested)
//! 2. switch latch
//! 3. pulse-width fade
//!
//! and the tick signal is raised so waiting commands re-check their
//! condition. A logic tick never fails; every write is infallible at the
//! trait level.

use heapless::Vec;
use tickbot_hal::{Clock, DigitalIo, Level, PwmOutput, ServoActuator};

use crate::channel::ChannelTables;
use crate::config::{LOGIC_TICK_DIVISOR, SERVOS_MAX};
use crate::error::ControlError;

/// Advances every registered channel from the tick context
///
/// - `IO` reads switch lines
/// - `P` drives pulse-width outputs
/// - `S` is one actuator per registered servo, in registration order
/// - `C` timestamps switch presses
pub struct TickScheduler<'a, IO, P, S, C> {
    tables: &'a ChannelTables,
    io: IO,
    pwm: P,
    servos: Vec<S, SERVOS_MAX>,
    clock: C,
    divisor: u8,
    prescaler: u8,
    logic_ticks: u32,
}

impl<'a, IO, P, S, C> TickScheduler<'a, IO, P, S, C>
where
    IO: DigitalIo,
    P: PwmOutput,
    S: ServoActuator,
    C: Clock,
{
    /// Create a scheduler with the default logic-tick divisor
    pub fn new(
        tables: &'a ChannelTables,
        io: IO,
        pwm: P,
        servos: Vec<S, SERVOS_MAX>,
        clock: C,
    ) -> Result<Self, ControlError> {
        Self::with_divisor(tables, io, pwm, servos, clock, LOGIC_TICK_DIVISOR)
    }

    /// Create a scheduler running one logic tick per `divisor` hardware ticks
    ///
    /// A divisor of 0 is treated as 1.
    pub fn with_divisor(
        tables: &'a ChannelTables,
        io: IO,
        pwm: P,
        servos: Vec<S, SERVOS_MAX>,
        clock: C,
        divisor: u8,
    ) -> Result<Self, ControlError> {
        if servos.len() != tables.servos().len() {
            return Err(ControlError::ActuatorCountMismatch);
        }

        Ok(Self {
            tables,
            io,
            pwm,
            servos,
            clock,
            divisor: divisor.max(1),
            prescaler: 0,
            logic_ticks: 0,
        })
    }

    /// Count one hardware tick
    ///
    /// Returns `true` if a logic tick ran.
    pub fn on_hardware_tick(&mut self) -> bool {
        self.prescaler += 1;
        if self.prescaler < self.divisor {
            return false;
        }

        self.prescaler -= self.divisor;
        self.logic_tick();
        true
    }

    /// Run one logic tick immediately
    pub fn logic_tick(&mut self) {
        self.update_servos();
        self.latch_switches();
        self.fade_pwms();

        self.logic_ticks = self.logic_ticks.wrapping_add(1);
        self.tables.tick_signal().signal(self.logic_ticks);
    }

    /// Logic ticks run so far
    pub fn logic_ticks(&self) -> u32 {
        self.logic_ticks
    }

    /// Get the digital I/O (for tests and diagnostics)
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Get the digital I/O mutably
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Get the servo actuators
    pub fn servos(&self) -> &[S] {
        &self.servos
    }

    fn update_servos(&mut self) {
        for (channel, actuator) in self.tables.servos().iter().zip(self.servos.iter_mut()) {
            let attaching = channel.attach_requested() && !actuator.attached();
            if attaching {
                actuator.attach(channel.pin());
            }

            // An actuator attached this tick steps in the same tick
            if actuator.attached() {
                match channel.advance() {
                    Some(angle) => actuator.write(angle),
                    None if attaching => actuator.write(channel.current()),
                    None if !channel.attach_requested() => actuator.detach(),
                    None => {}
                }
            }

            channel.set_attached(actuator.attached());
        }
    }

    fn latch_switches(&mut self) {
        let now = self.clock.now_ms();
        for switch in self.tables.switches() {
            let active = self.io.read(switch.pin()) == Level::Low;
            switch.latch(active, now);
        }
    }

    fn fade_pwms(&mut self) {
        for channel in self.tables.pwms() {
            if let Some(level) = channel.advance() {
                self.pwm.set_duty(channel.pin(), level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LOGIC_TICK_MS;
    use crate::motion::Speed;
    use crate::testing::{ManualClock, MockPins, MockPwm, MockServo, Output, OutputLog};

    type TestScheduler<'a> =
        TickScheduler<'a, MockPins, MockPwm<'a>, MockServo<'a>, &'a ManualClock>;

    fn make_scheduler<'a>(
        tables: &'a ChannelTables,
        log: &'a OutputLog,
        clock: &'a ManualClock,
    ) -> TestScheduler<'a> {
        let mut servos = Vec::new();
        for _ in tables.servos() {
            let _ = servos.push(MockServo::new(log));
        }
        TickScheduler::new(tables, MockPins::default(), MockPwm { log }, servos, clock).unwrap()
    }

    /// Hold switch pin 4 at `level` for one logic tick
    fn step(sched: &mut TestScheduler<'_>, clock: &ManualClock, level: Level) {
        sched.io_mut().set(4, level);
        clock.advance(LOGIC_TICK_MS);
        sched.logic_tick();
    }

    #[test]
    fn test_divisor_gates_logic_ticks() {
        let tables = ChannelTables::new();
        let log = OutputLog::default();
        let clock = ManualClock::default();
        let mut sched = make_scheduler(&tables, &log, &clock);

        let ran: usize = (0..75).filter(|_| sched.on_hardware_tick()).count();
        assert_eq!(ran, 3);
        assert_eq!(sched.logic_ticks(), 3);
        assert!(!sched.on_hardware_tick());
    }

    #[test]
    fn test_actuator_count_must_match() {
        let mut tables = ChannelTables::new();
        let mut pins = MockPins::default();
        tables.add_servo(9, &mut pins).unwrap();

        let log = OutputLog::default();
        let clock = ManualClock::default();
        let result = TickScheduler::new(
            &tables,
            pins,
            MockPwm { log: &log },
            Vec::<MockServo, SERVOS_MAX>::new(),
            &clock,
        );
        assert!(matches!(result, Err(ControlError::ActuatorCountMismatch)));
    }

    #[test]
    fn test_pwm_fade_takes_fifty_ticks() {
        let mut tables = ChannelTables::new();
        let mut pins = MockPins::default();
        let led = tables.add_pwm(3, &mut pins).unwrap();
        let log = OutputLog::default();
        let clock = ManualClock::default();
        let mut sched = make_scheduler(&tables, &log, &clock);

        let channel = tables.pwm(led).unwrap();
        channel.set_command(200, Speed::new(3).unwrap());

        let mut ticks = 0;
        while !channel.is_settled() {
            sched.logic_tick();
            ticks += 1;
            assert_eq!(channel.current() % 4, 0);
            assert!(ticks <= 50);
        }
        assert_eq!(ticks, 50);

        let writes = log.take();
        assert_eq!(writes.len(), 50);
        assert_eq!(writes.last(), Some(&Output::Duty { pin: 3, duty: 200 }));
    }

    #[test]
    fn test_servo_sweep_takes_eighty_ticks() {
        let mut tables = ChannelTables::new();
        let mut pins = MockPins::default();
        let arm = tables.add_servo(9, &mut pins).unwrap();
        let log = OutputLog::default();
        let clock = ManualClock::default();
        let mut sched = make_scheduler(&tables, &log, &clock);

        let channel = tables.servo(arm).unwrap();
        channel.set_command(10, Speed::SLOWEST);
        for tick in 1..=80 {
            assert!(!channel.is_settled());
            sched.logic_tick();
            assert_eq!(channel.current(), 90 - tick as u8);
        }
        assert!(channel.is_settled());
        assert_eq!(sched.servos()[0].angle, 10);

        // The first tick attached and stepped at once
        let writes = log.take();
        assert_eq!(&writes[..2], &[Output::Attach(9), Output::Angle { pin: 9, angle: 89 }]);
        assert_eq!(writes.len(), 81);
    }

    #[test]
    fn test_fresh_servo_attaches_at_neutral_when_idle() {
        let mut tables = ChannelTables::new();
        let mut pins = MockPins::default();
        let arm = tables.add_servo(9, &mut pins).unwrap();
        let log = OutputLog::default();
        let clock = ManualClock::default();
        let mut sched = make_scheduler(&tables, &log, &clock);

        sched.logic_tick();
        assert_eq!(log.take().as_slice(), &[
            Output::Attach(9),
            Output::Angle { pin: 9, angle: 90 },
        ]);
        assert!(tables.servo(arm).unwrap().is_attached());
    }

    #[test]
    fn test_servo_writes_precede_pwm_writes() {
        let mut tables = ChannelTables::new();
        let mut pins = MockPins::default();
        let led = tables.add_pwm(3, &mut pins).unwrap();
        let arm = tables.add_servo(9, &mut pins).unwrap();
        let log = OutputLog::default();
        let clock = ManualClock::default();
        let mut sched = make_scheduler(&tables, &log, &clock);
        sched.logic_tick();
        log.take();

        tables.pwm(led).unwrap().set_command(50, Speed::SNAP);
        tables.servo(arm).unwrap().set_command(100, Speed::FASTEST);
        sched.logic_tick();

        assert_eq!(log.take().as_slice(), &[
            Output::Angle { pin: 9, angle: 100 },
            Output::Duty { pin: 3, duty: 50 },
        ]);
    }

    #[test]
    fn test_rest_detaches_only_when_settled() {
        let mut tables = ChannelTables::new();
        let mut pins = MockPins::default();
        let arm = tables.add_servo(9, &mut pins).unwrap();
        let log = OutputLog::default();
        let clock = ManualClock::default();
        let mut sched = make_scheduler(&tables, &log, &clock);
        sched.logic_tick();

        let channel = tables.servo(arm).unwrap();
        channel.set_command(94, Speed::new(2).unwrap());
        channel.request_attach(false);

        sched.logic_tick();
        assert_eq!(channel.current(), 92);
        assert!(channel.is_attached());

        sched.logic_tick();
        assert!(channel.is_settled());
        assert!(channel.is_attached());

        sched.logic_tick();
        assert!(!channel.is_attached());
        assert!(!sched.servos()[0].attached());

        // A new request re-attaches at the held angle
        channel.request_attach(true);
        log.take();
        sched.logic_tick();
        assert_eq!(log.take().as_slice(), &[
            Output::Attach(9),
            Output::Angle { pin: 9, angle: 94 },
        ]);
    }

    #[test]
    fn test_switch_hold_and_release() {
        let mut tables = ChannelTables::new();
        let mut pins = MockPins::default();
        let start = tables.add_switch(4, &mut pins).unwrap();
        let log = OutputLog::default();
        let clock = ManualClock::default();
        let mut sched = make_scheduler(&tables, &log, &clock);
        let switch = tables.switch(start).unwrap();

        step(&mut sched, &clock, Level::High);
        assert_eq!(switch.pressed_at(), None);

        // Held low for 150 ms
        let mut became_active = None;
        for tick in 0..15 {
            step(&mut sched, &clock, Level::Low);
            if became_active.is_none() && switch.held_for(&clock, 100) {
                became_active = Some(tick);
            }
        }
        assert_eq!(became_active, Some(10));
        assert_eq!(switch.pressed_at(), Some(20));

        step(&mut sched, &clock, Level::High);
        assert!(!switch.held_for(&clock, 100));
        assert_eq!(switch.pressed_at(), None);
    }

    #[test]
    fn test_tick_signal_carries_count() {
        let tables = ChannelTables::new();
        let log = OutputLog::default();
        let clock = ManualClock::default();
        let mut sched = make_scheduler(&tables, &log, &clock);

        sched.logic_tick();
        sched.logic_tick();
        assert_eq!(tables.tick_signal().try_take(), Some(2));
        assert_eq!(tables.tick_signal().try_take(), None);
    }
}
