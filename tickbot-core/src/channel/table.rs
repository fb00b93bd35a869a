//! Channel tables
//!
//! [`ChannelTables`] owns every channel slot. Registration takes `&mut self`
//! and happens once at start-up; afterwards the tables are shared by
//! reference between the tick scheduler and the command surface.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::Vec;
use tickbot_hal::{DigitalIo, Level, PinMode};

use super::id::{
    AnalogInputId, BuzzerId, ChannelId, ChannelKind, DigitalInputId, DigitalOutputId, PwmId,
    ServoId, SonarId, SwitchId,
};
use super::{PwmChannel, ServoChannel, SonarChannel, SwitchChannel};
use crate::config::{
    ChannelSpec, ANALOG_INPUTS_MAX, BUZZERS_MAX, DIGITAL_INPUTS_MAX, DIGITAL_OUTPUTS_MAX,
    PWMS_MAX, SERVOS_MAX, SONARS_MAX, SWITCHES_MAX,
};
use crate::error::ControlError;

/// Raised at the end of every logic tick with the logic-tick count
pub type TickSignal = Signal<CriticalSectionRawMutex, u32>;

/// Fixed-capacity tables for every channel kind
pub struct ChannelTables {
    pwms: Vec<PwmChannel, PWMS_MAX>,
    servos: Vec<ServoChannel, SERVOS_MAX>,
    switches: Vec<SwitchChannel, SWITCHES_MAX>,
    sonars: Vec<SonarChannel, SONARS_MAX>,
    analog_inputs: Vec<u8, ANALOG_INPUTS_MAX>,
    buzzers: Vec<u8, BUZZERS_MAX>,
    digital_inputs: Vec<u8, DIGITAL_INPUTS_MAX>,
    digital_outputs: Vec<u8, DIGITAL_OUTPUTS_MAX>,
    tick: TickSignal,
}

impl Default for ChannelTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Index the next push into `table` will land on
fn next_index<T, const N: usize>(table: &Vec<T, N>, kind: ChannelKind) -> Result<u8, ControlError> {
    if table.is_full() {
        return Err(ControlError::CapacityExceeded(kind));
    }
    // Capacities are far below 256
    Ok(table.len() as u8)
}

impl ChannelTables {
    /// Create empty tables
    pub const fn new() -> Self {
        Self {
            pwms: Vec::new(),
            servos: Vec::new(),
            switches: Vec::new(),
            sonars: Vec::new(),
            analog_inputs: Vec::new(),
            buzzers: Vec::new(),
            digital_inputs: Vec::new(),
            digital_outputs: Vec::new(),
            tick: Signal::new(),
        }
    }

    /// Register a channel of any kind
    ///
    /// `aux_pin` is the echo pin for sonars and ignored otherwise. The pin
    /// is configured through `io` only once a slot has been reserved, so a
    /// full table leaves both the table and the pins untouched.
    pub fn register<IO: DigitalIo>(
        &mut self,
        kind: ChannelKind,
        pin: u8,
        aux_pin: Option<u8>,
        io: &mut IO,
    ) -> Result<ChannelId, ControlError> {
        let id = match kind {
            ChannelKind::AnalogIn => self.add_analog_input(pin)?.into(),
            ChannelKind::Buzzer => self.add_buzzer(pin, io)?.into(),
            ChannelKind::DigitalIn => self.add_digital_input(pin, io)?.into(),
            ChannelKind::DigitalOut => self.add_digital_output(pin, io)?.into(),
            ChannelKind::Pwm => self.add_pwm(pin, io)?.into(),
            ChannelKind::Servo => self.add_servo(pin, io)?.into(),
            ChannelKind::Sonar => {
                let echo_pin = aux_pin.ok_or(ControlError::MissingAuxPin)?;
                self.add_sonar(pin, echo_pin, io)?.into()
            }
            ChannelKind::Switch => self.add_switch(pin, io)?.into(),
        };
        Ok(id)
    }

    /// Register the channel a layout entry describes
    pub fn register_spec<IO: DigitalIo>(
        &mut self,
        spec: &ChannelSpec,
        io: &mut IO,
    ) -> Result<ChannelId, ControlError> {
        self.register(spec.kind, spec.pin, spec.aux_pin, io)
    }

    /// Register a pulse-width output, starting at level 0
    pub fn add_pwm<IO: DigitalIo>(&mut self, pin: u8, io: &mut IO) -> Result<PwmId, ControlError> {
        let index = next_index(&self.pwms, ChannelKind::Pwm)?;
        io.configure(pin, PinMode::Output);
        self.pwms
            .push(PwmChannel::new(pin))
            .map_err(|_| ControlError::CapacityExceeded(ChannelKind::Pwm))?;
        Ok(PwmId(index))
    }

    /// Register a servo, starting at the neutral angle
    ///
    /// The scheduler attaches the actuator on its first logic tick.
    pub fn add_servo<IO: DigitalIo>(&mut self, pin: u8, io: &mut IO) -> Result<ServoId, ControlError> {
        let index = next_index(&self.servos, ChannelKind::Servo)?;
        io.configure(pin, PinMode::Output);
        self.servos
            .push(ServoChannel::new(pin))
            .map_err(|_| ControlError::CapacityExceeded(ChannelKind::Servo))?;
        Ok(ServoId(index))
    }

    /// Register an active-low switch with the pull-up enabled
    pub fn add_switch<IO: DigitalIo>(&mut self, pin: u8, io: &mut IO) -> Result<SwitchId, ControlError> {
        let index = next_index(&self.switches, ChannelKind::Switch)?;
        io.configure(pin, PinMode::InputPullUp);
        self.switches
            .push(SwitchChannel::new(pin))
            .map_err(|_| ControlError::CapacityExceeded(ChannelKind::Switch))?;
        Ok(SwitchId(index))
    }

    /// Register an ultrasonic sonar; the trigger idles low
    pub fn add_sonar<IO: DigitalIo>(
        &mut self,
        trigger_pin: u8,
        echo_pin: u8,
        io: &mut IO,
    ) -> Result<SonarId, ControlError> {
        let index = next_index(&self.sonars, ChannelKind::Sonar)?;
        io.configure(trigger_pin, PinMode::Output);
        io.configure(echo_pin, PinMode::Input);
        io.write(trigger_pin, Level::Low);
        self.sonars
            .push(SonarChannel::new(trigger_pin, echo_pin))
            .map_err(|_| ControlError::CapacityExceeded(ChannelKind::Sonar))?;
        Ok(SonarId(index))
    }

    /// Register an analog input (no pin set-up needed)
    pub fn add_analog_input(&mut self, pin: u8) -> Result<AnalogInputId, ControlError> {
        let index = next_index(&self.analog_inputs, ChannelKind::AnalogIn)?;
        self.analog_inputs
            .push(pin)
            .map_err(|_| ControlError::CapacityExceeded(ChannelKind::AnalogIn))?;
        Ok(AnalogInputId(index))
    }

    /// Register a buzzer; it starts silent
    pub fn add_buzzer<IO: DigitalIo>(&mut self, pin: u8, io: &mut IO) -> Result<BuzzerId, ControlError> {
        let index = next_index(&self.buzzers, ChannelKind::Buzzer)?;
        io.write(pin, Level::Low);
        io.configure(pin, PinMode::Output);
        self.buzzers
            .push(pin)
            .map_err(|_| ControlError::CapacityExceeded(ChannelKind::Buzzer))?;
        Ok(BuzzerId(index))
    }

    /// Register a plain digital input
    pub fn add_digital_input<IO: DigitalIo>(
        &mut self,
        pin: u8,
        io: &mut IO,
    ) -> Result<DigitalInputId, ControlError> {
        let index = next_index(&self.digital_inputs, ChannelKind::DigitalIn)?;
        io.configure(pin, PinMode::Input);
        self.digital_inputs
            .push(pin)
            .map_err(|_| ControlError::CapacityExceeded(ChannelKind::DigitalIn))?;
        Ok(DigitalInputId(index))
    }

    /// Register a plain digital output; it starts low
    pub fn add_digital_output<IO: DigitalIo>(
        &mut self,
        pin: u8,
        io: &mut IO,
    ) -> Result<DigitalOutputId, ControlError> {
        let index = next_index(&self.digital_outputs, ChannelKind::DigitalOut)?;
        io.write(pin, Level::Low);
        io.configure(pin, PinMode::Output);
        self.digital_outputs
            .push(pin)
            .map_err(|_| ControlError::CapacityExceeded(ChannelKind::DigitalOut))?;
        Ok(DigitalOutputId(index))
    }

    /// Look up a pulse-width channel
    pub fn pwm(&self, id: PwmId) -> Result<&PwmChannel, ControlError> {
        self.pwms.get(id.index()).ok_or(ControlError::InvalidChannel)
    }

    /// Look up a servo channel
    pub fn servo(&self, id: ServoId) -> Result<&ServoChannel, ControlError> {
        self.servos.get(id.index()).ok_or(ControlError::InvalidChannel)
    }

    /// Look up a switch channel
    pub fn switch(&self, id: SwitchId) -> Result<&SwitchChannel, ControlError> {
        self.switches
            .get(id.index())
            .ok_or(ControlError::InvalidChannel)
    }

    /// Look up a sonar channel
    pub fn sonar(&self, id: SonarId) -> Result<&SonarChannel, ControlError> {
        self.sonars.get(id.index()).ok_or(ControlError::InvalidChannel)
    }

    /// Pin of an analog input
    pub fn analog_input_pin(&self, id: AnalogInputId) -> Result<u8, ControlError> {
        self.analog_inputs
            .get(id.index())
            .copied()
            .ok_or(ControlError::InvalidChannel)
    }

    /// Pin of a buzzer
    pub fn buzzer_pin(&self, id: BuzzerId) -> Result<u8, ControlError> {
        self.buzzers
            .get(id.index())
            .copied()
            .ok_or(ControlError::InvalidChannel)
    }

    /// Pin of a digital input
    pub fn digital_input_pin(&self, id: DigitalInputId) -> Result<u8, ControlError> {
        self.digital_inputs
            .get(id.index())
            .copied()
            .ok_or(ControlError::InvalidChannel)
    }

    /// Pin of a digital output
    pub fn digital_output_pin(&self, id: DigitalOutputId) -> Result<u8, ControlError> {
        self.digital_outputs
            .get(id.index())
            .copied()
            .ok_or(ControlError::InvalidChannel)
    }

    /// All pulse-width channels, in registration order
    pub fn pwms(&self) -> &[PwmChannel] {
        &self.pwms
    }

    /// All servo channels, in registration order
    pub fn servos(&self) -> &[ServoChannel] {
        &self.servos
    }

    /// All switch channels, in registration order
    pub fn switches(&self) -> &[SwitchChannel] {
        &self.switches
    }

    /// All sonar channels, in registration order
    pub fn sonars(&self) -> &[SonarChannel] {
        &self.sonars
    }

    /// Number of registered channels of a kind
    pub fn count(&self, kind: ChannelKind) -> usize {
        match kind {
            ChannelKind::AnalogIn => self.analog_inputs.len(),
            ChannelKind::Buzzer => self.buzzers.len(),
            ChannelKind::DigitalIn => self.digital_inputs.len(),
            ChannelKind::DigitalOut => self.digital_outputs.len(),
            ChannelKind::Pwm => self.pwms.len(),
            ChannelKind::Servo => self.servos.len(),
            ChannelKind::Sonar => self.sonars.len(),
            ChannelKind::Switch => self.switches.len(),
        }
    }

    /// End-of-logic-tick notification
    pub fn tick_signal(&self) -> &TickSignal {
        &self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SERVOS_MAX;

    /// Records pin set-up calls
    #[derive(Default)]
    struct RecordingIo {
        calls: heapless::Vec<(u8, Option<PinMode>, Option<Level>), 64>,
    }

    impl DigitalIo for RecordingIo {
        fn configure(&mut self, pin: u8, mode: PinMode) {
            self.calls.push((pin, Some(mode), None)).unwrap();
        }

        fn write(&mut self, pin: u8, level: Level) {
            self.calls.push((pin, None, Some(level))).unwrap();
        }

        fn read(&self, _pin: u8) -> Level {
            Level::High
        }
    }

    #[test]
    fn test_ids_count_up_per_kind() {
        let mut tables = ChannelTables::new();
        let mut io = RecordingIo::default();

        let led = tables.add_pwm(3, &mut io).unwrap();
        let arm = tables.add_servo(9, &mut io).unwrap();
        let led2 = tables.add_pwm(5, &mut io).unwrap();

        assert_eq!(led.index(), 0);
        assert_eq!(led2.index(), 1);
        assert_eq!(arm.index(), 0);
        assert_eq!(tables.pwm(led2).unwrap().pin(), 5);
        assert_eq!(tables.count(ChannelKind::Pwm), 2);
    }

    #[test]
    fn test_capacity_exceeded_leaves_table_and_pins_alone() {
        let mut tables = ChannelTables::new();
        let mut io = RecordingIo::default();

        for pin in 0..SERVOS_MAX as u8 {
            tables.add_servo(pin, &mut io).unwrap();
        }
        let calls_before = io.calls.len();

        let err = tables
            .register(ChannelKind::Servo, 40, None, &mut io)
            .unwrap_err();
        assert_eq!(err, ControlError::CapacityExceeded(ChannelKind::Servo));
        assert_eq!(tables.count(ChannelKind::Servo), SERVOS_MAX);
        assert_eq!(io.calls.len(), calls_before);
        assert!(tables.servos().iter().all(|s| s.pin() != 40));
    }

    #[test]
    fn test_pin_side_effects() {
        let mut tables = ChannelTables::new();
        let mut io = RecordingIo::default();

        tables.add_switch(4, &mut io).unwrap();
        tables.add_digital_output(6, &mut io).unwrap();
        tables.add_sonar(7, 8, &mut io).unwrap();
        tables.add_analog_input(26).unwrap();

        assert_eq!(
            io.calls.as_slice(),
            &[
                (4, Some(PinMode::InputPullUp), None),
                (6, None, Some(Level::Low)),
                (6, Some(PinMode::Output), None),
                (7, Some(PinMode::Output), None),
                (8, Some(PinMode::Input), None),
                (7, None, Some(Level::Low)),
            ]
        );
    }

    #[test]
    fn test_generic_register_tags_kind() {
        let mut tables = ChannelTables::new();
        let mut io = RecordingIo::default();

        let id = tables
            .register(ChannelKind::Sonar, 7, Some(8), &mut io)
            .unwrap();
        assert_eq!(id.kind(), ChannelKind::Sonar);
        let sonar = tables.sonar(id.as_sonar().unwrap()).unwrap();
        assert_eq!(sonar.echo_pin(), 8);
        assert_eq!(sonar.range_cm(), 100);

        assert_eq!(
            tables.register(ChannelKind::Sonar, 7, None, &mut io),
            Err(ControlError::MissingAuxPin)
        );
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let mut tables = ChannelTables::new();
        let mut io = RecordingIo::default();
        let id = tables.add_pwm(3, &mut io).unwrap();

        let other = ChannelTables::new();
        assert!(matches!(other.pwm(id), Err(ControlError::InvalidChannel)));
        assert_eq!(
            other.digital_output_pin(DigitalOutputId(0)),
            Err(ControlError::InvalidChannel)
        );
    }
}
