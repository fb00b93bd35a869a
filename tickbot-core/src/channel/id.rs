//! Channel kinds and identifiers
//!
//! Every registered channel gets a small per-kind index. The typed ids keep
//! a servo id from being handed to a pulse-width operation at compile time;
//! [`ChannelId`] carries the kind alongside the index for the generic
//! registration path.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of channel a table slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChannelKind {
    /// Analog input sampled on demand
    AnalogIn,
    /// Piezo buzzer driven high/low
    Buzzer,
    /// Plain digital input
    DigitalIn,
    /// Plain digital output
    DigitalOut,
    /// Pulse-width output faded by the scheduler
    Pwm,
    /// Positional servo moved by the scheduler
    Servo,
    /// Ultrasonic range finder (trigger + echo pins)
    Sonar,
    /// Active-low switch latched by the scheduler
    Switch,
}

impl ChannelKind {
    /// All kinds, in layout-file order
    pub const ALL: [ChannelKind; 8] = [
        ChannelKind::AnalogIn,
        ChannelKind::Buzzer,
        ChannelKind::DigitalIn,
        ChannelKind::DigitalOut,
        ChannelKind::Pwm,
        ChannelKind::Servo,
        ChannelKind::Sonar,
        ChannelKind::Switch,
    ];

    /// Name used in board layout files
    pub const fn as_str(self) -> &'static str {
        match self {
            ChannelKind::AnalogIn => "analog_in",
            ChannelKind::Buzzer => "buzzer",
            ChannelKind::DigitalIn => "digital_in",
            ChannelKind::DigitalOut => "digital_out",
            ChannelKind::Pwm => "pwm",
            ChannelKind::Servo => "servo",
            ChannelKind::Sonar => "sonar",
            ChannelKind::Switch => "switch",
        }
    }

    /// Check if the scheduler moves channels of this kind toward a target
    pub const fn has_motion(self) -> bool {
        matches!(self, ChannelKind::Pwm | ChannelKind::Servo)
    }

    /// Check if this kind needs a second pin
    pub const fn needs_aux_pin(self) -> bool {
        matches!(self, ChannelKind::Sonar)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown channel kind name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownKind;

impl FromStr for ChannelKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(UnknownKind)
    }
}

macro_rules! channel_ids {
    ($($(#[$doc:meta])* $name:ident => $kind:ident,)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            #[cfg_attr(feature = "defmt", derive(defmt::Format))]
            pub struct $name(pub(crate) u8);

            impl $name {
                /// Table index of this channel
                pub const fn index(self) -> usize {
                    self.0 as usize
                }
            }

            impl From<$name> for ChannelId {
                fn from(id: $name) -> Self {
                    ChannelId::$kind(id)
                }
            }
        )*

        /// Kind-tagged channel identifier returned by generic registration
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum ChannelId {
            $(
                #[allow(missing_docs)]
                $kind($name),
            )*
        }

        impl ChannelId {
            /// Kind of the channel
            pub const fn kind(self) -> ChannelKind {
                match self {
                    $(ChannelId::$kind(_) => ChannelKind::$kind,)*
                }
            }

            /// Table index within the channel's kind
            pub const fn index(self) -> usize {
                match self {
                    $(ChannelId::$kind(id) => id.index(),)*
                }
            }
        }
    };
}

channel_ids! {
    /// Analog input channel
    AnalogInputId => AnalogIn,
    /// Buzzer channel
    BuzzerId => Buzzer,
    /// Digital input channel
    DigitalInputId => DigitalIn,
    /// Digital output channel
    DigitalOutputId => DigitalOut,
    /// Pulse-width output channel
    PwmId => Pwm,
    /// Servo channel
    ServoId => Servo,
    /// Sonar channel
    SonarId => Sonar,
    /// Switch channel
    SwitchId => Switch,
}

impl ChannelId {
    /// The pulse-width id, if this is a pulse-width channel
    pub const fn as_pwm(self) -> Option<PwmId> {
        match self {
            ChannelId::Pwm(id) => Some(id),
            _ => None,
        }
    }

    /// The servo id, if this is a servo channel
    pub const fn as_servo(self) -> Option<ServoId> {
        match self {
            ChannelId::Servo(id) => Some(id),
            _ => None,
        }
    }

    /// The switch id, if this is a switch channel
    pub const fn as_switch(self) -> Option<SwitchId> {
        match self {
            ChannelId::Switch(id) => Some(id),
            _ => None,
        }
    }

    /// The sonar id, if this is a sonar channel
    pub const fn as_sonar(self) -> Option<SonarId> {
        match self {
            ChannelId::Sonar(id) => Some(id),
            _ => None,
        }
    }

    /// The analog input id, if this is an analog input channel
    pub const fn as_analog_input(self) -> Option<AnalogInputId> {
        match self {
            ChannelId::AnalogIn(id) => Some(id),
            _ => None,
        }
    }

    /// The buzzer id, if this is a buzzer channel
    pub const fn as_buzzer(self) -> Option<BuzzerId> {
        match self {
            ChannelId::Buzzer(id) => Some(id),
            _ => None,
        }
    }

    /// The digital input id, if this is a digital input channel
    pub const fn as_digital_input(self) -> Option<DigitalInputId> {
        match self {
            ChannelId::DigitalIn(id) => Some(id),
            _ => None,
        }
    }

    /// The digital output id, if this is a digital output channel
    pub const fn as_digital_output(self) -> Option<DigitalOutputId> {
        match self {
            ChannelId::DigitalOut(id) => Some(id),
            _ => None,
        }
    }
}
