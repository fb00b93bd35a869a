//! Board layout: which pin drives which channel
//!
//! A layout is written as a small TOML subset and parsed without an
//! allocator:
//!
//! ```toml
//! # Comments and blank lines are ignored
//! [servo.arm]
//! pin = 16
//!
//! [sonar.front]
//! pin = 14        # trigger
//! echo_pin = 13
//! ```
//!
//! Section headers are `[kind.name]` where `kind` is one of the
//! [`ChannelKind`] layout names. Channels are registered in file order, so
//! the order of sections of one kind fixes their ids.

use heapless::{String, Vec};

use crate::channel::ChannelKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum channel name length
pub const MAX_NAME_LEN: usize = 16;

/// Maximum channels in one layout
pub const MAX_LAYOUT_CHANNELS: usize = 32;

/// Layout parse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Section header is not `[kind.name]`
    InvalidSection { line: u16 },
    /// Section kind is not a known channel kind
    UnknownKind { line: u16 },
    /// Key is not valid for the section
    UnknownKey { line: u16 },
    /// Value is not a pin number, or a line is not `key = value`
    InvalidValue { line: u16 },
    /// Section ended without the pins its kind needs
    MissingPin { line: u16 },
    /// More channels than [`MAX_LAYOUT_CHANNELS`]
    TooManyChannels,
    /// Channel name longer than [`MAX_NAME_LEN`]
    NameTooLong { line: u16 },
    /// Two sections share a name
    DuplicateName { line: u16 },
}

/// One channel entry of a layout
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelSpec {
    /// Name the application looks the channel up by
    pub name: String<MAX_NAME_LEN>,
    /// Channel kind
    pub kind: ChannelKind,
    /// Primary pin (trigger pin for sonars)
    pub pin: u8,
    /// Secondary pin (echo pin for sonars)
    pub aux_pin: Option<u8>,
}

/// Parsed board layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardLayout {
    /// Channels in file order
    pub channels: Vec<ChannelSpec, MAX_LAYOUT_CHANNELS>,
}

impl BoardLayout {
    /// Create an empty layout
    pub const fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Find a channel by name
    pub fn find(&self, name: &str) -> Option<&ChannelSpec> {
        self.channels.iter().find(|c| c.name.as_str() == name)
    }

    /// Iterate over the channels of one kind, in registration order
    pub fn of_kind(&self, kind: ChannelKind) -> impl Iterator<Item = &ChannelSpec> + '_ {
        self.channels.iter().filter(move |c| c.kind == kind)
    }
}

/// Section being filled in
struct PendingSection {
    header_line: u16,
    name: String<MAX_NAME_LEN>,
    kind: ChannelKind,
    pin: Option<u8>,
    aux_pin: Option<u8>,
}

impl PendingSection {
    fn finish(self) -> Result<ChannelSpec, LayoutError> {
        let missing = LayoutError::MissingPin {
            line: self.header_line,
        };
        let pin = self.pin.ok_or(missing)?;
        if self.kind.needs_aux_pin() && self.aux_pin.is_none() {
            return Err(missing);
        }
        Ok(ChannelSpec {
            name: self.name,
            kind: self.kind,
            pin,
            aux_pin: self.aux_pin,
        })
    }
}

/// Parse a board layout
pub fn parse_layout(input: &str) -> Result<BoardLayout, LayoutError> {
    let mut layout = BoardLayout::new();
    let mut pending: Option<PendingSection> = None;

    for (index, raw) in input.lines().enumerate() {
        let line_no = u16::try_from(index + 1).unwrap_or(u16::MAX);
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            if let Some(section) = pending.take() {
                push_channel(&mut layout, section.finish()?)?;
            }
            let header = header
                .strip_suffix(']')
                .ok_or(LayoutError::InvalidSection { line: line_no })?;
            let section = parse_header(header.trim(), line_no)?;
            if layout.find(section.name.as_str()).is_some() {
                return Err(LayoutError::DuplicateName { line: line_no });
            }
            pending = Some(section);
            continue;
        }

        let section = pending
            .as_mut()
            .ok_or(LayoutError::UnknownKey { line: line_no })?;
        let (key, value) = line
            .split_once('=')
            .ok_or(LayoutError::InvalidValue { line: line_no })?;
        let value: u8 = value
            .trim()
            .parse()
            .map_err(|_| LayoutError::InvalidValue { line: line_no })?;

        match key.trim() {
            "pin" => section.pin = Some(value),
            "echo_pin" if section.kind.needs_aux_pin() => section.aux_pin = Some(value),
            _ => return Err(LayoutError::UnknownKey { line: line_no }),
        }
    }

    if let Some(section) = pending.take() {
        push_channel(&mut layout, section.finish()?)?;
    }

    Ok(layout)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_header(header: &str, line: u16) -> Result<PendingSection, LayoutError> {
    let (kind, name) = header
        .split_once('.')
        .ok_or(LayoutError::InvalidSection { line })?;
    let (kind, name) = (kind.trim(), name.trim());
    if name.is_empty() {
        return Err(LayoutError::InvalidSection { line });
    }

    let kind: ChannelKind = kind.parse().map_err(|_| LayoutError::UnknownKind { line })?;
    let name = String::try_from(name).map_err(|_| LayoutError::NameTooLong { line })?;

    Ok(PendingSection {
        header_line: line,
        name,
        kind,
        pin: None,
        aux_pin: None,
    })
}

fn push_channel(layout: &mut BoardLayout, spec: ChannelSpec) -> Result<(), LayoutError> {
    layout
        .channels
        .push(spec)
        .map_err(|_| LayoutError::TooManyChannels)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = "\
# demo robot
[pwm.headlight]
pin = 25

[servo.arm]
pin = 16   # signal

[switch.start]
pin = 15

[sonar.front]
pin = 14
echo_pin = 13

[servo.gripper]
pin = 17
";

    #[test]
    fn test_parse_demo_layout() {
        let layout = parse_layout(DEMO).unwrap();
        assert_eq!(layout.channels.len(), 5);

        let arm = layout.find("arm").unwrap();
        assert_eq!(arm.kind, ChannelKind::Servo);
        assert_eq!(arm.pin, 16);
        assert_eq!(arm.aux_pin, None);

        let sonar = layout.find("front").unwrap();
        assert_eq!(sonar.pin, 14);
        assert_eq!(sonar.aux_pin, Some(13));
    }

    #[test]
    fn test_of_kind_keeps_file_order() {
        let layout = parse_layout(DEMO).unwrap();
        let mut servos = layout.of_kind(ChannelKind::Servo);
        assert_eq!(servos.next().unwrap().name.as_str(), "arm");
        assert_eq!(servos.next().unwrap().name.as_str(), "gripper");
        assert!(servos.next().is_none());
    }

    #[test]
    fn test_sonar_needs_echo_pin() {
        let err = parse_layout("[sonar.front]\npin = 14\n").unwrap_err();
        assert_eq!(err, LayoutError::MissingPin { line: 1 });
    }

    #[test]
    fn test_echo_pin_only_for_sonar() {
        let err = parse_layout("[servo.arm]\npin = 3\necho_pin = 4\n").unwrap_err();
        assert_eq!(err, LayoutError::UnknownKey { line: 3 });
    }

    #[test]
    fn test_unknown_kind() {
        let err = parse_layout("[stepper.x]\npin = 3\n").unwrap_err();
        assert_eq!(err, LayoutError::UnknownKind { line: 1 });
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse_layout("[pwm.led]\npin = 300\n").unwrap_err(),
            LayoutError::InvalidValue { line: 2 }
        );
        assert_eq!(
            parse_layout("[pwm.led]\npin 3\n").unwrap_err(),
            LayoutError::InvalidValue { line: 2 }
        );
        assert_eq!(
            parse_layout("[pwm]\npin = 3\n").unwrap_err(),
            LayoutError::InvalidSection { line: 1 }
        );
    }

    #[test]
    fn test_duplicate_and_long_names() {
        let err = parse_layout("[pwm.led]\npin = 3\n[switch.led]\npin = 4\n").unwrap_err();
        assert_eq!(err, LayoutError::DuplicateName { line: 3 });

        let err = parse_layout("[pwm.a_much_too_long_channel_name]\npin = 3\n").unwrap_err();
        assert_eq!(err, LayoutError::NameTooLong { line: 1 });
    }

    #[test]
    fn test_key_outside_section() {
        let err = parse_layout("pin = 3\n").unwrap_err();
        assert_eq!(err, LayoutError::UnknownKey { line: 1 });
    }

    #[test]
    fn test_empty_layout() {
        let layout = parse_layout("# nothing here\n\n").unwrap();
        assert!(layout.channels.is_empty());
    }
}
