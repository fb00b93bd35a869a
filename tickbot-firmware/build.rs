//! Build script for tickbot-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml against the board wiring at compile time

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

include!("src/wiring.rs");

/// Channel kinds a layout may declare
const KINDS: &[&str] = &[
    "analog_in",
    "buzzer",
    "digital_in",
    "digital_out",
    "pwm",
    "servo",
    "sonar",
    "switch",
];

/// Channels of one kind the firmware can register
const PER_KIND_MAX: usize = 12;

/// Channels one layout may declare
const LAYOUT_MAX: usize = 32;

/// Longest channel name
const NAME_MAX: usize = 16;

fn main() {
    setup_linker();
    validate_layout();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/wiring.rs");
}

/// Validate board.toml at compile time
fn validate_layout() {
    println!("cargo:rerun-if-changed=board.toml");

    let layout_path = Path::new("board.toml");

    if !layout_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds its channel layout from board.toml.         ║\n\
            ║  Please create one in the tickbot-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(layout_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let layout: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let errors = check_channels(&layout);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid channel layout in board.toml                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=board.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pins a kind's primary pin may use
fn wired_pins(kind: &str) -> &'static [u8] {
    match kind {
        "pwm" => PWM_PINS,
        "servo" => SERVO_PINS,
        "analog_in" => ANALOG_PINS,
        "switch" => TICK_PINS,
        _ => APP_PINS,
    }
}

/// Read a pin key, recording an error if it is not a wired GPIO
fn read_pin(
    section: &str,
    channel: &toml::value::Table,
    key: &str,
    allowed: &[u8],
    errors: &mut Vec<String>,
) -> Option<u8> {
    let value = match channel.get(key) {
        Some(toml::Value::Integer(n)) => *n,
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            return None;
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            return None;
        }
    };

    match u8::try_from(value) {
        Ok(pin) if allowed.contains(&pin) => Some(pin),
        _ => {
            errors.push(format!(
                "[{}] {} = {} is not wired (allowed: {:?})",
                section, key, value, allowed
            ));
            None
        }
    }
}

/// Check every `[kind.name]` section
fn check_channels(layout: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut pins = HashSet::new();
    let mut total = 0;

    let Some(root) = layout.as_table() else {
        return vec!["layout must be a table of [kind.name] sections".to_string()];
    };

    for (kind, channels) in root {
        if !KINDS.contains(&kind.as_str()) {
            errors.push(format!("unknown channel kind '{}'", kind));
            continue;
        }
        let Some(channels) = channels.as_table() else {
            errors.push(format!("'{}' must hold [{}.name] sections", kind, kind));
            continue;
        };
        if channels.len() > PER_KIND_MAX {
            errors.push(format!("more than {} {} channels", PER_KIND_MAX, kind));
        }
        total += channels.len();

        for (name, channel) in channels {
            let section = format!("{}.{}", kind, name);
            if name.len() > NAME_MAX {
                errors.push(format!("[{}] name longer than {} chars", section, NAME_MAX));
            }
            if !names.insert(name.clone()) {
                errors.push(format!("[{}] reuses the name '{}'", section, name));
            }

            let Some(channel) = channel.as_table() else {
                errors.push(format!("[{}] must be a table", section));
                continue;
            };

            for key in channel.keys() {
                let known = key == "pin" || (key == "echo_pin" && kind == "sonar");
                if !known {
                    errors.push(format!("[{}] unknown key '{}'", section, key));
                }
            }

            let mut used = Vec::new();
            used.extend(read_pin(&section, channel, "pin", wired_pins(kind), &mut errors));
            if kind == "sonar" {
                used.extend(read_pin(&section, channel, "echo_pin", ECHO_PINS, &mut errors));
            }
            for pin in used {
                if !pins.insert(pin) {
                    errors.push(format!("[{}] GPIO{} is already in use", section, pin));
                }
            }
        }
    }

    if total > LAYOUT_MAX {
        errors.push(format!("more than {} channels in total", LAYOUT_MAX));
    }

    errors
}
