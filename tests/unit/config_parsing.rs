//! Unit tests for TOML configuration parsing.

use stepper_homing::config::parse_config;
use stepper_homing::config::units::{Microsteps, StepsPerSec};
use stepper_homing::error::{ConfigError, Error};
use stepper_homing::{ActiveLevel, Direction};

const FULL_CONFIG: &str = r#"
[motor]
name = "turntable"
steps_per_revolution = 200
microsteps = 32
gear_ratio = 1.0
invert_direction = true
pulse_high_us = 2000
pulse_low_us = 2000
max_speed_steps_per_sec = 6400.0
acceleration_steps_per_sec2 = 3200.0

[homing]
toward_probe = "counter_clockwise"
probe_active = "low"
yield_us = 500

[report]
interval_ms = 250
header = false

[serial]
baud_rate = 115200
"#;

fn minimal_with(extra: &str) -> String {
    format!(
        r#"
[motor]
steps_per_revolution = 200
max_speed_steps_per_sec = 800.0
acceleration_steps_per_sec2 = 400.0
{extra}
"#
    )
}

/// Test parsing every section.
#[test]
fn test_parse_full_config() {
    let config = parse_config(FULL_CONFIG).expect("Failed to parse TOML");

    assert_eq!(config.motor.name.as_str(), "turntable");
    assert_eq!(config.motor.microsteps, Microsteps::THIRTY_SECOND);
    assert!(config.motor.invert_direction);
    assert_eq!(config.motor.max_speed, StepsPerSec(6400.0));
    assert_eq!(config.steps_per_revolution(), 6400);

    assert_eq!(config.homing.toward_probe, Direction::CounterClockwise);
    assert_eq!(config.homing.away_from_probe(), Direction::Clockwise);
    assert_eq!(config.homing.probe_active, ActiveLevel::Low);
    assert_eq!(config.homing.yield_us, 500);

    assert_eq!(config.report.interval_ms, 250);
    assert!(!config.report.header);
    assert_eq!(config.serial.baud_rate, 115_200);
}

/// Test that optional sections fall back to defaults.
#[test]
fn test_optional_sections_default() {
    let config = parse_config(&minimal_with("")).expect("Failed to parse TOML");

    assert_eq!(config.motor.name.as_str(), "motor");
    assert_eq!(config.motor.microsteps, Microsteps::FULL);
    assert_eq!(config.motor.pulse_low_us, 2000);
    assert_eq!(config.homing.toward_probe, Direction::Clockwise);
    assert!(config.report.header);
}

/// Test that invalid microstep values are rejected during parsing.
#[test]
fn test_invalid_microsteps_rejected() {
    let result = parse_config(&minimal_with("").replace(
        "steps_per_revolution = 200",
        "steps_per_revolution = 200\nmicrosteps = 12",
    ));
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test that the motor section is required.
#[test]
fn test_missing_motor_section() {
    let result = parse_config("[report]\ninterval_ms = 10\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test validation of the reporting and serial sections.
#[test]
fn test_zero_rates_rejected() {
    assert!(matches!(
        parse_config(&minimal_with("[report]\ninterval_ms = 0")),
        Err(Error::Config(ConfigError::InvalidReportInterval(0)))
    ));
    assert!(matches!(
        parse_config(&minimal_with("[serial]\nbaud_rate = 0")),
        Err(Error::Config(ConfigError::InvalidBaudRate(0)))
    ));
}

/// Test that NaN and infinite limits fail validation.
#[test]
fn test_non_finite_limits_rejected() {
    let base = minimal_with("");
    for value in ["nan", "inf", "-inf"] {
        let speed = base.replace(
            "max_speed_steps_per_sec = 800.0",
            &format!("max_speed_steps_per_sec = {value}"),
        );
        assert!(
            matches!(
                parse_config(&speed),
                Err(Error::Config(ConfigError::InvalidMaxSpeed(_)))
            ),
            "max speed {value}"
        );

        let accel = base.replace(
            "acceleration_steps_per_sec2 = 400.0",
            &format!("acceleration_steps_per_sec2 = {value}"),
        );
        assert!(
            matches!(
                parse_config(&accel),
                Err(Error::Config(ConfigError::InvalidAcceleration(_)))
            ),
            "acceleration {value}"
        );
    }

    let gear = minimal_with("").replace(
        "steps_per_revolution = 200",
        "steps_per_revolution = 200\ngear_ratio = nan",
    );
    assert!(matches!(
        parse_config(&gear),
        Err(Error::Config(ConfigError::InvalidGearRatio(_)))
    ));
}

/// Test rejecting an unknown homing direction.
#[test]
fn test_unknown_direction_rejected() {
    let result = parse_config(&minimal_with("[homing]\ntoward_probe = \"up\""));
    assert!(result.is_err());
}

/// Test the RPM conversion the host tooling uses for `S` commands.
#[test]
fn test_rpm_to_command_speed() {
    let config = parse_config(FULL_CONFIG).unwrap();
    let sps = StepsPerSec::from_rpm(2.0, config.steps_per_revolution());
    assert_eq!(sps.value() as i32, 213);
}
