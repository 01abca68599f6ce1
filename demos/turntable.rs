//! Example: Serial-driven turntable with probe homing.
//!
//! This example demonstrates how to:
//! - Load motor, homing and report settings from TOML
//! - Drive the controller from a stream of serial bytes
//! - Home against a probe mark on a worker thread
//!
//! The pins drive a simulated turntable with a mark 40 steps wide.
//!
//! Run with: `cargo run --example turntable --features std`

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use stepper_homing::{
    config::parse_config,
    error::Result,
    ActiveLevel, Controller, ProbeSensor, StepperMotor, StepsPerSec,
};

const CONFIG: &str = r#"
[motor]
name = "turntable"
steps_per_revolution = 200
microsteps = 32
pulse_high_us = 20
pulse_low_us = 20
max_speed_steps_per_sec = 2000.0
acceleration_steps_per_sec2 = 4000.0

[homing]
toward_probe = "clockwise"
probe_active = "low"
yield_us = 100

[report]
interval_ms = 250

[serial]
baud_rate = 115200
"#;

/// Mark window on the table, in steps from power-on.
const MARK: core::ops::Range<i64> = 300..340;

/// Simulated table: counts STEP rising edges in the DIR direction.
#[derive(Default)]
struct Table {
    position: i64,
    dir_high: bool,
    step_high: bool,
}

type Shared = Arc<Mutex<Table>>;

struct StepPin(Shared);
struct DirPin(Shared);
struct ProbePin(Shared);

impl embedded_hal::digital::ErrorType for StepPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for StepPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        if let Ok(mut table) = self.0.lock() {
            table.step_high = false;
        }
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        if let Ok(mut table) = self.0.lock() {
            if !table.step_high {
                table.position += if table.dir_high { 1 } else { -1 };
            }
            table.step_high = true;
        }
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for DirPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for DirPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        if let Ok(mut table) = self.0.lock() {
            table.dir_high = false;
        }
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        if let Ok(mut table) = self.0.lock() {
            table.dir_high = true;
        }
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for ProbePin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for ProbePin {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    // Active low: the sensor pulls the line down over the mark
    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(self
            .0
            .lock()
            .map(|table| MARK.contains(&table.position.rem_euclid(6400)))
            .unwrap_or(false))
    }
}

/// Real-time delay for the pulse phases.
struct SleepDelay;

impl embedded_hal::delay::DelayNs for SleepDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

fn main() -> Result<()> {
    println!("=== Turntable Homing Example ===\n");

    let config = parse_config(CONFIG)?;
    println!("Serial link at {} baud", config.serial.baud_rate);
    let table = Shared::default();

    let motor = StepperMotor::builder()
        .from_config(&config)?
        .step_pin(StepPin(table.clone()))
        .dir_pin(DirPin(table.clone()))
        .delay(SleepDelay)
        .build()?;
    let probe = ProbeSensor::new(ProbePin(table.clone()), ActiveLevel::Low);

    let mut controller = Controller::new(&config, motor, probe);
    let mut out = String::new();
    controller.start(&mut out)?;

    // Cruise backwards at 3.75 RPM before homing
    let cruise = StepsPerSec::from_rpm(-3.75, config.steps_per_revolution());
    let cruise = format!("S{}\n", cruise.value().round() as i32);

    // Bytes the host sends, and when
    let script: [(u64, &[u8]); 4] = [
        (0, cruise.as_bytes()),
        (1_000, b"L\n"),
        (1_200, b"S9999\n"),
        (4_000, b"X"),
    ];
    let mut pending = script.iter().peekable();

    let started = Instant::now();
    loop {
        let now_us = started.elapsed().as_micros() as u64;
        let now_ms = now_us / 1000;

        while let Some((at, bytes)) = pending.next_if(|(at, _)| *at <= now_ms) {
            println!("> {:>5} ms: {}", at, String::from_utf8_lossy(bytes).trim());
            controller.handle_bytes(bytes)?;
        }

        controller.poll(now_us, &mut out)?;
        if !out.is_empty() {
            print!("{}", out);
            out.clear();
        }

        if now_ms > 5_000 {
            break;
        }
        thread::sleep(Duration::from_micros(100));
    }

    if let Ok(table) = table.lock() {
        println!(
            "\nTable at {} steps, controller at {:?}",
            table.position,
            controller.position_steps()
        );
    }
    println!("Last homing: {:?}", controller.last_outcome());

    Ok(())
}
