//! Angle status reporting.

use core::fmt::Write;

use crate::config::units::Degrees;
use crate::config::ReportConfig;

/// First line written after startup.
pub const BANNER: &str = "stepper-homing ready";

/// CSV header matching [`Reporter::report`] lines.
pub const CSV_HEADER: &str = "time_ms,angle_deg";

/// Line written when a homing session sets the zero.
pub const HOMED: &str = "HOMED";

/// Emits `time_ms,angle_deg` lines no faster than the configured interval.
#[derive(Debug, Clone)]
pub struct Reporter {
    interval_ms: u32,
    header: bool,
    last_ms: Option<u64>,
}

impl Reporter {
    /// Create a reporter.
    pub fn new(interval_ms: u32, header: bool) -> Self {
        Self {
            interval_ms,
            header,
            last_ms: None,
        }
    }

    /// Create a reporter from the `[report]` section.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.interval_ms, config.header)
    }

    /// Write the startup banner and, if enabled, the CSV header.
    pub fn write_startup<W: Write>(&self, out: &mut W) -> core::fmt::Result {
        writeln!(out, "{}", BANNER)?;
        if self.header {
            writeln!(out, "{}", CSV_HEADER)?;
        }
        Ok(())
    }

    /// Whether a status line is due at `now_ms`.
    pub fn due(&self, now_ms: u64) -> bool {
        match self.last_ms {
            Some(last) => now_ms.saturating_sub(last) >= u64::from(self.interval_ms),
            None => true,
        }
    }

    /// Write a status line if one is due. Returns whether a line was written.
    pub fn report<W: Write>(
        &mut self,
        out: &mut W,
        now_ms: u64,
        angle: Degrees,
    ) -> Result<bool, core::fmt::Error> {
        if !self.due(now_ms) {
            return Ok(false);
        }
        writeln!(out, "{},{:.2}", now_ms, angle.value())?;
        self.last_ms = Some(now_ms);
        Ok(true)
    }

    /// Forget the last report so the next one is emitted at once.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_lines() {
        let mut out = String::new();
        Reporter::new(100, true).write_startup(&mut out).unwrap();
        assert_eq!(out, "stepper-homing ready\ntime_ms,angle_deg\n");

        let mut out = String::new();
        Reporter::new(100, false).write_startup(&mut out).unwrap();
        assert_eq!(out, "stepper-homing ready\n");
    }

    #[test]
    fn test_cadence() {
        let mut reporter = Reporter::new(100, true);
        let mut out = String::new();

        assert!(reporter.report(&mut out, 0, Degrees(0.0)).unwrap());
        assert!(!reporter.report(&mut out, 99, Degrees(1.0)).unwrap());
        assert!(reporter.report(&mut out, 100, Degrees(90.0)).unwrap());

        assert_eq!(out, "0,0.00\n100,90.00\n");
    }

    #[test]
    fn test_reset_reports_immediately() {
        let mut reporter = Reporter::new(1000, true);
        let mut out = String::new();
        reporter.report(&mut out, 10, Degrees(0.0)).unwrap();
        reporter.reset();
        assert!(reporter.report(&mut out, 11, Degrees(0.0)).unwrap());
    }
}
