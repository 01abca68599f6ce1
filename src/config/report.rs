//! Status reporting and serial link configuration.

use serde::Deserialize;

/// Default cadence of angle status lines.
pub const DEFAULT_REPORT_INTERVAL_MS: u32 = 100;

/// Default serial link speed, matching the host tooling.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Periodic angle reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Minimum time between two status lines.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u32,

    /// Emit a CSV header after the startup banner.
    #[serde(default = "default_header")]
    pub header: bool,
}

fn default_interval_ms() -> u32 {
    DEFAULT_REPORT_INTERVAL_MS
}

fn default_header() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_REPORT_INTERVAL_MS,
            header: true,
        }
    }
}

/// Serial link parameters. The link itself is owned by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SerialConfig {
    /// Baud rate the host expects.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}
