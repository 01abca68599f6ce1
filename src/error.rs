//! Error types for stepper-homing.
//!
//! Provides unified error handling across configuration, motor control and homing.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-homing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motor or probe hardware error
    Motor(MotorError),
    /// Homing session error
    Homing(HomingError),
    /// Writing a status line to the output failed
    Output,
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Base steps per revolution must be > 0
    InvalidStepsPerRevolution(u16),
    /// Invalid gear ratio (must be > 0)
    InvalidGearRatio(f32),
    /// Step pulse high or low time must be > 0
    InvalidPulseWidth(u32),
    /// Invalid max speed (must be > 0)
    InvalidMaxSpeed(f32),
    /// Invalid acceleration (must be > 0)
    InvalidAcceleration(f32),
    /// Report interval must be > 0
    InvalidReportInterval(u32),
    /// Serial baud rate must be > 0
    InvalidBaudRate(u32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor and probe hardware errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// STEP or DIR pin operation failed
    PinError,
    /// Probe input could not be read
    ProbeError,
    /// The motor is currently owned by a homing session
    NotAvailable,
}

/// Homing session errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HomingError {
    /// The homing worker panicked; the motor it owned is gone
    WorkerPanicked,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Homing(e) => write!(f, "Homing error: {}", e),
            Error::Output => write!(f, "Output write failed"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::InvalidGearRatio(v) => write!(f, "Invalid gear ratio: {}. Must be > 0", v),
            ConfigError::InvalidPulseWidth(v) => write!(f, "Invalid pulse width: {} us. Must be > 0", v),
            ConfigError::InvalidMaxSpeed(v) => write!(f, "Invalid max speed: {}. Must be > 0", v),
            ConfigError::InvalidAcceleration(v) => write!(f, "Invalid acceleration: {}. Must be > 0", v),
            ConfigError::InvalidReportInterval(v) => {
                write!(f, "Invalid report interval: {} ms. Must be > 0", v)
            }
            ConfigError::InvalidBaudRate(v) => write!(f, "Invalid baud rate: {}. Must be > 0", v),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::ProbeError => write!(f, "Probe input read failed"),
            MotorError::NotAvailable => write!(f, "Motor is owned by a homing session"),
        }
    }
}

impl fmt::Display for HomingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomingError::WorkerPanicked => write!(f, "Homing worker panicked"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<HomingError> for Error {
    fn from(e: HomingError) -> Self {
        Error::Homing(e)
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Error::Output
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for HomingError {}
