//! Serial command parsing.
//!
//! One byte at a time, as it arrives on the link:
//!
//! | Input    | Command                     |
//! |----------|-----------------------------|
//! | `S<int>` | set speed in steps/s        |
//! | `T`      | toggle direction inversion  |
//! | `X`      | stop                        |
//! | `L`      | start homing                |
//!
//! Anything else is ignored.

use heapless::Vec;

/// A decoded serial command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Run at this signed speed in steps per second.
    SetSpeed(i32),
    /// Flip the direction inversion setting.
    ToggleDirection,
    /// Ramp down to a standstill.
    Stop,
    /// Start homing against the probe.
    Home,
}

impl Command {
    /// Decode a single-byte command. `S` needs a number and is not handled here.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'T' => Some(Command::ToggleDirection),
            b'X' => Some(Command::Stop),
            b'L' => Some(Command::Home),
            _ => None,
        }
    }
}

/// Commands produced by one input byte. A letter that ends a speed number
/// yields the speed and then its own command.
pub type Parsed = Vec<Command, 2>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ParseState {
    #[default]
    Ready,
    Speed {
        magnitude: i32,
        negative: bool,
        digits: u8,
    },
}

/// Incremental parser for the serial command stream.
#[derive(Debug, Clone, Default)]
pub struct CommandParser {
    state: ParseState,
}

impl CommandParser {
    /// Create a parser waiting for a command letter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a speed number is being read.
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, ParseState::Speed { .. })
    }

    /// Feed one byte.
    pub fn push(&mut self, byte: u8) -> Parsed {
        let mut out = Parsed::new();

        if let ParseState::Speed {
            magnitude,
            negative,
            digits,
        } = self.state
        {
            match byte {
                b'0'..=b'9' => {
                    let digit = i32::from(byte - b'0');
                    self.state = ParseState::Speed {
                        magnitude: magnitude.saturating_mul(10).saturating_add(digit),
                        negative,
                        digits: digits.saturating_add(1),
                    };
                    return out;
                }
                b'-' if digits == 0 && !negative => {
                    self.state = ParseState::Speed {
                        magnitude,
                        negative: true,
                        digits,
                    };
                    return out;
                }
                b' ' | b'\t' if digits == 0 => return out,
                _ => {
                    // Any other byte ends the number; no digits reads as 0
                    let _ = out.push(Command::SetSpeed(signed(magnitude, negative)));
                    self.state = ParseState::Ready;
                }
            }
        }

        if byte == b'S' {
            self.state = ParseState::Speed {
                magnitude: 0,
                negative: false,
                digits: 0,
            };
        } else if let Some(command) = Command::from_byte(byte) {
            let _ = out.push(command);
        }

        out
    }

    /// End a pending speed number, e.g. when the line goes quiet.
    pub fn flush(&mut self) -> Option<Command> {
        match core::mem::take(&mut self.state) {
            ParseState::Speed {
                magnitude,
                negative,
                ..
            } => Some(Command::SetSpeed(signed(magnitude, negative))),
            ParseState::Ready => None,
        }
    }

    /// Feed a buffer, passing every decoded command to `f`.
    pub fn feed<F>(&mut self, bytes: &[u8], mut f: F)
    where
        F: FnMut(Command),
    {
        for &byte in bytes {
            for command in self.push(byte) {
                f(command);
            }
        }
    }
}

fn signed(magnitude: i32, negative: bool) -> i32 {
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
