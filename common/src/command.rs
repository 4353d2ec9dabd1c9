//! Serial command protocol.
//!
//! Every command is a single byte. Commands are case sensitive and there is
//! no line buffering, carriage return and line feed are accepted (and
//! ignored) so that a terminal can be used as-is.

use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `+`: Blink faster, switch the LED on if it was stopped.
    SpeedUp,
    /// `-`: Blink slower, switch the LED on if it was stopped.
    SlowDown,
    /// `0`: Stop blinking and switch the LED off.
    Stop,
    /// `\r` or `\n`: Nothing to do.
    EndOfLine,
}

/// A byte that is not part of the command set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownCommand(pub u8);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown command byte 0x{:02x}", self.0)
    }
}

impl TryFrom<u8> for Command {
    type Error = UnknownCommand;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'+' => Ok(Self::SpeedUp),
            b'-' => Ok(Self::SlowDown),
            b'0' => Ok(Self::Stop),
            b'\r' | b'\n' => Ok(Self::EndOfLine),
            other => Err(UnknownCommand(other)),
        }
    }
}

/// Reply written back after a command byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// The command was executed.
    Ok,
    /// The byte was not a command.
    Unknown,
}

impl Reply {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK\n",
            Self::Unknown => "?\n",
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
