//! Change detection on the input port.
//!
//! The three input pins are reserved for push buttons. Nothing acts on them
//! yet, the idle loop only detects changes and waits for the contacts to
//! settle.

use crate::config::INPUT_MASK;

/// Remembers the last reading of the input port.
#[derive(Debug)]
pub struct PortMonitor {
    last: u8,
}

impl PortMonitor {
    /// Create a monitor from an initial port reading.
    pub fn new(initial: u8) -> Self {
        Self {
            last: initial & INPUT_MASK,
        }
    }

    /// The last reading (masked to the input pins).
    pub fn last(&self) -> u8 {
        self.last
    }

    /// Feed a new port reading.
    ///
    /// Returns the mask of pins that changed since the previous reading, or
    /// `None` if nothing changed. Bits outside the input mask are ignored.
    pub fn update(&mut self, value: u8) -> Option<u8> {
        let value = value & INPUT_MASK;
        let changed = value ^ self.last;
        if changed == 0 {
            return None;
        }
        self.last = value;
        Some(changed)
    }
}
