//! Compile-time configuration.
//!
//! There is no runtime configuration, all parameters are baked into the
//! firmware.

/// Baudrate of the command serial port (8N1).
pub const BAUD_RATE: u32 = 115_200;

/// Frequency of the timer tick in Hz.
///
/// Matches the overflow rate of an 8-bit counter clocked at 16 MHz / 8, so
/// the rate table values translate to the same blink periods.
pub const TICK_HZ: u32 = 7_812;

/// Pin mask of the LED on the output port (pin 5).
pub const LED_MASK: u8 = 0x20;

/// Pin mask of the three input pins on the input port (pins 0-2).
pub const INPUT_MASK: u8 = 0x07;

/// Time to wait after an input port change before reading the port again.
pub const DEBOUNCE_MS: u16 = 100;
