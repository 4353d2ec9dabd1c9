//! Reading the (unused) push button inputs.

use bitfield::Bit;
use stm32l0xx_hal::gpio::{Input, Pin, PullUp};
use stm32l0xx_hal::prelude::*;

/// The three button inputs PA0, PA1 and PA2, with pull-ups enabled.
pub struct ButtonPort {
    pins: [Pin<Input<PullUp>>; 3],
}

impl ButtonPort {
    pub fn new(
        pa0: Pin<Input<PullUp>>,
        pa1: Pin<Input<PullUp>>,
        pa2: Pin<Input<PullUp>>,
    ) -> Self {
        Self {
            pins: [pa0, pa1, pa2],
        }
    }

    /// Read the port, bit n is the level of pin n.
    ///
    /// A released button reads high.
    pub fn read(&self) -> u8 {
        let mut value = 0u8;
        for (i, pin) in self.pins.iter().enumerate() {
            value.set_bit(i, pin.is_high().unwrap_or(false));
        }
        value
    }
}
