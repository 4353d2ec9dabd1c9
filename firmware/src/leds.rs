//! Controlling the board LED.

use blinky_serial_common::blink::Led;
use stm32l0xx_hal::{
    gpio::{Output, Pin, PushPull},
    prelude::*,
};

/// The blinking LED on PB5.
pub struct BoardLed {
    pin: Pin<Output<PushPull>>,
    /// Current pin level
    lit: bool,
}

impl BoardLed {
    /// Take the LED pin, initially switched off.
    pub fn new(mut pin: Pin<Output<PushPull>>) -> Self {
        pin.set_low().ok();
        Self { pin, lit: false }
    }
}

impl Led for BoardLed {
    fn on(&mut self) {
        self.pin.set_high().ok();
        self.lit = true;
    }

    fn off(&mut self) {
        self.pin.set_low().ok();
        self.lit = false;
    }

    fn toggle(&mut self) {
        if self.lit {
            self.off();
        } else {
            self.on();
        }
    }
}
