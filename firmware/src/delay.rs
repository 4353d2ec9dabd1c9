//! Blocking delay using TIM7.
//!
//! RTIC takes ownership of SYST, so the debounce wait in the idle loop uses
//! the basic timer TIM7 in one-pulse mode instead of the HAL delay.

use embedded_hal::blocking::delay::DelayMs;
use stm32l0xx_hal::pac;

/// Counter clock of 2 kHz at a 16 MHz core clock (HSI16).
const PRESCALER: u16 = 16_000 / 2 - 1;

/// Counter ticks per millisecond at [`PRESCALER`].
const TICKS_PER_MS: u16 = 2;

/// Longest delay that fits into a single timer run.
const MAX_CHUNK_MS: u16 = u16::MAX / TICKS_PER_MS;

pub struct Tim7Delay {
    tim7: pac::TIM7,
}

impl Tim7Delay {
    /// Enable and reset TIM7.
    ///
    /// Must be called before the RCC is frozen, since it needs the raw RCC
    /// register block.
    pub fn new(tim7: pac::TIM7, rcc: &mut pac::RCC) -> Self {
        rcc.apb1enr.modify(|_, w| w.tim7en().set_bit());
        rcc.apb1rstr.modify(|_, w| w.tim7rst().set_bit());
        rcc.apb1rstr.modify(|_, w| w.tim7rst().clear_bit());

        // One-pulse mode: the counter stops at the next update event and
        // clears the CEN bit
        tim7.cr1.modify(|_, w| w.opm().enabled());

        Self { tim7 }
    }

    /// Run the counter once for `ticks` ticks (at least 2) and wait for it.
    fn run(&mut self, ticks: u16) {
        self.tim7.psc.write(|w| w.psc().bits(PRESCALER));

        // The update event fires *after* the ARR tick
        self.tim7
            .arr
            .write(|w| unsafe { w.arr().bits(ticks.max(2) - 1) });

        // Trigger an update event to load the prescaler
        self.tim7.egr.write(|w| w.ug().set_bit());

        self.tim7.cr1.modify(|_, w| w.cen().set_bit());
        while self.tim7.cr1.read().cen().is_enabled() { /* wait */ }
    }
}

impl DelayMs<u16> for Tim7Delay {
    fn delay_ms(&mut self, mut ms: u16) {
        while ms > 0 {
            let chunk = ms.min(MAX_CHUNK_MS);
            self.run(chunk * TICKS_PER_MS);
            ms -= chunk;
        }
    }
}
