//! The periodic blink tick, driven by TIM2.

use blinky_serial_common::blink::TickSource;
use cortex_m::peripheral::NVIC;
use stm32l0xx_hal::{pac, timer::Timer};

/// TIM2 running at the base tick rate.
///
/// The timer is never stopped, starting and stopping the notification only
/// toggles the update interrupt.
pub struct TickTimer {
    timer: Timer<pac::TIM2>,
}

impl TickTimer {
    pub fn new(timer: Timer<pac::TIM2>) -> Self {
        Self { timer }
    }

    /// Acknowledge the update interrupt.
    pub fn clear_irq(&mut self) {
        self.timer.clear_irq();
    }
}

impl TickSource for TickTimer {
    fn start_notification(&mut self) {
        // The update flag kept being set while the interrupt was disabled
        self.timer.clear_irq();
        self.timer.listen();
    }

    fn stop_notification(&mut self) {
        self.timer.unlisten();

        // A tick may already be pending if it became due while the USART1
        // task was running
        self.timer.clear_irq();
        NVIC::unpend(pac::Interrupt::TIM2);
    }
}
