#![no_main]
#![no_std]
#![cfg(target_arch = "arm")]

// Libcore
use core::fmt::Write;

// Third party
use embedded_hal::{blocking::delay::DelayMs, serial::Read};
use panic_persist as _;
use stm32l0xx_hal::prelude::*;
use stm32l0xx_hal::{self as hal, pac, serial, time};

// First party crates
use blinky_serial_common::blink::{Blinker, ByteHandler, TickHandler};
use blinky_serial_common::config::{BAUD_RATE, DEBOUNCE_MS, TICK_HZ};
use blinky_serial_common::input::PortMonitor;

// Modules
mod buttons;
mod delay;
mod leds;
mod tick;

// Crate-internal
use buttons::ButtonPort;
use delay::Tim7Delay;
use leds::BoardLed;
use tick::TickTimer;

const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[rtic::app(device = stm32l0xx_hal::pac, peripherals = true)]
mod app {
    use super::*;

    #[shared]
    struct Shared {
        // Blink state, LED and tick control. Only touched by the TIM2 and
        // USART1 tasks, which run at the same priority.
        #[lock_free]
        blinker: Blinker<BoardLed, TickTimer>,

        // Serial command replies (and debug output)
        tx: serial::Tx<pac::USART1>,
    }

    #[local]
    struct Local {
        rx: serial::Rx<pac::USART1>,
        buttons: ButtonPort,
        delay: Tim7Delay,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut dp: pac::Peripherals = ctx.device;

        // Init delay timer
        let delay = Tim7Delay::new(dp.TIM7, &mut dp.RCC);

        // Clock configuration. Use HSI at 16 MHz.
        let mut rcc = dp.RCC.freeze(hal::rcc::Config::hsi16());

        // Get access to GPIOs
        let gpioa = dp.GPIOA.split(&mut rcc);
        let gpiob = dp.GPIOB.split(&mut rcc);

        // LED output and (unused) button inputs
        let led = BoardLed::new(gpiob.pb5.into_push_pull_output().downgrade());
        let buttons = ButtonPort::new(
            gpioa.pa0.into_pull_up_input().downgrade(),
            gpioa.pa1.into_pull_up_input().downgrade(),
            gpioa.pa2.into_pull_up_input().downgrade(),
        );

        // Initialize the command serial port, interrupt on every received byte
        let mut serial = serial::Serial::usart1(
            dp.USART1,
            gpiob.pb6.into_floating_input(),
            gpiob.pb7.into_floating_input(),
            serial::Config {
                baudrate: time::Bps(BAUD_RATE),
                wordlength: serial::WordLength::DataBits8,
                parity: serial::Parity::ParityNone,
                stopbits: serial::StopBits::STOP1,
            },
            &mut rcc,
        )
        .expect("Could not initialize USART1");
        serial.listen(serial::Event::Rxne);
        let (mut tx, rx) = serial.split();

        if cfg!(feature = "dev") {
            writeln!(tx, "Booting: blinky-serial firmware={}", FIRMWARE_VERSION).ok();
        }

        // Check whether we just woke up after a panic
        if let Some(msg) = panic_persist::get_panic_message_utf8() {
            // If yes, send backtrace via serial
            writeln!(tx, "=== 🔥 FOUND PANIC 🔥 ===").ok();
            writeln!(tx, "{}", msg.trim_end()).ok();
            writeln!(tx, "==== 🚒 END PANIC 🚒 ====").ok();
        }

        // Start the blink tick. The update interrupt is enabled by the
        // blinker, the first tick switches the LED on.
        let timer = dp.TIM2.timer(TICK_HZ.hz(), &mut rcc);
        let blinker = Blinker::init(led, TickTimer::new(timer));

        if cfg!(feature = "dev") {
            writeln!(tx, "Initialization done").ok();
        }

        (
            Shared { blinker, tx },
            Local { rx, buttons, delay },
            init::Monotonics(),
        )
    }

    /// Watch the button inputs.
    ///
    /// Buttons have no function yet. A change is only detected, followed by
    /// a debounce wait before the port is read again.
    #[idle(shared = [tx], local = [buttons, delay])]
    fn idle(mut ctx: idle::Context) -> ! {
        let buttons = ctx.local.buttons;
        let delay = ctx.local.delay;

        let mut monitor = PortMonitor::new(buttons.read());
        loop {
            if let Some(changed) = monitor.update(buttons.read()) {
                if cfg!(feature = "dev") {
                    let port = monitor.last();
                    ctx.shared.tx.lock(|tx| {
                        writeln!(tx, "Input: port={:03b} changed={:03b}", port, changed).ok();
                    });
                }
                delay.delay_ms(DEBOUNCE_MS);
            }
        }
    }

    /// Blink tick.
    #[task(binds = TIM2, shared = [blinker], priority = 1)]
    fn tim2(ctx: tim2::Context) {
        let blinker = ctx.shared.blinker;
        blinker.ticks_mut().clear_irq();
        blinker.on_tick();
    }

    /// Command byte received.
    #[task(binds = USART1, shared = [blinker, tx], local = [rx], priority = 1)]
    fn usart1(mut ctx: usart1::Context) {
        // Reading the data register clears the RXNE flag. Errors (e.g.
        // overrun) are cleared by the HAL and the byte is dropped.
        let byte = match ctx.local.rx.read() {
            Ok(byte) => byte,
            Err(_) => return,
        };

        if let Some(reply) = ctx.shared.blinker.on_byte(byte) {
            ctx.shared.tx.lock(|tx| {
                tx.write_str(reply.as_str()).ok();
            });
        }
    }
}
