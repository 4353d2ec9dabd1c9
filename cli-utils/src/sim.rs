//! Host side stand-ins for the timer, the LED and the serial port.
//!
//! Interrupts are modelled as events on a single channel. The consumer
//! applies one event at a time, so every handler invocation runs to
//! completion before the next one starts, like two interrupts at the same
//! priority.

use std::{
    io::{self, Read, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use blinky_serial_common::blink::{Blinker, ByteHandler, Led, TickHandler, TickSource};
use log::{debug, info};

/// A simulated interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Timer tick
    Tick,
    /// Byte received on the serial port
    Byte(u8),
    /// The serial port was closed
    Hangup,
}

/// LED that logs its transitions.
#[derive(Debug, Default)]
pub struct SimLed {
    lit: bool,
    toggles: u64,
}

impl SimLed {
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn toggles(&self) -> u64 {
        self.toggles
    }

    fn set(&mut self, lit: bool) {
        if lit != self.lit {
            info!("LED {}", if lit { "on" } else { "off" });
        }
        self.lit = lit;
    }
}

impl Led for SimLed {
    fn on(&mut self) {
        self.set(true);
    }

    fn off(&mut self) {
        self.set(false);
    }

    fn toggle(&mut self) {
        self.toggles += 1;
        self.set(!self.lit);
    }
}

/// Tick notification switch, shared with the ticker thread.
#[derive(Debug, Default)]
pub struct SimTicks {
    enabled: Arc<AtomicBool>,
}

impl SimTicks {
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// The flag checked by [`spawn_ticker`].
    pub fn enabled_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.enabled)
    }
}

impl TickSource for SimTicks {
    fn start_notification(&mut self) {
        debug!("Tick notification started");
        self.enabled.store(true, Ordering::SeqCst);
    }

    fn stop_notification(&mut self) {
        debug!("Tick notification stopped");
        self.enabled.store(false, Ordering::SeqCst);
    }
}

pub type SimBlinker = Blinker<SimLed, SimTicks>;

/// Generate `tick_hz` ticks per second while `enabled` is set.
///
/// Ticks are sent in bursts every millisecond, catching up with the wall
/// clock. Ticks that fall into a period with notifications disabled are
/// dropped. The thread ends when the receiver is gone.
pub fn spawn_ticker(
    tick_hz: u32,
    enabled: Arc<AtomicBool>,
    events: Sender<Event>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let start = Instant::now();
        let mut elapsed_ticks: u128 = 0;
        loop {
            thread::sleep(Duration::from_millis(1));
            let due = start.elapsed().as_micros() * u128::from(tick_hz) / 1_000_000;
            while elapsed_ticks < due {
                elapsed_ticks += 1;
                if enabled.load(Ordering::SeqCst) && events.send(Event::Tick).is_err() {
                    return;
                }
            }
        }
    })
}

/// Forward every byte read from `input` as an [`Event::Byte`], followed by
/// [`Event::Hangup`] at the end of the input.
pub fn spawn_reader<R: Read + Send + 'static>(input: R, events: Sender<Event>) {
    thread::spawn(move || {
        for byte in input.bytes() {
            match byte {
                Ok(byte) => {
                    if events.send(Event::Byte(byte)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::error!("Could not read input: {}", e);
                    break;
                }
            }
        }
        events.send(Event::Hangup).ok();
    });
}

/// Deliver events to the blinker until hangup, write replies to `out`.
///
/// A tick that is still queued when the notification gets stopped is not
/// delivered anymore.
pub fn run(
    blinker: &mut SimBlinker,
    events: Receiver<Event>,
    out: &mut impl Write,
) -> io::Result<()> {
    for event in events {
        match event {
            Event::Tick => {
                if blinker.ticks().is_enabled() {
                    blinker.on_tick();
                }
            }
            Event::Byte(byte) => {
                let reply = blinker.on_byte(byte);
                debug!("Received 0x{:02x}, state {:?}", byte, blinker.state());
                if let Some(reply) = reply {
                    out.write_all(reply.as_bytes())?;
                    out.flush()?;
                }
            }
            Event::Hangup => break,
        }
    }
    Ok(())
}
