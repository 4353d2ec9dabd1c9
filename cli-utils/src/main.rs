//! Run the blink logic on the host.
//!
//! Bytes typed on stdin are delivered as serial commands, replies are
//! written to stdout and LED transitions are logged to stderr.
//!
//!     $ echo "+++" | cargo run --bin blinky-sim
//!     $ RUST_LOG=debug cargo run --bin blinky-sim -- --tick-hz 1000

use std::{io, sync::mpsc};

use anyhow::{ensure, Context, Result};
use blinky_serial_common::{blink::Blinker, config::TICK_HZ};
use clap::Parser;

mod sim;

use sim::{SimLed, SimTicks};

#[derive(Parser)]
struct Opts {
    /// Frequency of the simulated timer tick in Hz.
    #[clap(short, long, default_value_t = TICK_HZ)]
    tick_hz: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts: Opts = Opts::parse();
    ensure!(opts.tick_hz > 0, "Tick rate must not be zero");

    let (sender, receiver) = mpsc::channel();

    sim::spawn_reader(io::stdin(), sender.clone());
    let ticks = SimTicks::default();
    let enabled = ticks.enabled_flag();
    let mut blinker = Blinker::init(SimLed::default(), ticks);
    sim::spawn_ticker(opts.tick_hz, enabled, sender);

    log::info!("Simulating at {} Hz, commands: + - 0", opts.tick_hz);
    let stdout = io::stdout();
    sim::run(&mut blinker, receiver, &mut stdout.lock()).context("Could not write reply")?;
    Ok(())
}
