#![cfg_attr(not(test), no_std)]
//! # Blinky Serial Core
//!
//! Hardware independent part of the blinky-serial firmware. An LED blinks
//! with a half-period taken from a fixed rate table. The rate is changed
//! through single character commands received on a serial port:
//!
//! ```text
//! +-------+------------------------------------------+--------+
//! | Byte  | Effect                                   | Reply  |
//! +-------+------------------------------------------+--------+
//! | `+`   | Blink faster, switch the LED back on     | `OK\n` |
//! | `-`   | Blink slower, switch the LED back on     | `OK\n` |
//! | `0`   | Stop blinking, LED off                   | `OK\n` |
//! | CR/LF | Ignored                                  |        |
//! | other | Rejected                                 | `?\n`  |
//! +-------+------------------------------------------+--------+
//! ```
//!
//! The timer tick and the serial receive interrupt both act on the same
//! [`Blinker`](blink::Blinker). They must be delivered at the same interrupt
//! priority, so that one handler never preempts the other.

pub mod blink;
pub mod command;
pub mod config;
pub mod input;
pub mod rate;
