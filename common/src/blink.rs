//! The blink state machine driven by the timer and serial interrupts.

use crate::command::{Command, Reply};
use crate::rate::RateIndex;

/// An LED output.
pub trait Led {
    fn on(&mut self);
    fn off(&mut self);
    fn toggle(&mut self);
}

/// Controls whether timer ticks are delivered to the tick handler.
pub trait TickSource {
    /// (Re-)enable tick notifications.
    fn start_notification(&mut self);
    /// Stop tick notifications, the timer itself keeps running.
    fn stop_notification(&mut self);
}

/// Handler for the periodic timer tick.
pub trait TickHandler {
    fn on_tick(&mut self);
}

/// Handler for bytes received on the serial port.
pub trait ByteHandler {
    /// Handle a single received byte, return the reply to send (if any).
    fn on_byte(&mut self, byte: u8) -> Option<Reply>;
}

/// State shared between the tick and the byte handler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlinkState {
    /// Ticks left until the next LED toggle.
    countdown: u16,
    /// Cached copy of `index.period()`, updated whenever the index changes.
    period: u16,
    index: RateIndex,
    led_on: bool,
}

impl BlinkState {
    fn new() -> Self {
        let index = RateIndex::SLOWEST;
        Self {
            countdown: 0,
            period: index.period(),
            index,
            led_on: true,
        }
    }

    /// Ticks left until the next LED toggle.
    pub fn countdown(&self) -> u16 {
        self.countdown
    }

    /// Current blink half-period in ticks.
    pub fn period(&self) -> u16 {
        self.period
    }

    /// Current position in the rate table.
    pub fn index(&self) -> RateIndex {
        self.index
    }

    /// Whether the LED is blinking (`true`) or stopped (`false`).
    pub fn led_on(&self) -> bool {
        self.led_on
    }

    /// Load the period of the current index and restart the countdown.
    fn reload_period(&mut self) {
        self.period = self.index.period();
        self.countdown = self.period;
    }
}

/// Owns the LED, the tick notification and the [`BlinkState`].
pub struct Blinker<L, T> {
    led: L,
    ticks: T,
    state: BlinkState,
}

impl<L: Led, T: TickSource> Blinker<L, T> {
    /// Set up the blink state at the slowest rate and register for tick
    /// notifications.
    ///
    /// The countdown starts at zero, the first tick toggles the LED.
    pub fn init(led: L, mut ticks: T) -> Self {
        ticks.start_notification();
        Self {
            led,
            ticks,
            state: BlinkState::new(),
        }
    }

    pub fn state(&self) -> &BlinkState {
        &self.state
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    pub fn ticks_mut(&mut self) -> &mut T {
        &mut self.ticks
    }

    /// Execute a parsed command.
    fn execute(&mut self, command: Command) {
        match command {
            Command::SpeedUp => {
                self.ensure_running();
                if self.state.index.faster() {
                    self.state.reload_period();
                }
            }
            Command::SlowDown => {
                self.ensure_running();
                if self.state.index.slower() {
                    self.state.reload_period();
                }
            }
            Command::Stop => {
                self.ticks.stop_notification();
                self.led.off();
                self.state.led_on = false;
            }
            Command::EndOfLine => {}
        }
    }

    /// Switch a stopped LED back on.
    ///
    /// The countdown is left as it was when the LED was stopped, only an
    /// index change reloads it.
    fn ensure_running(&mut self) {
        if !self.state.led_on {
            self.state.led_on = true;
            self.led.on();
            self.ticks.start_notification();
        }
    }
}

impl<L: Led, T: TickSource> TickHandler for Blinker<L, T> {
    /// A tick that was already pending when the LED got stopped is ignored.
    fn on_tick(&mut self) {
        if !self.state.led_on {
            return;
        }
        self.state.countdown = self.state.countdown.saturating_sub(1);
        if self.state.countdown == 0 {
            self.led.toggle();
            self.state.countdown = self.state.period;
        }
    }
}

impl<L: Led, T: TickSource> ByteHandler for Blinker<L, T> {
    fn on_byte(&mut self, byte: u8) -> Option<Reply> {
        match Command::try_from(byte) {
            Ok(Command::EndOfLine) => None,
            Ok(command) => {
                self.execute(command);
                Some(Reply::Ok)
            }
            Err(_) => Some(Reply::Unknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[derive(Default, Debug)]
    struct FakeLed {
        lit: bool,
        toggles: usize,
    }

    impl Led for FakeLed {
        fn on(&mut self) {
            self.lit = true;
        }

        fn off(&mut self) {
            self.lit = false;
        }

        fn toggle(&mut self) {
            self.lit = !self.lit;
            self.toggles += 1;
        }
    }

    #[derive(Default, Debug)]
    struct FakeTicks {
        enabled: bool,
        starts: usize,
    }

    impl TickSource for FakeTicks {
        fn start_notification(&mut self) {
            self.enabled = true;
            self.starts += 1;
        }

        fn stop_notification(&mut self) {
            self.enabled = false;
        }
    }

    fn blinker() -> Blinker<FakeLed, FakeTicks> {
        Blinker::init(FakeLed::default(), FakeTicks::default())
    }

    fn send(blinker: &mut Blinker<FakeLed, FakeTicks>, bytes: &[u8]) -> Vec<Option<Reply>> {
        bytes.iter().map(|b| blinker.on_byte(*b)).collect()
    }

    #[test]
    fn test_init() {
        let blinker = blinker();
        let state = blinker.state();
        assert_eq!(state.index(), RateIndex::SLOWEST);
        assert_eq!(state.period(), 16000);
        assert_eq!(state.countdown(), 0);
        assert!(state.led_on());
        assert!(blinker.ticks().enabled);
        assert_eq!(blinker.ticks().starts, 1);
    }

    #[test]
    fn test_first_tick_toggles() {
        let mut blinker = blinker();
        blinker.on_tick();
        assert_eq!(blinker.led().toggles, 1);
        assert!(blinker.led().lit);
        assert_eq!(blinker.state().countdown(), 16000);
    }

    #[test]
    fn test_toggle_every_period() {
        let mut blinker = blinker();
        blinker.on_tick();
        for _ in 0..15999 {
            blinker.on_tick();
        }
        assert_eq!(blinker.led().toggles, 1);
        blinker.on_tick();
        assert_eq!(blinker.led().toggles, 2);
        assert!(!blinker.led().lit);
        assert_eq!(blinker.state().countdown(), 16000);
    }

    #[test]
    fn test_speed_up_saturates() {
        let mut blinker = blinker();
        for expected in 1..=6 {
            assert_eq!(blinker.on_byte(b'+'), Some(Reply::Ok));
            assert_eq!(blinker.state().index().as_usize(), expected);
        }
        assert_eq!(blinker.on_byte(b'+'), Some(Reply::Ok));
        assert_eq!(blinker.state().index(), RateIndex::FASTEST);
        assert_eq!(blinker.state().period(), 1600);
    }

    #[test]
    fn test_slow_down_saturates() {
        let mut blinker = blinker();
        send(&mut blinker, b"+++");
        for expected in (0..=2).rev() {
            assert_eq!(blinker.on_byte(b'-'), Some(Reply::Ok));
            assert_eq!(blinker.state().index().as_usize(), expected);
        }
        assert_eq!(blinker.on_byte(b'-'), Some(Reply::Ok));
        assert_eq!(blinker.state().index(), RateIndex::SLOWEST);
        assert_eq!(blinker.state().period(), 16000);
    }

    #[test]
    fn test_index_change_reloads_countdown() {
        let mut blinker = blinker();
        blinker.on_tick();
        blinker.on_tick();
        assert_eq!(blinker.state().countdown(), 15999);
        blinker.on_byte(b'+');
        assert_eq!(blinker.state().period(), 8000);
        assert_eq!(blinker.state().countdown(), 8000);
    }

    #[test]
    fn test_saturated_press_keeps_countdown() {
        let mut blinker = blinker();
        blinker.on_tick();
        blinker.on_tick();
        blinker.on_byte(b'-');
        assert_eq!(blinker.state().countdown(), 15999);
    }

    #[test]
    fn test_end_to_end_speed_up() {
        let mut blinker = blinker();
        assert_eq!(send(&mut blinker, b"+++++"), vec![Some(Reply::Ok); 5]);
        assert_eq!(blinker.state().index().as_usize(), 5);
        assert_eq!(blinker.state().period(), 2000);
        assert_eq!(send(&mut blinker, b"++"), vec![Some(Reply::Ok); 2]);
        assert_eq!(blinker.state().index().as_usize(), 6);
        assert_eq!(blinker.state().period(), 1600);
    }

    #[test]
    fn test_stop() {
        let mut blinker = blinker();
        blinker.on_tick();
        assert!(blinker.led().lit);
        assert_eq!(blinker.on_byte(b'0'), Some(Reply::Ok));
        assert!(!blinker.state().led_on());
        assert!(!blinker.led().lit);
        assert!(!blinker.ticks().enabled);
    }

    #[test]
    fn test_stop_twice() {
        let mut blinker = blinker();
        send(&mut blinker, b"++");
        assert_eq!(blinker.on_byte(b'0'), Some(Reply::Ok));
        let state = *blinker.state();
        assert_eq!(blinker.on_byte(b'0'), Some(Reply::Ok));
        assert_eq!(*blinker.state(), state);
        assert!(!blinker.ticks().enabled);
    }

    #[rstest]
    #[case(b'+')]
    #[case(b'-')]
    fn test_restart_after_stop(#[case] byte: u8) {
        let mut blinker = blinker();
        blinker.on_byte(b'0');
        assert_eq!(blinker.on_byte(byte), Some(Reply::Ok));
        assert!(blinker.state().led_on());
        assert!(blinker.led().lit);
        assert!(blinker.ticks().enabled);
        assert_eq!(blinker.ticks().starts, 2);
    }

    #[test]
    fn test_restart_keeps_stale_countdown() {
        let mut blinker = blinker();
        blinker.on_tick();
        for _ in 0..10 {
            blinker.on_tick();
        }
        blinker.on_byte(b'0');
        blinker.on_byte(b'-');
        assert_eq!(blinker.state().index(), RateIndex::SLOWEST);
        assert_eq!(blinker.state().countdown(), 15990);
    }

    #[test]
    fn test_stop_unknown_restart() {
        let mut blinker = blinker();
        send(&mut blinker, b"++");
        let replies = send(&mut blinker, b"0z+");
        assert_eq!(
            replies,
            vec![Some(Reply::Ok), Some(Reply::Unknown), Some(Reply::Ok)]
        );
        assert!(blinker.state().led_on());
        assert!(blinker.ticks().enabled);
        assert_eq!(blinker.state().index().as_usize(), 3);
    }

    #[rstest]
    #[case(b'a')]
    #[case(b'9')]
    #[case(b' ')]
    #[case(b'Z')]
    fn test_unknown_byte(#[case] byte: u8) {
        let mut blinker = blinker();
        blinker.on_byte(b'+');
        let state = *blinker.state();
        assert_eq!(blinker.on_byte(byte), Some(Reply::Unknown));
        assert_eq!(*blinker.state(), state);
    }

    #[test]
    fn test_pending_tick_after_stop_keeps_led_off() {
        let mut blinker = blinker();
        // Run until the next tick would toggle the LED
        for _ in 0..16000 {
            blinker.on_tick();
        }
        assert_eq!(blinker.state().countdown(), 1);
        blinker.on_byte(b'0');
        blinker.on_tick();
        assert!(!blinker.led().lit);
        assert!(!blinker.state().led_on());
        assert_eq!(blinker.state().countdown(), 1);
        assert_eq!(blinker.led().toggles, 1);
    }

    #[rstest]
    #[case(b'\n')]
    #[case(b'\r')]
    fn test_end_of_line_ignored(#[case] byte: u8) {
        let mut blinker = blinker();
        blinker.on_byte(b'0');
        let state = *blinker.state();
        assert_eq!(blinker.on_byte(byte), None);
        assert_eq!(*blinker.state(), state);
        assert!(!blinker.ticks().enabled);
    }
}
