//! Switch channel state
//!
//! Switches are wired active-low against the internal pull-up. The tick
//! scheduler latches the time a line first reads active and clears it the
//! moment the line reads inactive; callers decide how long a press has to
//! be held to count.

use portable_atomic::{AtomicU32, Ordering};
use tickbot_hal::Clock;

/// Timestamp value meaning "not pressed"
pub const RELEASED: u32 = u32::MAX;

/// One debounced switch input
#[derive(Debug)]
pub struct SwitchChannel {
    pin: u8,
    /// Monotonic ms of the current press, or [`RELEASED`]
    pressed_at: AtomicU32,
}

impl SwitchChannel {
    pub(crate) const fn new(pin: u8) -> Self {
        Self {
            pin,
            pressed_at: AtomicU32::new(RELEASED),
        }
    }

    /// Input pin
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Start of the current press, if the line is held
    pub fn pressed_at(&self) -> Option<u32> {
        match self.pressed_at.load(Ordering::Acquire) {
            RELEASED => None,
            ts => Some(ts),
        }
    }

    /// Check if the line has been held for at least `min_hold_ms`
    ///
    /// The latch is loaded before the clock is read, so a press latched in
    /// between is never older than the time it is compared against.
    pub fn held_for<C: Clock + ?Sized>(&self, clock: &C, min_hold_ms: u32) -> bool {
        let Some(ts) = self.pressed_at() else {
            return false;
        };
        clock.now_ms().wrapping_sub(ts) >= min_hold_ms
    }

    /// Record one sample of the line (tick scheduler only)
    ///
    /// The first active sample wins; any inactive sample releases.
    pub(crate) fn latch(&self, active: bool, now_ms: u32) {
        if !active {
            self.pressed_at.store(RELEASED, Ordering::Release);
        } else if self.pressed_at().is_none() {
            // RELEASED is reserved for the sentinel
            self.pressed_at
                .store(now_ms.min(RELEASED - 1), Ordering::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    /// Clock that latches a press on the switch every time it is read
    struct PressOnRead<'a> {
        switch: &'a SwitchChannel,
        now: u32,
    }

    impl Clock for PressOnRead<'_> {
        fn now_ms(&self) -> u32 {
            self.switch.latch(true, self.now + 1);
            self.now
        }
    }

    #[test]
    fn test_first_activation_wins() {
        let switch = SwitchChannel::new(4);
        assert_eq!(switch.pressed_at(), None);

        switch.latch(true, 100);
        switch.latch(true, 110);
        assert_eq!(switch.pressed_at(), Some(100));

        switch.latch(false, 120);
        assert_eq!(switch.pressed_at(), None);

        switch.latch(true, 130);
        assert_eq!(switch.pressed_at(), Some(130));
    }

    #[test]
    fn test_zero_time_is_a_valid_press() {
        let switch = SwitchChannel::new(4);
        switch.latch(true, 0);
        assert_eq!(switch.pressed_at(), Some(0));
        assert!(switch.held_for(&ManualClock::default(), 0));
    }

    #[test]
    fn test_held_for() {
        let switch = SwitchChannel::new(4);
        let clock = ManualClock::default();
        clock.advance(500);
        assert!(!switch.held_for(&clock, 0));

        switch.latch(true, 600);
        clock.advance(199);
        assert!(!switch.held_for(&clock, 100));
        clock.advance(1);
        assert!(switch.held_for(&clock, 100));
    }

    #[test]
    fn test_press_latched_during_query_is_not_held() {
        let switch = SwitchChannel::new(4);
        let clock = PressOnRead {
            switch: &switch,
            now: 1000,
        };

        assert!(!switch.held_for(&clock, 10_000));
        assert_eq!(switch.pressed_at(), Some(1001));
        assert!(!switch.held_for(&clock, 1));
    }

    #[test]
    fn test_hold_across_clock_wrap() {
        let switch = SwitchChannel::new(4);
        switch.latch(true, u32::MAX - 20);
        let clock = ManualClock::default();
        clock.advance(30);
        assert!(switch.held_for(&clock, 50));
    }
}
