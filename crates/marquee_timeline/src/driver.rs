// SPDX-License-Identifier: MIT OR Apache-2.0
//! The periodic driver that advances a playing tree.

use crate::clock::{Clock, MonotonicClock};
use crate::unit::PlaybackUnit;

/// Suggested polling period for signage content.
///
/// 100 ms is coarse enough to stay cheap and fine enough that slot
/// activations are not visibly late; shorter periods trade CPU for finer
/// activation accuracy.
pub const DEFAULT_TICK_PERIOD_MS: u64 = 100;

/// Feeds measured wall-clock deltas into the root of a timeline tree.
///
/// The host calls [`tick`](Self::tick) on a fixed period (see
/// [`DEFAULT_TICK_PERIOD_MS`]). Each tick forwards the time that actually
/// elapsed since the previous tick rather than a fixed increment, so timer
/// jitter never accumulates into playback drift. One driver per tree: nested
/// nodes advance through the root's [`PlaybackUnit::tick`] fan-out.
#[derive(Debug)]
pub struct Driver<C: Clock = MonotonicClock> {
    clock: C,
    last_ms: Option<u64>,
}

impl Driver<MonotonicClock> {
    /// Create a driver on the production monotonic clock.
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for Driver<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Driver<C> {
    /// Create a driver on an injected clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            last_ms: None,
        }
    }

    /// Advance `root` by the wall-clock time elapsed since the previous
    /// tick.
    ///
    /// The first tick after construction or [`reset`](Self::reset) anchors
    /// the clock and forwards a zero delta.
    pub fn tick(&mut self, root: &mut dyn PlaybackUnit) {
        let now = self.clock.now_ms();
        let delta = match self.last_ms {
            Some(prev) => now.saturating_sub(prev),
            None => 0,
        };
        self.last_ms = Some(now);
        tracing::trace!(delta_ms = delta, "driver tick");
        root.tick(delta);
    }

    /// Forget the previous tick's clock reading.
    ///
    /// Call before resuming after a stretch in which the host stopped
    /// ticking (e.g. while paused), so the stalled wall time is not replayed
    /// into the tree in one jump.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::item::TimelineItem;
    use crate::node::TimelineNode;
    use crate::unit::PlaybackError;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        plays: Rc<RefCell<Vec<u64>>>,
    }

    impl PlaybackUnit for Recorder {
        fn play(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
            self.plays.borrow_mut().push(offset_ms);
            Ok(())
        }
        fn pause(&mut self) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn seek(&mut self, _offset_ms: u64) -> Result<(), PlaybackError> {
            Ok(())
        }
        fn duration(&self) -> u64 {
            0
        }
    }

    #[test]
    fn test_driver_forwards_measured_deltas() {
        let clock = ManualClock::new();
        let mut driver = Driver::with_clock(clock.clone());
        let mut node = TimelineNode::new();
        node.play(0).unwrap();

        driver.tick(&mut node); // anchor
        for jitter in [100, 130, 70, 104, 96] {
            clock.advance_ms(jitter);
            driver.tick(&mut node);
        }
        // Uneven periods still sum to exact wall time.
        assert_eq!(node.time_ms(), 500);
    }

    #[test]
    fn test_jittery_ticks_do_not_delay_activation() {
        let clock = ManualClock::new();
        let mut driver = Driver::with_clock(clock.clone());
        let plays = Rc::new(RefCell::new(Vec::new()));
        let mut node = TimelineNode::new();
        node.add(TimelineItem::new(
            1000,
            2000,
            Recorder {
                plays: plays.clone(),
            },
        ));
        node.play(0).unwrap();

        driver.tick(&mut node);
        // Stalled, uneven ticks; the window still opens at the right offset.
        clock.advance_ms(900);
        driver.tick(&mut node);
        assert!(plays.borrow().is_empty());
        clock.advance_ms(500);
        driver.tick(&mut node);
        assert_eq!(&*plays.borrow(), &[400]);
    }

    #[test]
    fn test_reset_swallows_a_pause_gap() {
        let clock = ManualClock::new();
        let mut driver = Driver::with_clock(clock.clone());
        let mut node = TimelineNode::new();
        node.play(0).unwrap();

        driver.tick(&mut node);
        clock.advance_ms(300);
        driver.tick(&mut node);
        node.pause().unwrap();

        // Wall time passes while nothing ticks.
        clock.advance_ms(60_000);
        driver.reset();
        node.play(node.time_ms()).unwrap();
        driver.tick(&mut node);
        clock.advance_ms(100);
        driver.tick(&mut node);
        assert_eq!(node.time_ms(), 400);
    }

    #[test]
    fn test_first_tick_is_zero_delta() {
        let clock = ManualClock::new();
        clock.set_ms(5_000);
        let mut driver = Driver::with_clock(clock);
        let mut node = TimelineNode::new();
        node.play(0).unwrap();

        driver.tick(&mut node);
        assert_eq!(node.time_ms(), 0);
    }
}
