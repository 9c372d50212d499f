// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scheduled slots binding a child unit to an activation window.

use crate::unit::PlaybackUnit;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a timeline item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Create a new random item ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// A scheduled slot on a node's local clock.
///
/// The slot's activation window is the half-open interval
/// `[start_ms, start_ms + duration_ms)`. Items within one node may overlap in
/// time; overlapping slots are distinct z-order layers (e.g. a base layer and
/// a picture-in-picture layer).
pub struct TimelineItem {
    /// Offset from the owning node's zero point, in milliseconds.
    pub start_ms: u64,
    /// Length of the slot, in milliseconds.
    pub duration_ms: u64,
    /// Replay the child as an inner loop to fill the slot when the slot
    /// outlasts the child's natural duration.
    pub repeat: bool,
    child: Box<dyn PlaybackUnit>,
}

impl TimelineItem {
    /// Create a new item owning the given child unit.
    pub fn new(start_ms: u64, duration_ms: u64, child: impl PlaybackUnit + 'static) -> Self {
        Self {
            start_ms,
            duration_ms,
            repeat: false,
            child: Box::new(child),
        }
    }

    /// Mark the child as an inner loop that replays to fill the slot.
    pub fn with_repeat(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Whether the activation window contains `time_ms`.
    pub fn is_active(&self, time_ms: u64) -> bool {
        time_ms >= self.start_ms && time_ms < self.start_ms.saturating_add(self.duration_ms)
    }

    /// The node-local time translated into this slot's own clock.
    ///
    /// Saturates at zero for times before the window opens.
    pub fn local_offset(&self, time_ms: u64) -> u64 {
        time_ms.saturating_sub(self.start_ms)
    }

    /// End of the activation window; the slot's contribution to the owning
    /// node's duration.
    pub fn extent_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }

    /// Borrow the child unit.
    pub fn child(&self) -> &dyn PlaybackUnit {
        self.child.as_ref()
    }

    /// Mutably borrow the child unit.
    pub fn child_mut(&mut self) -> &mut dyn PlaybackUnit {
        self.child.as_mut()
    }
}

impl fmt::Debug for TimelineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineItem")
            .field("start_ms", &self.start_ms)
            .field("duration_ms", &self.duration_ms)
            .field("repeat", &self.repeat)
            .field("child_duration_ms", &self.child.duration())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::PlaybackError;

    struct Silent;

    impl PlaybackUnit for Silent {
        fn play(&mut self, _offset_ms: u64) -> Result<(), PlaybackError> {
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
    fn test_activation_window_is_half_open() {
        let item = TimelineItem::new(1000, 2000, Silent);
        assert!(!item.is_active(999));
        assert!(item.is_active(1000));
        assert!(item.is_active(2999));
        assert!(!item.is_active(3000));
    }

    #[test]
    fn test_local_offset_saturates_before_window() {
        let item = TimelineItem::new(500, 1000, Silent);
        assert_eq!(item.local_offset(400), 0);
        assert_eq!(item.local_offset(500), 0);
        assert_eq!(item.local_offset(1500), 1000);
    }

    #[test]
    fn test_extent_is_start_plus_duration() {
        let item = TimelineItem::new(3000, 7000, Silent);
        assert_eq!(item.extent_ms(), 10000);
    }

    #[test]
    fn test_zero_duration_window_is_never_active() {
        let item = TimelineItem::new(1000, 0, Silent);
        assert!(!item.is_active(1000));
    }
}
