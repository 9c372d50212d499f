// SPDX-License-Identifier: MIT OR Apache-2.0
//! The playback contract shared by leaf widgets and nested timelines.

/// Error reported by a playback unit that could not honor a transport call.
///
/// The scheduler never propagates these upward: a failing child is logged and
/// skipped so its siblings still receive their calls in the same tick.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    /// The widget rejected a transport call (e.g. its media failed to load).
    #[error("widget rejected {op}: {reason}")]
    Widget {
        /// Which transport call failed (`"play"`, `"pause"`, or `"seek"`).
        op: &'static str,
        /// Widget-reported reason.
        reason: String,
    },
}

/// Anything playable on a timeline: a content widget or a nested
/// [`TimelineNode`](crate::TimelineNode).
///
/// A node treats every child uniformly through this trait, which is what
/// allows arbitrary nesting depth (a layout containing playlists containing
/// further layouts). All offsets and durations are non-negative milliseconds
/// on the caller's local clock.
pub trait PlaybackUnit {
    /// Begin or resume playback at the given local offset.
    ///
    /// Must be safe to call while already playing (restart semantics). When
    /// driven by a node, a unit receives exactly one `play` per activation
    /// window per loop cycle.
    fn play(&mut self, offset_ms: u64) -> Result<(), PlaybackError>;

    /// Stop playback and release transient per-play resources.
    ///
    /// Must be a no-op when not playing.
    fn pause(&mut self) -> Result<(), PlaybackError>;

    /// Reposition without necessarily playing.
    ///
    /// Visual leaves should update their visible state even while paused so
    /// deep-linked positions are staged before the next `play`.
    fn seek(&mut self, offset_ms: u64) -> Result<(), PlaybackError>;

    /// The unit's natural length in milliseconds.
    ///
    /// `0` is a valid answer for content with no intrinsic end, such as an
    /// indefinite image.
    fn duration(&self) -> u64;

    /// Advance local time by a measured wall-clock delta.
    ///
    /// The shared driver ticks the root; playing nodes fan the delta out to
    /// their active children through this hook. Leaves that keep no clock of
    /// their own can ignore it.
    fn tick(&mut self, delta_ms: u64) {
        let _ = delta_ms;
    }
}
