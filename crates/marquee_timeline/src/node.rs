// SPDX-License-Identifier: MIT OR Apache-2.0
//! The recursive scheduling core: a composite, nestable playback node.

use crate::item::{ItemId, TimelineItem};
use crate::unit::{PlaybackError, PlaybackUnit};
use indexmap::IndexMap;
use std::fmt;

/// Bookkeeping for an item whose child has been told to play.
///
/// `cycle` counts inner-loop replays for `repeat` slots; non-repeating slots
/// stay at cycle 0 for the life of the activation.
#[derive(Debug, Clone, Copy)]
struct ActiveSlot {
    cycle: u64,
}

/// A composite, recursively-nestable playback scheduler.
///
/// A node owns an insertion-ordered collection of [`TimelineItem`]s and
/// forwards `play`/`pause`/`seek` into the children whose activation windows
/// the node's local time visits. Because the node itself implements
/// [`PlaybackUnit`], a parent cannot tell it apart from a leaf widget, which
/// is what allows layouts containing playlists containing further layouts.
///
/// The node keeps no timer of its own: a [`Driver`](crate::Driver) ticks the
/// root with measured wall-clock deltas and playing nodes fan those deltas
/// out to active children, so exactly one tick stream exists per tree.
pub struct TimelineNode {
    items: IndexMap<ItemId, TimelineItem>,
    /// Local elapsed time, valid while playing or immediately after a seek.
    time_ms: u64,
    /// Wrap local time modulo the node's own duration instead of running off
    /// the end.
    looping: bool,
    /// Items whose children have already received `play` this cycle. Cleared
    /// by a loop wrap so every window reopens.
    active: IndexMap<ItemId, ActiveSlot>,
    playing: bool,
}

impl TimelineNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            time_ms: 0,
            looping: false,
            active: IndexMap::new(),
            playing: false,
        }
    }

    /// Create an empty node that wraps around its own duration.
    pub fn with_loop() -> Self {
        let mut node = Self::new();
        node.looping = true;
        node
    }

    /// Add an item. Structural only; the item becomes eligible for
    /// activation on the next evaluation.
    pub fn add(&mut self, item: TimelineItem) -> ItemId {
        let id = ItemId::new();
        self.items.insert(id, item);
        id
    }

    /// Remove an item.
    ///
    /// A structural edit, not a playback transition: an active item is
    /// dropped from the activation bookkeeping without its child receiving
    /// `pause`.
    pub fn remove(&mut self, id: ItemId) -> Option<TimelineItem> {
        self.active.shift_remove(&id);
        self.items.shift_remove(&id)
    }

    /// Get an item
    pub fn item(&self, id: ItemId) -> Option<&TimelineItem> {
        self.items.get(&id)
    }

    /// Get a mutable item
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut TimelineItem> {
        self.items.get_mut(&id)
    }

    /// Iterate items in insertion order
    pub fn items(&self) -> impl Iterator<Item = &TimelineItem> {
        self.items.values()
    }

    /// Get item count
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Toggle wraparound behavior; consumed on the next evaluation.
    pub fn set_loop(&mut self, enabled: bool) {
        self.looping = enabled;
    }

    /// Whether local time wraps modulo the node's duration
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Whether the node is currently playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Local elapsed time since the node's zero point
    pub fn time_ms(&self) -> u64 {
        self.time_ms
    }

    /// Run one activation pass at the current local time.
    ///
    /// This is the only place activation decisions are made: loop wrap
    /// first, then a single in-order visit that activates items whose
    /// windows now hold the local time and re-triggers inner-loop replays
    /// for `repeat` slots. Items are never proactively paused when their
    /// window closes; a finished child is left running until the node is
    /// paused or a wrap reopens its window.
    fn evaluate(&mut self) {
        let total = self.duration();
        if self.looping && total > 0 && self.time_ms >= total {
            self.time_ms %= total;
            self.active.clear();
            tracing::debug!(time_ms = self.time_ms, "loop wrap");
        }

        let time = self.time_ms;
        for (id, item) in &mut self.items {
            if let Some(slot) = self.active.get_mut(id) {
                // Inner loop: replay the child to fill the slot.
                if item.repeat && item.is_active(time) {
                    let natural = item.child().duration();
                    if natural > 0 {
                        let local = item.local_offset(time);
                        let cycle = local / natural;
                        if cycle > slot.cycle {
                            slot.cycle = cycle;
                            if let Err(e) = item.child_mut().play(local % natural) {
                                tracing::warn!("replay of repeat slot failed: {}", e);
                            }
                        }
                    }
                }
            } else if item.is_active(time) {
                let local = item.local_offset(time);
                let (offset, cycle) = if item.repeat {
                    match item.child().duration() {
                        0 => (local, 0),
                        natural => (local % natural, local / natural),
                    }
                } else {
                    (local, 0)
                };
                tracing::debug!(offset_ms = offset, "activating item");
                if let Err(e) = item.child_mut().play(offset) {
                    tracing::warn!("activating item failed: {}", e);
                }
                self.active.insert(*id, ActiveSlot { cycle });
            }
        }
    }
}

impl Default for TimelineNode {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackUnit for TimelineNode {
    /// Start playback at `offset_ms`.
    ///
    /// Resets local time, clears the activation bookkeeping and evaluates
    /// immediately, so items whose windows hold the offset activate before
    /// this call returns. Safe to call while already playing: the state is
    /// simply rebuilt from the new offset.
    fn play(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
        tracing::debug!(offset_ms, "play");
        self.time_ms = offset_ms;
        self.active.clear();
        self.playing = true;
        self.evaluate();
        Ok(())
    }

    /// Stop playback, forwarding `pause` to every currently-active child.
    ///
    /// Idempotent: a second call is a no-op, so each previously-active child
    /// receives exactly one `pause`. Local time is left in place for callers
    /// that resume with an explicit offset.
    fn pause(&mut self) -> Result<(), PlaybackError> {
        if !self.playing {
            return Ok(());
        }
        tracing::debug!(time_ms = self.time_ms, "pause");
        self.playing = false;
        for (id, item) in &mut self.items {
            if self.active.contains_key(id) {
                if let Err(e) = item.child_mut().pause() {
                    tracing::warn!("pausing child failed: {}", e);
                }
            }
        }
        Ok(())
    }

    /// Reposition to `offset_ms` without requiring playback.
    ///
    /// Every item whose window contains the offset receives a composed local
    /// seek (overlapping z-order layers all get staged); through nested
    /// nodes this resolves arbitrary depth in one top-down pass. When the
    /// offset falls in a gap or past every window, the most recently started
    /// item (greatest `start <= offset`) receives a best-effort offset; when
    /// the offset precedes every item, the earliest-starting item is staged
    /// at zero. Activation bookkeeping is untouched: callers that want
    /// activation recomputed follow with `play(offset_ms)`.
    fn seek(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
        tracing::debug!(offset_ms, "seek");
        self.time_ms = offset_ms;

        let mut hit = false;
        for item in self.items.values_mut() {
            if item.is_active(offset_ms) {
                hit = true;
                let local = item.local_offset(offset_ms);
                if let Err(e) = item.child_mut().seek(local) {
                    tracing::warn!("seeking child failed: {}", e);
                }
            }
        }
        if hit {
            return Ok(());
        }

        // Best effort for out-of-window offsets: stage the most recently
        // started item, or the earliest upcoming one when nothing has
        // started yet.
        let target = self
            .items
            .iter()
            .filter(|(_, item)| item.start_ms <= offset_ms)
            .max_by_key(|(_, item)| item.start_ms)
            .or_else(|| self.items.iter().min_by_key(|(_, item)| item.start_ms))
            .map(|(id, _)| *id);
        if let Some(id) = target {
            if let Some(item) = self.items.get_mut(&id) {
                let local = item.local_offset(offset_ms);
                if let Err(e) = item.child_mut().seek(local) {
                    tracing::warn!("seeking child failed: {}", e);
                }
            }
        }
        Ok(())
    }

    /// The node's natural length: the furthest extent of any item, or 0 for
    /// an empty node. Also the modulus used for loop wraps.
    fn duration(&self) -> u64 {
        self.items
            .values()
            .map(TimelineItem::extent_ms)
            .max()
            .unwrap_or(0)
    }

    /// Advance local time by a measured wall-clock delta and re-evaluate.
    ///
    /// Ignored while paused. The delta is fanned out to active children
    /// first so nested nodes advance on the same beat as their parent.
    fn tick(&mut self, delta_ms: u64) {
        if !self.playing {
            return;
        }
        self.time_ms = self.time_ms.saturating_add(delta_ms);
        for (id, item) in &mut self.items {
            if self.active.contains_key(id) {
                item.child_mut().tick(delta_ms);
            }
        }
        self.evaluate();
    }
}

impl fmt::Debug for TimelineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineNode")
            .field("items", &self.items.len())
            .field("time_ms", &self.time_ms)
            .field("looping", &self.looping)
            .field("active", &self.active.len())
            .field("playing", &self.playing)
            .finish()
    }
}
