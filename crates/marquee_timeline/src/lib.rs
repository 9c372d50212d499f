// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hierarchical playback scheduling for the Marquee signage player.
//!
//! This crate is the timing core of the player: it decides *when* content
//! plays, never *how* it renders. A tree of [`TimelineNode`]s schedules
//! arbitrarily nested, time-sliced slots ([`TimelineItem`]) over anything
//! implementing the [`PlaybackUnit`] contract, on a shared wall-clock fed by
//! a [`Driver`].
//!
//! ## Architecture
//!
//! - [`PlaybackUnit`] — the four-call transport contract
//!   (`play`/`pause`/`seek`/`duration`) implemented by content widgets and
//!   by [`TimelineNode`] itself, which is what makes nesting uniform.
//! - [`TimelineItem`] — a slot binding a start offset, a duration and a
//!   child unit; slots may overlap (z-order layers) and may replay their
//!   child as an inner loop (`repeat`).
//! - [`TimelineNode`] — the recursive state machine: idempotent activation
//!   per window per loop cycle, loop wrap modulo its own duration, top-down
//!   seek composition, bottom-up duration aggregation.
//! - [`Driver`] / [`Clock`] — fixed-period polling that advances the tree by
//!   measured wall-clock deltas, so timer jitter never becomes drift. A
//!   [`ManualClock`] makes the whole engine deterministic under test.
//!
//! Tree construction from a declarative layout description and
//! widget-to-unit adaptation belong to collaborating crates; the engine
//! accepts any [`PlaybackUnit`] without special-casing.

pub mod clock;
pub mod driver;
pub mod item;
pub mod node;
pub mod unit;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use driver::{Driver, DEFAULT_TICK_PERIOD_MS};
pub use item::{ItemId, TimelineItem};
pub use node::TimelineNode;
pub use unit::{PlaybackError, PlaybackUnit};
