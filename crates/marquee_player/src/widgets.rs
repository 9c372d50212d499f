// SPDX-License-Identifier: MIT OR Apache-2.0
//! Logging stand-ins for the rendering collaborator's content widgets.

use marquee_timeline::{PlaybackError, PlaybackUnit};

/// A leaf unit that logs its transport calls instead of rendering.
///
/// Natural duration is `0` for content with no intrinsic end (images, text)
/// and the media length for videos, which is what lets `repeat` slots cycle.
pub struct StubWidget {
    label: String,
    natural_ms: u64,
    position_ms: u64,
    playing: bool,
}

impl StubWidget {
    /// Create a widget with no intrinsic end (image, text).
    pub fn indefinite(label: impl Into<String>) -> Self {
        Self::with_duration(label, 0)
    }

    /// Create a widget with a natural media length.
    pub fn with_duration(label: impl Into<String>, natural_ms: u64) -> Self {
        Self {
            label: label.into(),
            natural_ms,
            position_ms: 0,
            playing: false,
        }
    }
}

impl PlaybackUnit for StubWidget {
    fn play(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
        self.position_ms = offset_ms;
        self.playing = true;
        tracing::info!(widget = %self.label, offset_ms, "play");
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.playing {
            self.playing = false;
            tracing::info!(widget = %self.label, position_ms = self.position_ms, "pause");
        }
        Ok(())
    }

    fn seek(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
        self.position_ms = offset_ms;
        tracing::debug!(widget = %self.label, offset_ms, "seek");
        Ok(())
    }

    fn duration(&self) -> u64 {
        self.natural_ms
    }

    fn tick(&mut self, delta_ms: u64) {
        if self.playing {
            self.position_ms = self.position_ms.saturating_add(delta_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_when_idle_is_silent_noop() {
        let mut widget = StubWidget::indefinite("logo");
        widget.pause().unwrap();
        assert!(!widget.playing);
    }

    #[test]
    fn test_ticks_advance_position_only_while_playing() {
        let mut widget = StubWidget::with_duration("spot", 5000);
        widget.play(1000).unwrap();
        widget.tick(250);
        widget.pause().unwrap();
        widget.tick(250);
        assert_eq!(widget.position_ms, 1250);
    }
}
