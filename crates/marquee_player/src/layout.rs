// SPDX-License-Identifier: MIT OR Apache-2.0
//! Declarative RON layout descriptions and the tree builder.

use crate::widgets::StubWidget;
use marquee_timeline::{TimelineItem, TimelineNode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Error when loading a layout description
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// The layout file could not be read
    #[error("failed to read layout file: {0}")]
    Io(#[from] std::io::Error),
    /// The layout file is not valid RON
    #[error("failed to parse layout: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// A layout or playlist: an unordered set of scheduled slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDesc {
    /// Wrap local time modulo the layout's duration.
    #[serde(rename = "loop", default)]
    pub looping: bool,
    /// The scheduled slots.
    pub items: Vec<SlotDesc>,
}

/// One scheduled slot within a layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDesc {
    /// Offset from the layout's zero point, in milliseconds.
    pub start_ms: u64,
    /// Slot length in milliseconds.
    pub duration_ms: u64,
    /// Replay the content as an inner loop to fill the slot.
    #[serde(default)]
    pub repeat: bool,
    /// What the slot shows.
    pub content: ContentDesc,
}

/// Content assigned to a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContentDesc {
    /// A still image; no intrinsic end.
    Image {
        /// Media URI.
        uri: String,
    },
    /// A video with a known media length.
    Video {
        /// Media URI.
        uri: String,
        /// Media length in milliseconds.
        natural_ms: u64,
    },
    /// A text overlay; no intrinsic end.
    Text {
        /// The text to show.
        body: String,
    },
    /// A nested layout; this is where arbitrary depth comes from.
    Layout(LayoutDesc),
}

/// Load a layout description from a RON file.
pub fn load(path: &Path) -> Result<LayoutDesc, LayoutError> {
    let text = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&text)?)
}

/// Build a playable tree of stub widgets from a description.
pub fn build(desc: &LayoutDesc) -> TimelineNode {
    let mut node = if desc.looping {
        TimelineNode::with_loop()
    } else {
        TimelineNode::new()
    };
    for slot in &desc.items {
        let item = match &slot.content {
            ContentDesc::Image { uri } => TimelineItem::new(
                slot.start_ms,
                slot.duration_ms,
                StubWidget::indefinite(format!("image:{uri}")),
            ),
            ContentDesc::Video { uri, natural_ms } => TimelineItem::new(
                slot.start_ms,
                slot.duration_ms,
                StubWidget::with_duration(format!("video:{uri}"), *natural_ms),
            ),
            ContentDesc::Text { body } => TimelineItem::new(
                slot.start_ms,
                slot.duration_ms,
                StubWidget::indefinite(format!("text:{body}")),
            ),
            ContentDesc::Layout(nested) => {
                TimelineItem::new(slot.start_ms, slot.duration_ms, build(nested))
            }
        };
        let item = if slot.repeat { item.with_repeat() } else { item };
        node.add(item);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_timeline::PlaybackUnit;

    const SAMPLE: &str = r#"(
        loop: true,
        items: [
            (start_ms: 0, duration_ms: 5000, content: Image(uri: "logo.png")),
            (start_ms: 3000, duration_ms: 7000, repeat: true,
             content: Video(uri: "spot.mp4", natural_ms: 2500)),
            (start_ms: 0, duration_ms: 10000, content: Layout((
                items: [
                    (start_ms: 1000, duration_ms: 2000, content: Text(body: "hello")),
                ],
            ))),
        ],
    )"#;

    #[test]
    fn test_parse_sample_layout() {
        let desc: LayoutDesc = ron::from_str(SAMPLE).unwrap();
        assert!(desc.looping);
        assert_eq!(desc.items.len(), 3);
        assert!(desc.items[1].repeat);
        assert!(matches!(desc.items[2].content, ContentDesc::Layout(_)));
    }

    #[test]
    fn test_build_aggregates_duration_across_nesting() {
        let desc: LayoutDesc = ron::from_str(SAMPLE).unwrap();
        let node = build(&desc);
        assert_eq!(node.item_count(), 3);
        assert_eq!(node.duration(), 10000);
        assert!(node.looping());
    }

    #[test]
    fn test_built_tree_plays() {
        let desc: LayoutDesc = ron::from_str(SAMPLE).unwrap();
        let mut node = build(&desc);
        node.play(0).unwrap();
        node.tick(3100);
        assert!(node.is_playing());
        node.pause().unwrap();
        assert!(!node.is_playing());
    }
}
