/// Path accumulator — the append-only history of map segments a playthrough
/// has travelled, plus the flattened pin view renderers draw.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::schema::map::{SegmentSpec, WaypointAtlas, WaypointId};

/// One map pin in the flattened path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: WaypointId,
    pub x: f32,
    pub y: f32,
    pub label: String,
    /// Color of the segment that first reached this pin.
    pub color: String,
    /// The player's current position (last pin).
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathHistory {
    intro: SegmentSpec,
    segments: Vec<SegmentSpec>,
}

impl PathHistory {
    /// A fresh history containing only `intro`.
    pub fn new(intro: SegmentSpec) -> Self {
        let segments = vec![intro.clone()];
        Self { intro, segments }
    }

    pub fn append(&mut self, segments: &[SegmentSpec]) {
        self.segments.extend_from_slice(segments);
    }

    /// Drop everything but the intro segment.
    pub fn reset(&mut self) {
        self.segments.clear();
        self.segments.push(self.intro.clone());
    }

    pub fn segments(&self) -> &[SegmentSpec] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flatten every segment into pins, in order, skipping a waypoint that
    /// sits on the same spot as the pin before it.
    pub fn pins(&self, atlas: &WaypointAtlas) -> Vec<Pin> {
        let mut pins: Vec<Pin> = Vec::new();
        for segment in &self.segments {
            for id in &segment.waypoints {
                let Some(point) = atlas.get(id) else {
                    warn!(waypoint = id.as_str(), "waypoint missing from atlas");
                    continue;
                };
                let repeats_previous = pins
                    .last()
                    .is_some_and(|prev| prev.x == point.x && prev.y == point.y);
                if repeats_previous {
                    continue;
                }
                pins.push(Pin {
                    id: id.clone(),
                    x: point.x,
                    y: point.y,
                    label: point.label.clone(),
                    color: segment.color.clone(),
                    is_current: false,
                });
            }
        }
        if let Some(last) = pins.last_mut() {
            last.is_current = true;
        }
        pins
    }
}
