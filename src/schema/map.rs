use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::story::BranchTag;

/// Name of a point in the waypoint atlas, e.g. `"KAKAKA"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(pub String);

impl WaypointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WaypointId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A labelled map location in percentage coordinates (0..=100 on both axes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
    pub label: String,
}

impl Waypoint {
    pub fn new(x: f32, y: f32, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: label.into(),
        }
    }

    pub fn in_bounds(&self) -> bool {
        (0.0..=100.0).contains(&self.x) && (0.0..=100.0).contains(&self.y)
    }
}

/// Static table of named points segments are built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointAtlas {
    points: FxHashMap<WaypointId, Waypoint>,
}

impl WaypointAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<WaypointId>, waypoint: Waypoint) {
        self.points.insert(id.into(), waypoint);
    }

    pub fn with(mut self, id: &str, x: f32, y: f32, label: &str) -> Self {
        self.insert(id, Waypoint::new(x, y, label));
        self
    }

    pub fn get(&self, id: &WaypointId) -> Option<&Waypoint> {
        self.points.get(id)
    }

    pub fn contains(&self, id: &WaypointId) -> bool {
        self.points.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WaypointId, &Waypoint)> {
        self.points.iter()
    }
}

/// One colored leg of the travelled path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub color: String,
    pub waypoints: Vec<WaypointId>,
}

impl SegmentSpec {
    pub fn new(color: impl Into<String>, waypoints: &[&str]) -> Self {
        Self {
            color: color.into(),
            waypoints: waypoints.iter().map(|w| WaypointId::from(*w)).collect(),
        }
    }
}

/// Authored form of one consequence: the segments drawn when `branch`
/// is chosen at script index `step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceEntry {
    pub step: usize,
    pub branch: BranchTag,
    pub segments: Vec<SegmentSpec>,
}

/// Lookup from `(step, branch)` to the segments that choice adds to the map.
///
/// A missing pair is legal and means the choice has no map effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ConsequenceEntry>", into = "Vec<ConsequenceEntry>")]
pub struct ConsequenceTable {
    entries: FxHashMap<(usize, BranchTag), Vec<SegmentSpec>>,
}

impl ConsequenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add segments for a pair. Repeated pairs accumulate in insertion order.
    pub fn insert(&mut self, step: usize, branch: BranchTag, segments: Vec<SegmentSpec>) {
        self.entries
            .entry((step, branch))
            .or_default()
            .extend(segments);
    }

    pub fn with(mut self, step: usize, branch: BranchTag, segments: Vec<SegmentSpec>) -> Self {
        self.insert(step, branch, segments);
        self
    }

    /// Segments for a choice; empty when nothing was authored.
    pub fn lookup(&self, step: usize, branch: BranchTag) -> &[SegmentSpec] {
        self.entries
            .get(&(step, branch))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All entries, sorted by step then branch.
    pub fn entries(&self) -> Vec<(usize, BranchTag, &[SegmentSpec])> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(&(step, branch), segs)| (step, branch, segs.as_slice()))
            .collect();
        out.sort_by_key(|&(step, branch, _)| (step, branch));
        out
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ConsequenceEntry>> for ConsequenceTable {
    fn from(raw: Vec<ConsequenceEntry>) -> Self {
        let mut table = ConsequenceTable::new();
        for entry in raw {
            table.insert(entry.step, entry.branch, entry.segments);
        }
        table
    }
}

impl From<ConsequenceTable> for Vec<ConsequenceEntry> {
    fn from(table: ConsequenceTable) -> Self {
        table
            .entries()
            .into_iter()
            .map(|(step, branch, segments)| ConsequenceEntry {
                step,
                branch,
                segments: segments.to_vec(),
            })
            .collect()
    }
}
