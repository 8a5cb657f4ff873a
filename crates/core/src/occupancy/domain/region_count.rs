use serde::{Deserialize, Serialize};

use crate::occupancy::domain::region::Color;
use crate::shared::detection::TrackId;
use crate::shared::geometry::Point;

/// Read-only view of one region after a frame has been counted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionCount {
    pub name: String,
    pub polygon: Vec<Point>,
    pub color: Color,
    pub in_count: u64,
    pub out_count: u64,
    /// Track IDs inside the region this frame, ascending.
    pub occupants: Vec<TrackId>,
}

impl RegionCount {
    /// Overlay caption, e.g. `region-01: In 4, Out 1`.
    pub fn label(&self) -> String {
        format!("{}: In {}, Out {}", self.name, self.in_count, self.out_count)
    }
}

/// Per-frame counting result, regions in configuration order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameCounts {
    pub frame: usize,
    pub regions: Vec<RegionCount>,
    /// Detections supplied for the frame.
    pub detections: usize,
    /// Detections that fell in no region.
    pub unmatched: usize,
    /// Set when the frame's detections were unreadable and it was counted
    /// as empty.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

impl FrameCounts {
    pub fn region(&self, name: &str) -> Option<&RegionCount> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Counter pairs `(in_count, out_count)` in region order.
    pub fn totals(&self) -> Vec<(u64, u64)> {
        self.regions
            .iter()
            .map(|r| (r.in_count, r.out_count))
            .collect()
    }
}
