use serde::{Deserialize, Serialize};

use crate::shared::geometry::Point;

/// Persistent object identifier assigned by the upstream tracker.
pub type TrackId = i64;

/// Axis-aligned box in frame pixel coordinates, `(x1, y1)` top-left and
/// `(x2, y2)` bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box center snapped down to whole pixels.
    ///
    /// Degenerate boxes (zero or negative extent) still yield their midpoint.
    pub fn center(&self) -> Point {
        Point::new(
            ((self.x1 + self.x2) / 2.0).floor(),
            ((self.y1 + self.y2) / 2.0).floor(),
        )
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// One tracked object in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// `None` when the tracker could not assign an identity this frame.
    #[serde(default)]
    pub track_id: Option<TrackId>,
}

impl Detection {
    pub fn new(bbox: BoundingBox, track_id: Option<TrackId>) -> Self {
        Self { bbox, track_id }
    }

    pub fn tracked(bbox: BoundingBox, track_id: TrackId) -> Self {
        Self::new(bbox, Some(track_id))
    }
}

/// Tracker output for a single video frame, in tracker order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionFrame {
    pub index: usize,
    pub detections: Vec<Detection>,
}

impl DetectionFrame {
    pub fn new(index: usize, detections: Vec<Detection>) -> Self {
        Self { index, detections }
    }

    pub fn empty(index: usize) -> Self {
        Self::new(index, Vec::new())
    }
}
