use crate::shared::detection::TrackId;

/// Track key recorded for detections the upstream tracker could not assign.
pub const UNASSIGNED_TRACK_ID: TrackId = -1;

/// Region overlay palette, assigned by configuration index and cycled.
pub const REGION_PALETTE: [[u8; 3]; 9] = [
    [0, 255, 0],
    [255, 0, 0],
    [0, 0, 255],
    [255, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
    [128, 0, 128],
    [255, 165, 0],
    [0, 128, 255],
];

/// Minimum vertex count for a region polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Default progress log interval, in frames.
pub const DEFAULT_PROGRESS_EVERY: usize = 100;
