use crate::occupancy::domain::region_set::RegionSet;
use crate::shared::constants::UNASSIGNED_TRACK_ID;
use crate::shared::detection::{Detection, TrackId};

/// How detections without a tracker-assigned ID take part in occupancy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnassignedPolicy {
    /// Record them under [`UNASSIGNED_TRACK_ID`] like any other identity.
    #[default]
    Count,
    /// Leave them out of occupancy entirely.
    Ignore,
}

/// Places each detection's box center into at most one region's `current`
/// set. Never touches history or counters.
#[derive(Clone, Copy, Debug, Default)]
pub struct OccupancyUpdater {
    policy: UnassignedPolicy,
}

impl OccupancyUpdater {
    pub fn new(policy: UnassignedPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnassignedPolicy {
        self.policy
    }

    /// Occupancy key for a detection, or `None` if it should be skipped.
    pub fn track_key(&self, detection: &Detection) -> Option<TrackId> {
        match (detection.track_id, self.policy) {
            (Some(id), _) => Some(id),
            (None, UnassignedPolicy::Count) => Some(UNASSIGNED_TRACK_ID),
            (None, UnassignedPolicy::Ignore) => None,
        }
    }

    /// Classifies `detections` into `regions`, returning how many landed in
    /// no region (or were skipped by the unassigned policy).
    pub fn update(&self, regions: &mut RegionSet, detections: &[Detection]) -> usize {
        let mut unmatched = 0;
        for detection in detections {
            let Some(key) = self.track_key(detection) else {
                unmatched += 1;
                continue;
            };
            match regions.classify_index(detection.bbox.center()) {
                Some(idx) => regions.mark_current_at(idx, key),
                None => unmatched += 1,
            }
        }
        unmatched
    }
}
