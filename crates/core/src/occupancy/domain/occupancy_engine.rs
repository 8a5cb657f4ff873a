use crate::occupancy::domain::counter_engine::CounterEngine;
use crate::occupancy::domain::occupancy_updater::{OccupancyUpdater, UnassignedPolicy};
use crate::occupancy::domain::region::{Region, RegionError};
use crate::occupancy::domain::region_count::{FrameCounts, RegionCount};
use crate::occupancy::domain::region_set::RegionSet;
use crate::shared::detection::{Detection, DetectionFrame};

/// Runs the per-frame occupancy/counting cycle over a fixed region set.
///
/// Order per frame: classify detections into `current`, tally counters
/// against `history`, snapshot, fold `current` into `history`, clear
/// `current`. The individual steps are public so callers can inspect state
/// between them; [`OccupancyEngine::process_frame`] runs them in order.
pub struct OccupancyEngine {
    regions: RegionSet,
    updater: OccupancyUpdater,
    counter: CounterEngine,
    frames_processed: usize,
}

impl OccupancyEngine {
    pub fn new(regions: Vec<Region>, policy: UnassignedPolicy) -> Result<Self, RegionError> {
        Ok(Self {
            regions: RegionSet::new(regions)?,
            updater: OccupancyUpdater::new(policy),
            counter: CounterEngine::new(),
            frames_processed: 0,
        })
    }

    pub fn region_set(&self) -> &RegionSet {
        &self.regions
    }

    pub fn policy(&self) -> UnassignedPolicy {
        self.updater.policy()
    }

    pub fn frames_processed(&self) -> usize {
        self.frames_processed
    }

    /// Classifies detections into `current`. Returns the unmatched count.
    pub fn observe(&mut self, detections: &[Detection]) -> usize {
        self.updater.update(&mut self.regions, detections)
    }

    pub fn count(&mut self) {
        self.counter.tally(&mut self.regions);
    }

    /// Folds `current` into `history` and clears `current`.
    pub fn commit(&mut self) {
        self.regions.commit_frame();
        self.regions.reset_current();
        self.frames_processed += 1;
    }

    pub fn process_frame(&mut self, frame: &DetectionFrame) -> FrameCounts {
        let unmatched = self.observe(&frame.detections);
        self.count();
        let mut counts = self.counts(frame.index);
        counts.detections = frame.detections.len();
        counts.unmatched = unmatched;
        self.commit();

        log::debug!(
            "frame {}: {} detections, {} unmatched",
            frame.index,
            counts.detections,
            unmatched
        );
        counts
    }

    /// Counts a frame whose detections could not be obtained as if it were
    /// empty.
    pub fn skip_frame(&mut self, index: usize) -> FrameCounts {
        let mut counts = self.process_frame(&DetectionFrame::empty(index));
        counts.skipped = true;
        counts
    }

    /// Snapshot of every region's counters and current occupants.
    pub fn counts(&self, frame: usize) -> FrameCounts {
        let regions = self
            .regions
            .states()
            .iter()
            .map(|s| RegionCount {
                name: s.region.name().to_string(),
                polygon: s.region.polygon().to_vec(),
                color: s.region.color(),
                in_count: s.in_count,
                out_count: s.out_count,
                occupants: s.current.iter().copied().collect(),
            })
            .collect();
        FrameCounts {
            frame,
            regions,
            detections: 0,
            unmatched: 0,
            skipped: false,
        }
    }
}
