use crate::occupancy::domain::region_set::RegionSet;

/// Derives per-region in/out counters from `current` versus `history`.
///
/// Must run after the frame's detections are classified and before the
/// frame is committed, so `history` still holds only earlier frames.
///
/// - `in_count` grows by `|current \ history|`: a track counts as entering a
///   region once, on the first frame it is seen there.
/// - `out_count` is replaced by `|history \ current|` every frame. It counts
///   every track ever seen in the region that is not there now, whether it
///   moved to another region, is occluded, or has left the scene, so it can
///   go down again when a track returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct CounterEngine;

impl CounterEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn tally(&self, regions: &mut RegionSet) {
        for state in regions.states_mut() {
            let entered = state.current.difference(&state.history).count() as u64;
            state.in_count += entered;
            state.out_count = state.history.difference(&state.current).count() as u64;
        }
    }
}
