use std::collections::{BTreeSet, HashMap};

use crate::occupancy::domain::region::{Region, RegionError};
use crate::shared::detection::TrackId;
use crate::shared::geometry::Point;

/// Per-region occupancy and counter state.
#[derive(Clone, Debug)]
pub(crate) struct RegionState {
    pub(crate) region: Region,
    /// Track IDs inside the region in the frame being processed.
    pub(crate) current: BTreeSet<TrackId>,
    /// Track IDs seen inside the region in any earlier frame.
    pub(crate) history: BTreeSet<TrackId>,
    pub(crate) in_count: u64,
    pub(crate) out_count: u64,
}

impl RegionState {
    fn new(region: Region) -> Self {
        Self {
            region,
            current: BTreeSet::new(),
            history: BTreeSet::new(),
            in_count: 0,
            out_count: 0,
        }
    }
}

/// Ordered regions plus their occupancy state.
///
/// Configuration order is significant: [`RegionSet::classify`] tests regions
/// in that order and stops at the first hit. The set of regions is fixed at
/// construction.
#[derive(Clone, Debug)]
pub struct RegionSet {
    states: Vec<RegionState>,
    index: HashMap<String, usize>,
}

impl RegionSet {
    pub fn new(regions: Vec<Region>) -> Result<Self, RegionError> {
        let mut index = HashMap::with_capacity(regions.len());
        let mut states = Vec::with_capacity(regions.len());
        for (i, region) in regions.into_iter().enumerate() {
            if index.insert(region.name().to_string(), i).is_some() {
                return Err(RegionError::InvalidRegion {
                    name: region.name().to_string(),
                    reason: "duplicate region name".to_string(),
                });
            }
            states.push(RegionState::new(region));
        }
        Ok(Self { states, index })
    }

    /// Name of the first region (in configuration order) containing `point`.
    pub fn classify(&self, point: Point) -> Option<&str> {
        self.classify_index(point).map(|i| self.states[i].region.name())
    }

    pub(crate) fn classify_index(&self, point: Point) -> Option<usize> {
        self.states.iter().position(|s| s.region.contains(point))
    }

    pub fn mark_current(
        &mut self,
        region_name: &str,
        track_id: TrackId,
    ) -> Result<(), RegionError> {
        let idx = self.lookup(region_name)?;
        self.mark_current_at(idx, track_id);
        Ok(())
    }

    pub(crate) fn mark_current_at(&mut self, idx: usize, track_id: TrackId) {
        self.states[idx].current.insert(track_id);
    }

    /// Folds every region's `current` set into its `history`.
    pub fn commit_frame(&mut self) {
        for state in &mut self.states {
            state.history.extend(state.current.iter().copied());
        }
    }

    pub fn reset_current(&mut self) {
        for state in &mut self.states {
            state.current.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Regions in configuration order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.states.iter().map(|s| &s.region)
    }

    pub fn region(&self, name: &str) -> Result<&Region, RegionError> {
        Ok(&self.state(name)?.region)
    }

    pub fn current(&self, name: &str) -> Result<&BTreeSet<TrackId>, RegionError> {
        Ok(&self.state(name)?.current)
    }

    pub fn history(&self, name: &str) -> Result<&BTreeSet<TrackId>, RegionError> {
        Ok(&self.state(name)?.history)
    }

    pub fn in_count(&self, name: &str) -> Result<u64, RegionError> {
        Ok(self.state(name)?.in_count)
    }

    pub fn out_count(&self, name: &str) -> Result<u64, RegionError> {
        Ok(self.state(name)?.out_count)
    }

    pub(crate) fn states(&self) -> &[RegionState] {
        &self.states
    }

    pub(crate) fn states_mut(&mut self) -> &mut [RegionState] {
        &mut self.states
    }

    fn lookup(&self, name: &str) -> Result<usize, RegionError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| RegionError::UnknownRegion(name.to_string()))
    }

    fn state(&self, name: &str) -> Result<&RegionState, RegionError> {
        Ok(&self.states[self.lookup(name)?])
    }
}
