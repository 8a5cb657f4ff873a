pub mod counter_engine;
pub mod occupancy_engine;
pub mod occupancy_updater;
pub mod region;
pub mod region_count;
pub mod region_set;
