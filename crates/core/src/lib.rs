//! Polygon region occupancy and in/out counting for tracked objects.
//!
//! Feed per-frame tracker output (boxes + track IDs) through an
//! [`occupancy::domain::occupancy_engine::OccupancyEngine`] to maintain, for
//! each configured region, which tracks are inside it now, which have ever
//! been inside it, and lifetime in/out counters.

pub mod detection;
pub mod occupancy;
pub mod pipeline;
pub mod reporting;
pub mod shared;
