use crate::occupancy::domain::region_count::FrameCounts;

/// Receives per-frame counts for rendering or reporting.
pub trait CountWriter: Send {
    fn write(&mut self, counts: &FrameCounts) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes buffered output. Called once after the last frame.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
