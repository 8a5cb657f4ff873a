use std::path::PathBuf;

use thiserror::Error;

use crate::shared::detection::DetectionFrame;

#[derive(Error, Debug)]
pub enum DetectionSourceError {
    #[error("failed to open detections {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read detections: {0}")]
    Io(#[source] std::io::Error),
    /// One frame's record could not be parsed. Later frames are unaffected.
    #[error("malformed detections on line {line} (frame {frame}): {source}")]
    Malformed {
        line: usize,
        frame: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Supplies per-frame tracker output in frame order.
///
/// Implementations wrap whatever produces boxes and track IDs (a live
/// tracker, a recording) so the counting pipeline only sees
/// [`DetectionFrame`]s.
pub trait DetectionSource: Send {
    /// Number of frames, if known up front.
    fn total_frames(&self) -> Option<usize>;

    /// Yields frames in order. A `Malformed` item affects only that frame;
    /// any other error ends the stream.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<DetectionFrame, DetectionSourceError>> + '_>;
}
