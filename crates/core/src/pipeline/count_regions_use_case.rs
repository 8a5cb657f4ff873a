use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::detection::domain::detection_source::{DetectionSource, DetectionSourceError};
use crate::occupancy::domain::occupancy_engine::OccupancyEngine;
use crate::occupancy::domain::region_count::FrameCounts;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::reporting::domain::count_writer::CountWriter;

/// Outcome of a counting run.
#[derive(Clone, Debug, PartialEq)]
pub struct CountSummary {
    pub frames: usize,
    /// Frames counted as empty because their detections were unreadable.
    pub skipped: usize,
    pub cancelled: bool,
    /// Counts after the last processed frame, if any frame was processed.
    pub last: Option<FrameCounts>,
}

/// Drives an [`OccupancyEngine`] over a detection source, one frame at a
/// time: read → classify/count/commit → write.
///
/// A frame the source reports as malformed is counted as empty and the run
/// continues. Any other source error aborts the run. Cancellation and
/// `max_frames` are honoured between frames only.
pub struct CountRegionsUseCase {
    source: Box<dyn DetectionSource>,
    engine: OccupancyEngine,
    writer: Option<Box<dyn CountWriter>>,
    logger: Box<dyn PipelineLogger>,
    max_frames: Option<usize>,
    cancelled: Arc<AtomicBool>,
}

impl CountRegionsUseCase {
    pub fn new(
        source: Box<dyn DetectionSource>,
        engine: OccupancyEngine,
        writer: Option<Box<dyn CountWriter>>,
        logger: Box<dyn PipelineLogger>,
        max_frames: Option<usize>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            source,
            engine,
            writer,
            logger,
            max_frames,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn engine(&self) -> &OccupancyEngine {
        &self.engine
    }

    pub fn execute(&mut self) -> Result<CountSummary, Box<dyn std::error::Error>> {
        let total = match (self.source.total_frames(), self.max_frames) {
            (Some(t), Some(m)) => Some(t.min(m)),
            (t, m) => t.or(m),
        };
        self.logger.info(&format!(
            "Counting {} regions ({} frames)",
            self.engine.region_set().len(),
            total.map_or_else(|| "unknown".to_string(), |t| t.to_string())
        ));

        let mut summary = CountSummary {
            frames: 0,
            skipped: 0,
            cancelled: false,
            last: None,
        };

        for item in self.source.frames() {
            if self.cancelled.load(Ordering::Relaxed) {
                summary.cancelled = true;
                break;
            }
            if self.max_frames.is_some_and(|max| summary.frames >= max) {
                break;
            }

            let start = Instant::now();
            let counts = match item {
                Ok(frame) => {
                    self.logger.metric("detections", frame.detections.len() as f64);
                    self.engine.process_frame(&frame)
                }
                Err(DetectionSourceError::Malformed { line, frame, source }) => {
                    log::warn!("Skipping frame {frame} (line {line}): {source}");
                    summary.skipped += 1;
                    self.engine.skip_frame(frame)
                }
                Err(e) => return Err(e.into()),
            };
            self.logger
                .timing("count", start.elapsed().as_secs_f64() * 1000.0);
            self.logger.metric("unmatched", counts.unmatched as f64);

            if let Some(writer) = self.writer.as_mut() {
                let start = Instant::now();
                writer.write(&counts)?;
                self.logger
                    .timing("write", start.elapsed().as_secs_f64() * 1000.0);
            }

            summary.frames += 1;
            self.logger.progress(summary.frames, total);
            summary.last = Some(counts);
        }

        if let Some(writer) = self.writer.as_mut() {
            writer.close()?;
        }
        if summary.cancelled {
            self.logger
                .info(&format!("Cancelled after {} frames", summary.frames));
        }
        self.logger.summary();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::occupancy::domain::occupancy_updater::UnassignedPolicy;
    use crate::occupancy::domain::region::{Color, Region};
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::detection::{BoundingBox, Detection, DetectionFrame, TrackId};
    use crate::shared::geometry::Point;

    // --- Stubs ---

    type Item = Result<DetectionFrame, DetectionSourceError>;

    struct StubSource {
        items: Vec<Item>,
        total: Option<usize>,
    }

    impl DetectionSource for StubSource {
        fn total_frames(&self) -> Option<usize> {
            self.total
        }

        fn frames(&mut self) -> Box<dyn Iterator<Item = Item> + '_> {
            Box::new(self.items.drain(..))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingWriter {
        written: Arc<Mutex<Vec<FrameCounts>>>,
        closed: Arc<AtomicBool>,
        cancel_after: Option<(usize, Arc<AtomicBool>)>,
    }

    impl CountWriter for RecordingWriter {
        fn write(&mut self, counts: &FrameCounts) -> Result<(), Box<dyn std::error::Error>> {
            let mut written = self.written.lock().unwrap();
            written.push(counts.clone());
            if let Some((n, flag)) = &self.cancel_after {
                if written.len() >= *n {
                    flag.store(true, Ordering::Relaxed);
                }
            }
            Ok(())
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.closed.store(true, Ordering::Relaxed);
            Ok(())
        }
    }

    fn engine() -> OccupancyEngine {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ];
        OccupancyEngine::new(
            vec![Region::new("lot", square, Color::for_index(0)).unwrap()],
            UnassignedPolicy::Count,
        )
        .unwrap()
    }

    fn frame(index: usize, ids: &[TrackId]) -> Item {
        let detections = ids
            .iter()
            .map(|&id| Detection::tracked(BoundingBox::new(40.0, 40.0, 60.0, 60.0), id))
            .collect();
        Ok(DetectionFrame::new(index, detections))
    }

    fn malformed(frame: usize) -> Item {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        Err(DetectionSourceError::Malformed {
            line: frame + 1,
            frame,
            source,
        })
    }

    fn use_case(items: Vec<Item>, writer: RecordingWriter) -> CountRegionsUseCase {
        let total = Some(items.len());
        CountRegionsUseCase::new(
            Box::new(StubSource { items, total }),
            engine(),
            Some(Box::new(writer)),
            Box::new(NullPipelineLogger),
            None,
            None,
        )
    }

    // --- Tests ---

    #[test]
    fn test_counts_every_frame_and_closes_writer() {
        let writer = RecordingWriter::default();
        let mut uc = use_case(
            vec![frame(0, &[1]), frame(1, &[1, 2]), frame(2, &[])],
            writer.clone(),
        );
        let summary = uc.execute().unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(summary.skipped, 0);
        assert!(!summary.cancelled);
        assert_eq!(summary.last.unwrap().totals(), vec![(2, 2)]);

        let written = writer.written.lock().unwrap();
        let trajectory: Vec<_> = written.iter().map(|c| c.totals()[0]).collect();
        assert_eq!(trajectory, vec![(1, 0), (2, 0), (2, 2)]);
        assert!(writer.closed.load(Ordering::Relaxed));
    }

    #[test]
    fn test_malformed_frame_counted_as_empty() {
        let writer = RecordingWriter::default();
        let mut uc = use_case(
            vec![frame(0, &[5]), malformed(1), frame(2, &[5])],
            writer.clone(),
        );
        let summary = uc.execute().unwrap();

        assert_eq!(summary.frames, 3);
        assert_eq!(summary.skipped, 1);
        let written = writer.written.lock().unwrap();
        assert!(written[1].skipped);
        assert_eq!(written[1].frame, 1);
        assert_eq!(written[1].totals(), vec![(1, 1)]);
        assert_eq!(written[2].totals(), vec![(1, 0)]);
    }

    #[test]
    fn test_io_error_aborts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let mut uc = use_case(
            vec![frame(0, &[1]), Err(DetectionSourceError::Io(io)), frame(2, &[1])],
            RecordingWriter::default(),
        );
        let err = uc.execute().unwrap_err();
        assert!(err.to_string().contains("disk gone"));
        assert_eq!(uc.engine().frames_processed(), 1);
    }

    #[test]
    fn test_cancellation_stops_at_frame_boundary() {
        let flag = Arc::new(AtomicBool::new(false));
        let writer = RecordingWriter {
            cancel_after: Some((2, flag.clone())),
            ..Default::default()
        };
        let mut uc = CountRegionsUseCase::new(
            Box::new(StubSource {
                items: vec![frame(0, &[1]), frame(1, &[2]), frame(2, &[3]), frame(3, &[4])],
                total: None,
            }),
            engine(),
            Some(Box::new(writer.clone())),
            Box::new(NullPipelineLogger),
            None,
            Some(flag),
        );
        let summary = uc.execute().unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.frames, 2);
        assert_eq!(uc.engine().frames_processed(), 2);
        assert_eq!(writer.written.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_max_frames_limits_run() {
        let mut uc = CountRegionsUseCase::new(
            Box::new(StubSource {
                items: vec![frame(0, &[1]), frame(1, &[2]), frame(2, &[3])],
                total: Some(3),
            }),
            engine(),
            None,
            Box::new(NullPipelineLogger),
            Some(2),
            None,
        );
        let summary = uc.execute().unwrap();
        assert_eq!(summary.frames, 2);
        assert!(!summary.cancelled);
        assert_eq!(summary.last.unwrap().totals(), vec![(2, 1)]);
    }

    #[test]
    fn test_empty_source() {
        let mut uc = use_case(Vec::new(), RecordingWriter::default());
        let summary = uc.execute().unwrap();
        assert_eq!(summary.frames, 0);
        assert!(summary.last.is_none());
    }
}
