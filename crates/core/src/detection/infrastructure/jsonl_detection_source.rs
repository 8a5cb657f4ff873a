use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::detection::domain::detection_source::{DetectionSource, DetectionSourceError};
use crate::shared::detection::{Detection, DetectionFrame};

#[derive(Deserialize)]
struct FrameRecord {
    #[serde(default)]
    frame: Option<usize>,
    #[serde(default)]
    detections: Vec<Detection>,
}

/// Reads recorded tracker output, one JSON object per line:
///
/// ```json
/// {"frame": 0, "detections": [{"bbox": [10, 20, 50, 80], "track_id": 3}]}
/// ```
///
/// `frame` defaults to the running frame count. Blank lines are ignored.
pub struct JsonlDetectionSource {
    reader: Box<dyn BufRead + Send>,
    total_frames: Option<usize>,
    line_no: usize,
    next_frame: usize,
    finished: bool,
}

impl JsonlDetectionSource {
    pub fn new(reader: Box<dyn BufRead + Send>) -> Self {
        Self {
            reader,
            total_frames: None,
            line_no: 0,
            next_frame: 0,
            finished: false,
        }
    }

    /// Opens a recording file. Non-blank lines are counted first so progress
    /// can report a total.
    pub fn open(path: &Path) -> Result<Self, DetectionSourceError> {
        let open = || {
            File::open(path).map_err(|source| DetectionSourceError::Open {
                path: path.to_path_buf(),
                source,
            })
        };

        let mut total = 0;
        for line in BufReader::new(open()?).split(b'\n') {
            if !is_blank(&line.map_err(DetectionSourceError::Io)?) {
                total += 1;
            }
        }

        let mut source = Self::new(Box::new(BufReader::new(open()?)));
        source.total_frames = Some(total);
        Ok(source)
    }

    fn next_frame(&mut self) -> Option<Result<DetectionFrame, DetectionSourceError>> {
        if self.finished {
            return None;
        }
        let mut line = Vec::new();
        loop {
            line.clear();
            match self.reader.read_until(b'\n', &mut line) {
                Ok(0) => {
                    self.finished = true;
                    return None;
                }
                Ok(_) => {
                    self.line_no += 1;
                    if !is_blank(&line) {
                        break;
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(DetectionSourceError::Io(e)));
                }
            }
        }

        let fallback_index = self.next_frame;
        let parsed = serde_json::from_slice::<FrameRecord>(&line);
        Some(match parsed {
            Ok(record) => {
                let index = record.frame.unwrap_or(fallback_index);
                self.next_frame = index.saturating_add(1);
                Ok(DetectionFrame::new(index, record.detections))
            }
            Err(source) => {
                self.next_frame = fallback_index.saturating_add(1);
                Err(DetectionSourceError::Malformed {
                    line: self.line_no,
                    frame: fallback_index,
                    source,
                })
            }
        })
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

impl DetectionSource for JsonlDetectionSource {
    fn total_frames(&self) -> Option<usize> {
        self.total_frames
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<DetectionFrame, DetectionSourceError>> + '_> {
        Box::new(std::iter::from_fn(move || self.next_frame()))
    }
}
