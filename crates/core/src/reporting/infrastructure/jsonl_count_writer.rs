use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::occupancy::domain::region_count::FrameCounts;
use crate::reporting::domain::count_writer::CountWriter;

/// Writes one serialized [`FrameCounts`] per line.
pub struct JsonlCountWriter {
    out: Box<dyn Write + Send>,
    lines: usize,
}

impl JsonlCountWriter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out, lines: 0 }
    }

    pub fn create(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }
}

impl CountWriter for JsonlCountWriter {
    fn write(&mut self, counts: &FrameCounts) -> Result<(), Box<dyn std::error::Error>> {
        serde_json::to_writer(&mut self.out, counts)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.out.flush()?;
        Ok(())
    }
}
