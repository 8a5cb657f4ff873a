use std::collections::HashMap;
use std::time::Instant;

/// Observer for counting-pipeline events.
///
/// Keeps the use case independent of where progress and timings end up
/// (the `log` crate, a UI, nowhere).
pub trait PipelineLogger: Send {
    /// Frame-level progress. `total` is `None` for open-ended sources.
    fn progress(&mut self, current: usize, total: Option<usize>);

    /// Time spent in a named stage for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Point-in-time value such as detections per frame.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// End-of-run report. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything. Used in tests.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: Option<usize>) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Forwards to `log`, printing progress every `every` frames and an
/// averaged per-stage/per-metric summary at the end.
pub struct StdoutPipelineLogger {
    every: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    frames_seen: usize,
}

impl StdoutPipelineLogger {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    /// Formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames_seen;
        let mut lines = vec![format!(
            "Counting summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            lines.push(format!(
                "  {stage:10}: avg {:7.3}ms  total {total_ms:8.1}ms",
                mean(durations)
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let values = &self.metrics[name];
            let max = values.iter().copied().fold(0.0_f64, f64::max);
            lines.push(format!("  {name}: avg {:.1}, max {max:.0}", mean(values)));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} frames/s"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(crate::shared::constants::DEFAULT_PROGRESS_EVERY)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: Option<usize>) {
        self.frames_seen = current;
        match total {
            Some(total) if total > 0 => {
                if current % self.every == 0 || current == total {
                    let pct = current as f64 / total as f64 * 100.0;
                    log::info!("Counting: {current}/{total} frames ({pct:.1}%)");
                }
            }
            _ => {
                if current % self.every == 0 {
                    log::info!("Counting: {current} frames");
                }
            }
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_accepts_everything() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, Some(10));
        logger.progress(2, None);
        logger.timing("count", 0.2);
        logger.metric("detections", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("count", 0.5);
        logger.timing("count", 1.5);
        logger.timing("write", 0.1);

        let count = logger.timings_for("count").unwrap();
        assert_eq!(count.len(), 2);
        assert_relative_eq!(mean(count), 1.0);
        assert_eq!(logger.timings_for("write").unwrap().len(), 1);
        assert!(logger.timings_for("missing").is_none());
    }

    #[test]
    fn test_metric_records_values() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("detections", 3.0);
        logger.metric("detections", 4.0);
        assert_relative_eq!(mean(logger.metrics_for("detections").unwrap()), 3.5);
    }

    #[test]
    fn test_summary_contents() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(40, Some(40));
        logger.timing("count", 0.25);
        logger.metric("unmatched", 2.0);
        logger.metric("unmatched", 6.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Counting summary (40 frames"));
        assert!(summary.contains("count"));
        assert!(summary.contains("unmatched: avg 4.0, max 6"));
        assert!(summary.contains("frames/s"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutPipelineLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_frames_without_total() {
        let mut logger = StdoutPipelineLogger::new(3);
        for i in 1..=7 {
            logger.progress(i, None);
        }
        assert_eq!(logger.frames_seen, 7);
    }

    #[test]
    fn test_zero_interval_clamped() {
        let logger = StdoutPipelineLogger::new(0);
        assert_eq!(logger.every, 1);
        assert_eq!(StdoutPipelineLogger::default().every, 100);
    }

    #[test]
    fn test_mean_of_empty_is_zero() {
        assert_relative_eq!(mean(&[]), 0.0);
    }
}
