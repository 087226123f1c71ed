use crate::processors::ChunkResult;
use std::time::Duration;

/// Counters describing one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingReport {
    pub workers: usize,
    pub chunks_processed: usize,
    pub lines_read: usize,
    pub records_aggregated: usize,
    pub lines_skipped: usize,
    pub stations: usize,
    pub elapsed: Duration,
}

impl ProcessingReport {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    pub fn record_chunk(&mut self, result: &ChunkResult) {
        self.record_counts(result.lines, result.records);
    }

    /// Count one chunk of `lines` lines, `records` of which parsed
    pub fn record_counts(&mut self, lines: usize, records: usize) {
        self.chunks_processed += 1;
        self.lines_read += lines;
        self.records_aggregated += records;
        self.lines_skipped += lines - records;
    }

    pub fn lines_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.lines_read as f64 / secs
        } else {
            0.0
        }
    }

    /// Human-readable run summary
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Aggregation Report ===\n");
        summary.push_str(&format!("Workers: {}\n", self.workers));
        summary.push_str(&format!("Chunks Processed: {}\n", self.chunks_processed));
        summary.push_str(&format!("Lines Read: {}\n", self.lines_read));

        if self.lines_read > 0 {
            summary.push_str(&format!(
                "Records Aggregated: {} ({:.1}%)\n",
                self.records_aggregated,
                100.0 * self.records_aggregated as f64 / self.lines_read as f64
            ));
            summary.push_str(&format!(
                "Lines Skipped: {} ({:.1}%)\n",
                self.lines_skipped,
                100.0 * self.lines_skipped as f64 / self.lines_read as f64
            ));
        } else {
            summary.push_str("Records Aggregated: 0\n");
            summary.push_str("Lines Skipped: 0\n");
        }

        summary.push_str(&format!("Stations: {}\n", self.stations));
        summary.push_str(&format!(
            "Elapsed: {:.2}s ({:.0} lines/s)\n",
            self.elapsed.as_secs_f64(),
            self.lines_per_second()
        ));

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AggregateMap;

    #[test]
    fn test_record_chunk_accumulates_counts() {
        let mut report = ProcessingReport::new(4);

        for (lines, records) in [(10, 8), (5, 5)] {
            report.record_chunk(&ChunkResult {
                chunk_index: 0,
                partial: AggregateMap::new(),
                lines,
                records,
            });
        }

        assert_eq!(report.chunks_processed, 2);
        assert_eq!(report.lines_read, 15);
        assert_eq!(report.records_aggregated, 13);
        assert_eq!(report.lines_skipped, 2);
    }

    #[test]
    fn test_summary_for_empty_run() {
        let report = ProcessingReport::new(2);
        let summary = report.generate_summary();

        assert!(summary.contains("Lines Read: 0"));
        assert!(summary.contains("Lines Skipped: 0"));
        assert!(!summary.contains("NaN"));
    }

    #[test]
    fn test_summary_percentages() {
        let report = ProcessingReport {
            workers: 8,
            chunks_processed: 1,
            lines_read: 200,
            records_aggregated: 150,
            lines_skipped: 50,
            stations: 3,
            elapsed: Duration::from_secs(2),
        };
        let summary = report.generate_summary();

        assert!(summary.contains("Records Aggregated: 150 (75.0%)"));
        assert!(summary.contains("Lines Skipped: 50 (25.0%)"));
        assert!(summary.contains("(100 lines/s)"));
    }
}
