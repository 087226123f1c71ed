use crate::error::Result;
use crate::models::{AggregateMap, StationAccumulator};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Renders the final aggregate as `station;min;mean;max` lines.
///
/// Stations are ordered by name, compared byte-wise. Every number gets one
/// decimal digit using Rust's float formatting, which rounds the exact binary
/// value and resolves exact ties to even.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_line(&self, station: &str, acc: &StationAccumulator) -> String {
        format!(
            "{};{:.1};{:.1};{:.1}",
            station,
            acc.min(),
            acc.mean(),
            acc.max()
        )
    }

    /// One line per station, sorted, with no header
    pub fn format_lines(&self, stations: &AggregateMap) -> Vec<String> {
        stations
            .sorted()
            .into_iter()
            .map(|(station, acc)| self.format_line(station, acc))
            .collect()
    }

    /// Stream the report to `writer`, returning the number of lines written
    pub fn write_report<W: Write>(&self, stations: &AggregateMap, mut writer: W) -> Result<usize> {
        let mut written = 0;

        for (station, acc) in stations.sorted() {
            writeln!(writer, "{}", self.format_line(station, acc))?;
            written += 1;
        }

        writer.flush()?;
        Ok(written)
    }

    /// Write the report to a file, creating parent directories as needed
    pub fn write_to_file(&self, stations: &AggregateMap, path: &Path) -> Result<usize> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let writer = BufWriter::new(File::create(path)?);
        self.write_report(stations, writer)
    }
}
