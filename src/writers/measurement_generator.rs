use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, MAX_GENERATED_TEMP, MIN_GENERATED_TEMP};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes synthetic `station;temperature` files for local benchmarking.
///
/// Each station gets a fixed mean drawn once; readings scatter uniformly
/// around it and are written with one decimal digit. The same seed always
/// produces the same file.
pub struct MeasurementGenerator {
    stations: Vec<(String, f64)>,
    seed: u64,
}

impl MeasurementGenerator {
    pub fn new(station_count: usize, seed: u64) -> Result<Self> {
        if station_count == 0 {
            return Err(ProcessingError::Config(
                "at least one station is required".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let stations = (0..station_count)
            .map(|i| (format!("Station{:05}", i), rng.random_range(-10.0..30.0)))
            .collect();

        Ok(Self { stations, seed })
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn write_measurements<W: Write>(&self, lines: usize, mut writer: W) -> Result<()> {
        // Offset the seed so readings are not correlated with station means
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(1));

        for _ in 0..lines {
            let (name, mean) = &self.stations[rng.random_range(0..self.stations.len())];
            let spread: f64 = rng.random_range(-15.0..15.0);
            let temperature = (*mean + spread)
                .clamp(MIN_GENERATED_TEMP, MAX_GENERATED_TEMP);
            writeln!(writer, "{};{:.1}", name, temperature)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_to_file(&self, path: &Path, lines: usize) -> Result<()> {
        let file = File::create(path)?;
        self.write_measurements(lines, BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::parse_record;

    #[test]
    fn test_generated_lines_parse() -> Result<()> {
        let generator = MeasurementGenerator::new(5, 7)?;
        let mut out = Vec::new();
        generator.write_measurements(200, &mut out)?;

        let lines: Vec<&[u8]> = out.split(|&b| b == b'\n').filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 200);

        for line in lines {
            let record = parse_record(line).unwrap();
            assert!(record.station.starts_with("Station"));
            assert!((MIN_GENERATED_TEMP..=MAX_GENERATED_TEMP).contains(&record.temperature));
        }
        Ok(())
    }

    #[test]
    fn test_same_seed_same_output() -> Result<()> {
        let mut first = Vec::new();
        let mut second = Vec::new();
        MeasurementGenerator::new(10, 99)?.write_measurements(50, &mut first)?;
        MeasurementGenerator::new(10, 99)?.write_measurements(50, &mut second)?;

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_zero_stations_rejected() {
        assert!(matches!(
            MeasurementGenerator::new(0, 1),
            Err(ProcessingError::Config(_))
        ));
    }
}
