use crate::config::Strategy;
use crate::utils::constants::DEFAULT_GENERATED_STATIONS;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "station-stats")]
#[command(about = "Per-station min/mean/max temperatures for very large measurement files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "TOML settings file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a `station;temperature` file and print one line per station
    Aggregate {
        #[arg(short, long, help = "Input measurements file")]
        input_file: PathBuf,

        #[arg(short, long, help = "Write the report here instead of stdout")]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Only consume the first N lines")]
        max_lines: Option<usize>,

        #[arg(long, help = "Worker threads [default: number of CPUs]")]
        max_workers: Option<usize>,

        #[arg(long, help = "Lines per unit of work [default: 500000]")]
        chunk_size: Option<usize>,

        #[arg(long, value_enum, help = "Aggregation strategy [default: parallel]")]
        strategy: Option<Strategy>,

        #[arg(long, help = "Memory-map the input instead of buffered reads")]
        mmap: bool,

        #[arg(long, help = "Print elapsed wall-clock time to stderr")]
        timing: bool,

        #[arg(long, help = "Print run statistics to stderr")]
        summary: bool,

        #[arg(short, long, help = "Hide the progress bar")]
        quiet: bool,
    },

    /// Write a synthetic measurements file
    Generate {
        #[arg(short, long, help = "Output measurements file")]
        output_file: PathBuf,

        #[arg(short, long, help = "Number of lines to write")]
        lines: usize,

        #[arg(long, default_value_t = DEFAULT_GENERATED_STATIONS)]
        stations: usize,

        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aggregate_args() {
        let cli = Cli::try_parse_from([
            "station-stats",
            "aggregate",
            "-i",
            "data/measurements.txt",
            "--max-lines",
            "10000000",
            "--max-workers",
            "8",
            "--chunk-size",
            "400000",
            "--strategy",
            "sequential",
            "--timing",
        ])
        .unwrap();

        match cli.command {
            Commands::Aggregate {
                input_file,
                max_lines,
                max_workers,
                chunk_size,
                strategy,
                timing,
                mmap,
                ..
            } => {
                assert_eq!(input_file, PathBuf::from("data/measurements.txt"));
                assert_eq!(max_lines, Some(10_000_000));
                assert_eq!(max_workers, Some(8));
                assert_eq!(chunk_size, Some(400_000));
                assert_eq!(strategy, Some(Strategy::Sequential));
                assert!(timing);
                assert!(!mmap);
            }
            _ => panic!("expected aggregate command"),
        }
    }

    #[test]
    fn test_input_file_required() {
        assert!(Cli::try_parse_from(["station-stats", "aggregate"]).is_err());
    }

    #[test]
    fn test_generate_defaults() {
        let cli =
            Cli::try_parse_from(["station-stats", "generate", "-o", "m.txt", "-l", "100"]).unwrap();

        match cli.command {
            Commands::Generate {
                lines,
                stations,
                seed,
                ..
            } => {
                assert_eq!(lines, 100);
                assert_eq!(stations, DEFAULT_GENERATED_STATIONS);
                assert_eq!(seed, 42);
            }
            _ => panic!("expected generate command"),
        }
    }
}
