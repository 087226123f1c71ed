use crate::cli::args::{Cli, Commands};
use crate::config::AggregationConfig;
use crate::error::Result;
use crate::processors::ParallelProcessor;
use crate::readers::open_input;
use crate::utils::cancellation::CancellationToken;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::{MeasurementGenerator, ReportFormatter};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Aggregate {
            input_file,
            output_file,
            max_lines,
            max_workers,
            chunk_size,
            strategy,
            mmap,
            timing,
            summary,
            quiet,
        } => {
            let mut config = AggregationConfig::load(cli.config.as_deref())?;

            if let Some(workers) = max_workers {
                config = config.with_max_workers(workers);
            }
            if let Some(size) = chunk_size {
                config = config.with_chunk_size(size);
            }
            if max_lines.is_some() {
                config = config.with_max_lines(max_lines);
            }
            if let Some(strategy) = strategy {
                config = config.with_strategy(strategy);
            }
            if mmap {
                config = config.with_mmap(true);
            }

            let options = ReportOptions {
                output_file,
                timing,
                summary,
                quiet,
            };
            aggregate(input_file, config.validated()?, options).await?;
        }

        Commands::Generate {
            output_file,
            lines,
            stations,
            seed,
        } => {
            let generator = MeasurementGenerator::new(stations, seed)?;
            info!(path = %output_file.display(), lines, stations, seed, "Generating measurements");

            let path = output_file.clone();
            tokio::task::spawn_blocking(move || generator.write_to_file(&path, lines)).await??;

            println!(
                "Wrote {} measurements for {} stations to {}",
                lines,
                stations,
                output_file.display()
            );
        }
    }

    Ok(())
}

struct ReportOptions {
    output_file: Option<PathBuf>,
    timing: bool,
    summary: bool,
    quiet: bool,
}

async fn aggregate(
    input_file: PathBuf,
    config: AggregationConfig,
    options: ReportOptions,
) -> Result<()> {
    let started = Instant::now();

    // Fail on a missing or unreadable input before any worker starts
    let total_bytes = open_input(&input_file)?.metadata()?.len();

    let token = CancellationToken::new();
    let processor = ParallelProcessor::from_config(&config).with_cancellation(token.clone());

    let signal_token = token.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            signal_token.cancel();
        }
    });

    let quiet = options.quiet;
    let handle = tokio::task::spawn_blocking(move || {
        let progress = if config.max_lines.is_some() {
            ProgressReporter::new_spinner("Aggregating measurements...", quiet)
        } else {
            ProgressReporter::new_bytes(total_bytes, "Aggregating measurements...", quiet)
        };

        let outcome = processor.process_file(&input_file, Some(&progress));
        progress.finish_and_clear();
        outcome
    });

    let outcome = handle.await;
    signal_task.abort();
    let (stations, report) = outcome??;

    let formatter = ReportFormatter::new();
    let written = match &options.output_file {
        Some(path) => formatter.write_to_file(&stations, path)?,
        None => formatter.write_report(&stations, BufWriter::new(io::stdout().lock()))?,
    };

    info!(stations = written, "Report written");

    if options.summary {
        eprintln!("\n{}", report.generate_summary());
    }

    if options.timing {
        eprintln!(
            "\nExecution time: {:.2} seconds",
            started.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
