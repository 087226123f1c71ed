use crate::config::{AggregationConfig, Strategy};
use crate::error::{ProcessingError, Result};
use crate::models::{AggregateMap, Chunk};
use crate::processors::chunk_aggregator::{aggregate_chunk, aggregate_lines, ChunkResult};
use crate::processors::merge_reducer::merge_all;
use crate::processors::ProcessingReport;
use crate::readers::{map_input, ChunkReader, MmapChunkReader};
use crate::utils::cancellation::CancellationToken;
use crate::utils::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_STATION_CAPACITY};
use crate::utils::progress::ProgressReporter;
use crossbeam::channel;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A chunk whose processing panicked
#[derive(Debug)]
struct WorkerFailure {
    chunk_index: usize,
    message: String,
}

/// Drives chunk reading, the worker pool and the final merge.
///
/// The calling thread owns the input and feeds chunks through a bounded
/// channel to `max_workers` pool threads. Each worker aggregates a chunk into
/// its own map, so no accumulator is ever shared between threads.
pub struct ParallelProcessor {
    max_workers: usize,
    chunk_size: usize,
    max_lines: Option<usize>,
    strategy: Strategy,
    use_mmap: bool,
    cancellation: Option<CancellationToken>,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_lines: None,
            strategy: Strategy::Parallel,
            use_mmap: false,
            cancellation: None,
        }
    }

    pub fn from_config(config: &AggregationConfig) -> Self {
        Self::new(config.max_workers)
            .with_chunk_size(config.chunk_size)
            .with_max_lines(config.max_lines)
            .with_strategy(config.strategy)
            .with_mmap(config.use_mmap)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_max_lines(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Aggregate every record of the file at `path`
    pub fn process_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(AggregateMap, ProcessingReport)> {
        let started = Instant::now();

        info!(
            path = %path.display(),
            workers = self.max_workers,
            chunk_size = self.chunk_size,
            max_lines = ?self.max_lines,
            strategy = ?self.strategy,
            mmap = self.use_mmap,
            "Starting aggregation"
        );

        let (stations, mut report) = if self.use_mmap {
            let mmap = map_input(path)?;
            let chunks = MmapChunkReader::new(&mmap, self.chunk_size, self.max_lines);
            self.process(chunks, progress)?
        } else {
            let chunks = ChunkReader::open(path, self.chunk_size, self.max_lines)?;
            self.process(chunks, progress)?
        };

        report.elapsed = started.elapsed();

        info!(
            lines = report.lines_read,
            records = report.records_aggregated,
            skipped = report.lines_skipped,
            stations = report.stations,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Aggregation complete"
        );

        Ok((stations, report))
    }

    /// Aggregate an arbitrary chunk sequence with the configured strategy
    pub fn process<'a, I>(
        &self,
        chunks: I,
        progress: Option<&ProgressReporter>,
    ) -> Result<(AggregateMap, ProcessingReport)>
    where
        I: Iterator<Item = Result<Chunk<'a>>>,
    {
        let (stations, mut report) = match self.strategy {
            Strategy::Sequential => self.process_sequential(chunks, progress)?,
            Strategy::Parallel => {
                let (partials, report) = self.process_chunks(chunks, progress)?;

                if let Some(p) = progress {
                    p.set_message(&format!("Merging {} partial results...", partials.len()));
                }

                (merge_all(partials), report)
            }
        };

        report.stations = stations.len();
        Ok((stations, report))
    }

    /// Fold every line into a single map on the calling thread
    pub fn process_sequential<'a, I>(
        &self,
        chunks: I,
        progress: Option<&ProgressReporter>,
    ) -> Result<(AggregateMap, ProcessingReport)>
    where
        I: Iterator<Item = Result<Chunk<'a>>>,
    {
        let mut stations = AggregateMap::with_capacity(DEFAULT_STATION_CAPACITY);
        let mut report = ProcessingReport::new(1);

        for chunk in chunks {
            if self.is_cancelled() {
                return Err(ProcessingError::Cancelled);
            }

            let chunk = chunk?;
            let (lines, records) = aggregate_lines(chunk.lines(), &mut stations);
            report.record_counts(lines, records);

            debug!(chunk = chunk.index(), lines, records, "Chunk aggregated");

            if let Some(p) = progress {
                p.increment(chunk.byte_len() as u64);
            }
        }

        Ok((stations, report))
    }

    /// Run the worker pool over `chunks`, returning one partial map per chunk
    pub fn process_chunks<'a, I>(
        &self,
        chunks: I,
        progress: Option<&ProgressReporter>,
    ) -> Result<(Vec<AggregateMap>, ProcessingReport)>
    where
        I: Iterator<Item = Result<Chunk<'a>>>,
    {
        self.process_chunks_with(chunks, progress, aggregate_chunk)
    }

    /// [`process_chunks`](Self::process_chunks) with a caller-supplied
    /// per-chunk function.
    ///
    /// A panic inside `aggregate` aborts the whole run: no further chunks are
    /// submitted, queued chunks are drained unprocessed, and the failure is
    /// returned as [`ProcessingError::WorkerFailed`].
    pub fn process_chunks_with<'a, I, F>(
        &self,
        chunks: I,
        progress: Option<&ProgressReporter>,
        aggregate: F,
    ) -> Result<(Vec<AggregateMap>, ProcessingReport)>
    where
        I: Iterator<Item = Result<Chunk<'a>>>,
        F: Fn(&Chunk<'a>) -> ChunkResult + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .thread_name(|i| format!("aggregate-worker-{}", i))
            .build()?;

        // Queue depth equal to the pool size bounds chunks alive at once to
        // roughly two per worker
        let (chunk_tx, chunk_rx) = channel::bounded::<Chunk<'a>>(self.max_workers);
        let (result_tx, result_rx) =
            channel::unbounded::<std::result::Result<ChunkResult, WorkerFailure>>();

        let abort = CancellationToken::new();
        let mut read_error: Option<ProcessingError> = None;
        let mut submitted = 0usize;
        let mut stopped_early = false;

        pool.in_place_scope(|scope| {
            for _ in 0..self.max_workers {
                let chunk_rx = chunk_rx.clone();
                let result_tx = result_tx.clone();
                let abort = &abort;
                let aggregate = &aggregate;

                scope.spawn(move |_| {
                    for chunk in chunk_rx.iter() {
                        if abort.is_cancelled() || self.is_cancelled() {
                            continue;
                        }

                        let outcome = panic::catch_unwind(AssertUnwindSafe(|| aggregate(&chunk)))
                            .map_err(|payload| WorkerFailure {
                                chunk_index: chunk.index(),
                                message: panic_message(&*payload),
                            });

                        match &outcome {
                            Ok(result) => {
                                debug!(
                                    chunk = result.chunk_index,
                                    lines = result.lines,
                                    records = result.records,
                                    stations = result.partial.len(),
                                    "Chunk aggregated"
                                );
                                if let Some(p) = progress {
                                    p.increment(chunk.byte_len() as u64);
                                }
                            }
                            Err(failure) => {
                                warn!(
                                    chunk = failure.chunk_index,
                                    message = %failure.message,
                                    "Worker failed, aborting run"
                                );
                                abort.cancel();
                            }
                        }

                        if result_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                });
            }

            for chunk in chunks {
                if abort.is_cancelled() || self.is_cancelled() {
                    stopped_early = true;
                    break;
                }

                match chunk {
                    Ok(chunk) => {
                        if chunk_tx.send(chunk).is_err() {
                            break;
                        }
                        submitted += 1;
                    }
                    Err(e) => {
                        abort.cancel();
                        read_error = Some(e);
                        break;
                    }
                }
            }

            // Closing the queue lets idle workers exit
            drop(chunk_tx);
        });

        drop(result_tx);

        if let Some(e) = read_error {
            return Err(e);
        }

        let mut report = ProcessingReport::new(self.max_workers);
        let mut partials = Vec::with_capacity(submitted);

        for outcome in result_rx.iter() {
            match outcome {
                Ok(result) => {
                    report.record_chunk(&result);
                    partials.push(result.partial);
                }
                Err(failure) => {
                    return Err(ProcessingError::WorkerFailed {
                        chunk_index: failure.chunk_index,
                        message: failure.message,
                    });
                }
            }
        }

        // A token tripped after the last chunk was collected leaves a
        // complete result
        if stopped_early || partials.len() < submitted {
            return Err(ProcessingError::Cancelled);
        }

        debug!(submitted, collected = partials.len(), "All chunks collected");

        Ok((partials, report))
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
