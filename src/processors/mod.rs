pub mod chunk_aggregator;
pub mod merge_reducer;
pub mod parallel_processor;
pub mod processing_report;

pub use chunk_aggregator::{aggregate_chunk, aggregate_lines, ChunkResult};
pub use merge_reducer::{merge_all, merge_parallel};
pub use parallel_processor::ParallelProcessor;
pub use processing_report::ProcessingReport;
