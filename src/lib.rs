pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use crate::config::{AggregationConfig, Strategy};
pub use crate::error::{ProcessingError, Result};
pub use crate::models::{AggregateMap, StationAccumulator};
pub use crate::processors::{ParallelProcessor, ProcessingReport};
pub use crate::writers::ReportFormatter;
