use crate::error::Result;
use crate::utils::constants::{DEFAULT_CHUNK_SIZE, ENV_PREFIX, MAX_WORKERS};
use clap::ValueEnum;
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// How chunks are turned into a final aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fixed worker pool, one partial map per chunk, merged at the end
    #[default]
    Parallel,
    /// Single thread folding every line into one map
    Sequential,
}

/// Settings consumed by the aggregation engine.
///
/// Layered lowest to highest: built-in defaults, an optional TOML file,
/// `STATION_STATS_*` environment variables, then explicit command-line flags.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct AggregationConfig {
    #[validate(range(min = 1, max = MAX_WORKERS))]
    pub max_workers: usize,

    #[validate(range(min = 1))]
    pub chunk_size: usize,

    pub max_lines: Option<usize>,

    pub strategy: Strategy,

    pub use_mmap: bool,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_lines: None,
            strategy: Strategy::default(),
            use_mmap: false,
        }
    }
}

impl AggregationConfig {
    /// Read the file and environment layers and validate the result
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validated()
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
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

    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}
