/// Separator between station name and temperature
pub const RECORD_SEPARATOR: u8 = b';';

/// Line terminator
pub const LINE_TERMINATOR: u8 = b'\n';

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 500_000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const DEFAULT_STATION_CAPACITY: usize = 512;
pub const MAX_WORKERS: usize = 1024;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "STATION_STATS";

/// Synthetic data generation
pub const DEFAULT_GENERATED_STATIONS: usize = 400;
pub const MIN_GENERATED_TEMP: f64 = -99.9;
pub const MAX_GENERATED_TEMP: f64 = 99.9;
