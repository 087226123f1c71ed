pub mod accumulator;
pub mod aggregate;
pub mod chunk;
pub mod record;

pub use accumulator::StationAccumulator;
pub use aggregate::AggregateMap;
pub use chunk::Chunk;
pub use record::Record;
