pub mod chunk_reader;
pub mod record_parser;

pub use chunk_reader::{map_input, open_input, ChunkReader, MmapChunkReader};
pub use record_parser::parse_record;
