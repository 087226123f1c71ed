use crate::models::{AggregateMap, Chunk};
use crate::readers::parse_record;
use crate::utils::constants::DEFAULT_STATION_CAPACITY;

/// Partial aggregate for one chunk, plus how many of its lines were usable
#[derive(Debug, Clone, Default)]
pub struct ChunkResult {
    pub chunk_index: usize,
    pub partial: AggregateMap,
    pub lines: usize,
    pub records: usize,
}

impl ChunkResult {
    pub fn skipped(&self) -> usize {
        self.lines - self.records
    }
}

/// Parse and accumulate `lines` into `into`, returning `(lines, records)`.
///
/// Malformed lines are counted but otherwise ignored.
pub fn aggregate_lines<'l, I>(lines: I, into: &mut AggregateMap) -> (usize, usize)
where
    I: IntoIterator<Item = &'l [u8]>,
{
    let mut line_count = 0;
    let mut record_count = 0;

    for line in lines {
        line_count += 1;
        if let Some(record) = parse_record(line) {
            into.observe_record(&record);
            record_count += 1;
        }
    }

    (line_count, record_count)
}

/// Run the parser and aggregator over one chunk, in line order
pub fn aggregate_chunk(chunk: &Chunk<'_>) -> ChunkResult {
    let mut partial = AggregateMap::with_capacity(DEFAULT_STATION_CAPACITY);
    let (lines, records) = aggregate_lines(chunk.lines(), &mut partial);

    ChunkResult {
        chunk_index: chunk.index(),
        partial,
        lines,
        records,
    }
}
