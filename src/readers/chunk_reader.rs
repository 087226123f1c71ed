use crate::error::{ProcessingError, Result};
use crate::models::Chunk;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, LINE_TERMINATOR};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Open the input file, distinguishing a missing file from one that exists
/// but cannot be read.
pub fn open_input(path: &Path) -> Result<File> {
    if path.is_dir() {
        return Err(ProcessingError::InputUnreadable {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "path is a directory"),
        });
    }

    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ProcessingError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => ProcessingError::InputUnreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Memory-map the input file
pub fn map_input(path: &Path) -> Result<Mmap> {
    let file = open_input(path)?;
    // The file is treated as read-only input for the duration of the run
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| ProcessingError::InputUnreadable {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(mmap)
}

/// Tracks the `max_lines` budget shared by both chunk sources
#[derive(Debug, Clone, Copy)]
struct LineBudget {
    chunk_size: usize,
    remaining: Option<usize>,
}

impl LineBudget {
    fn new(chunk_size: usize, max_lines: Option<usize>) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            remaining: max_lines,
        }
    }

    /// How many lines the next chunk may hold
    fn next_chunk_lines(&self) -> usize {
        match self.remaining {
            Some(remaining) => remaining.min(self.chunk_size),
            None => self.chunk_size,
        }
    }

    fn consume(&mut self, lines: usize) {
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(lines);
        }
    }
}

/// Lazily splits a buffered reader into chunks of at most `chunk_size` lines.
///
/// Only the chunk currently being filled is held by the reader; once yielded
/// the chunk belongs to the caller.
pub struct ChunkReader<R> {
    reader: R,
    budget: LineBudget,
    next_index: usize,
    capacity_hint: usize,
    finished: bool,
}

impl ChunkReader<BufReader<File>> {
    /// Open `path` for chunked reading
    pub fn open(path: &Path, chunk_size: usize, max_lines: Option<usize>) -> Result<Self> {
        let file = open_input(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        Ok(Self::new(reader, chunk_size, max_lines))
    }
}

impl<R: BufRead> ChunkReader<R> {
    pub fn new(reader: R, chunk_size: usize, max_lines: Option<usize>) -> Self {
        Self {
            reader,
            budget: LineBudget::new(chunk_size, max_lines),
            next_index: 0,
            capacity_hint: 0,
            finished: false,
        }
    }

    fn read_chunk(&mut self) -> Result<Option<Chunk<'static>>> {
        let wanted = self.budget.next_chunk_lines();
        if wanted == 0 {
            return Ok(None);
        }

        let mut data = Vec::with_capacity(self.capacity_hint);
        let mut lines = 0;

        while lines < wanted {
            if self.reader.read_until(LINE_TERMINATOR, &mut data)? == 0 {
                break;
            }
            lines += 1;
        }

        if lines == 0 {
            return Ok(None);
        }

        self.budget.consume(lines);
        self.capacity_hint = self.capacity_hint.max(data.len());

        let chunk = Chunk::new(self.next_index, data, lines);
        self.next_index += 1;
        Ok(Some(chunk))
    }
}

impl<R: BufRead> Iterator for ChunkReader<R> {
    type Item = Result<Chunk<'static>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Splits a memory-mapped (or any in-memory) buffer into chunks that borrow
/// their lines instead of copying them.
pub struct MmapChunkReader<'a> {
    data: &'a [u8],
    position: usize,
    budget: LineBudget,
    next_index: usize,
}

impl<'a> MmapChunkReader<'a> {
    pub fn new(data: &'a [u8], chunk_size: usize, max_lines: Option<usize>) -> Self {
        Self {
            data,
            position: 0,
            budget: LineBudget::new(chunk_size, max_lines),
            next_index: 0,
        }
    }
}

impl<'a> Iterator for MmapChunkReader<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let wanted = self.budget.next_chunk_lines();
        if wanted == 0 || self.position >= self.data.len() {
            return None;
        }

        let start = self.position;
        let mut lines = 0;

        while lines < wanted && self.position < self.data.len() {
            let rest = &self.data[self.position..];
            self.position += rest
                .iter()
                .position(|&b| b == LINE_TERMINATOR)
                .map_or(rest.len(), |offset| offset + 1);
            lines += 1;
        }

        self.budget.consume(lines);

        let chunk = Chunk::new(self.next_index, &self.data[start..self.position], lines);
        self.next_index += 1;
        Some(Ok(chunk))
    }
}
