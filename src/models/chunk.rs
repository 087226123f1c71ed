use std::borrow::Cow;

/// A bounded run of consecutive input lines.
///
/// The buffer holds the raw bytes of `line_count` lines, each terminated by
/// `\n` except possibly the last line of the file. Chunks produced by the
/// buffered reader own their bytes; chunks cut from a memory map borrow them.
#[derive(Debug, Clone)]
pub struct Chunk<'a> {
    index: usize,
    data: Cow<'a, [u8]>,
    line_count: usize,
}

impl<'a> Chunk<'a> {
    pub fn new(index: usize, data: impl Into<Cow<'a, [u8]>>, line_count: usize) -> Self {
        Self {
            index,
            data: data.into(),
            line_count,
        }
    }

    /// Position of this chunk in the input, starting at zero
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    /// Lines in file order with the `\n` terminator removed
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data
            .split_inclusive(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\n").unwrap_or(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_strip_terminators() {
        let chunk = Chunk::new(0, b"Oslo;1.0\nBerlin;2.0\n".to_vec(), 2);
        let lines: Vec<&[u8]> = chunk.lines().collect();

        assert_eq!(lines, vec![&b"Oslo;1.0"[..], &b"Berlin;2.0"[..]]);
    }

    #[test]
    fn test_last_line_without_terminator() {
        let chunk = Chunk::new(3, &b"Oslo;1.0\nBerlin;2.0"[..], 2);
        let lines: Vec<&[u8]> = chunk.lines().collect();

        assert_eq!(chunk.index(), 3);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], b"Berlin;2.0");
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let chunk = Chunk::new(0, b"a;1\n\nb;2\n".to_vec(), 3);

        assert_eq!(chunk.lines().count(), 3);
        assert_eq!(chunk.lines().nth(1), Some(&b""[..]));
    }
}
