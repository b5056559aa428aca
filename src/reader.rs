//! A `std::io` view over a buffered source.

use std::io::{self, BufRead, Read};

use crate::error::Error;
use crate::source::BufferedSource;

fn to_io(e: Error) -> io::Error {
    match e {
        Error::Io(inner) => inner,
        other => io::Error::new(io::ErrorKind::Other, other),
    }
}

/// A read-only `std::io::Read`/`BufRead` adapter over any
/// [`BufferedSource`].
///
/// Writing and seeking are simply not offered. `read` returns `Ok(0)`
/// once the source is exhausted and drained.
pub struct SourceReader<S: BufferedSource> {
    source: S,
}

impl<S: BufferedSource> SourceReader<S> {
    /// Creates a reader over `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Get a reference to the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume this reader and return the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Reads one byte, or `Ok(None)` at end of stream.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.wait_for_window()?;
        match self.source.peek().first() {
            Some(&byte) => {
                self.source.consume(1).map_err(to_io)?;
                Ok(Some(byte))
            }
            None => Ok(None),
        }
    }

    /// Fill until the window is non-empty, the source exhausts, or no
    /// further progress is possible.
    fn wait_for_window(&mut self) -> io::Result<()> {
        while self.source.peek().is_empty() && !self.source.is_exhausted() {
            let before = self.source.peek().len();
            self.source.fill().map_err(to_io)?;
            if self.source.peek().len() == before && !self.source.is_exhausted() {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    "source cannot make progress with the current buffer",
                ));
            }
        }
        Ok(())
    }
}

impl<S: BufferedSource> Read for SourceReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.wait_for_window()?;
        let window = self.source.peek();
        let n = window.len().min(buf.len());
        buf[..n].copy_from_slice(&window[..n]);
        self.source.consume(n).map_err(to_io)?;
        Ok(n)
    }
}

impl<S: BufferedSource> BufRead for SourceReader<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.wait_for_window()?;
        Ok(self.source.peek())
    }

    fn consume(&mut self, amt: usize) {
        let n = amt.min(self.source.peek().len());
        // Clamped above, so this cannot fail.
        let _ = self.source.consume(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArraySource;
    use crate::stream::StreamSource;
    use std::io::Cursor;

    #[test]
    fn read_drains_the_source() {
        let data: Vec<u8> = (0..20).collect();
        let source = StreamSource::new(Cursor::new(data.clone()), vec![0u8; 3]);
        let mut reader = SourceReader::new(source);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn read_byte_returns_none_at_end() {
        let mut reader = SourceReader::new(ArraySource::new([42u8]));
        assert_eq!(reader.read_byte().unwrap(), Some(42));
        assert_eq!(reader.read_byte().unwrap(), None);
    }

    #[test]
    fn bufread_lines_work_over_a_source() {
        let source = ArraySource::new("one\ntwo\nthree".as_bytes());
        let reader = SourceReader::new(source);
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, ["one", "two", "three"]);
    }
}
