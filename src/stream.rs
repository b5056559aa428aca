//! Adapts an external byte stream into the buffer-window contract.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{Error, Result};
use crate::source::BufferedSource;

//--- Stream collaborator trait and adapters ---

/// A readable byte stream that may know how to skip ahead without
/// surfacing the skipped bytes.
///
/// This is the strategy seam of [`StreamSource`]: wrap any `io::Read` in
/// [`Sequential`], or a seekable one in [`Seekable`] to get cheap far
/// skips.
pub trait SkipRead {
    /// Reads into `buf`, returning the number of bytes read. `0` means
    /// the stream has ended.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Skips up to `size` bytes ahead without reading them.
    ///
    /// Returns `Ok(Some(n))` with the number actually skipped (short only
    /// at end of stream), or `Ok(None)` when the stream cannot skip and
    /// the caller must fall back to draining reads.
    fn skip_ahead(&mut self, size: u64) -> io::Result<Option<u64>>;
}

/// A stream that can only be read front to back.
pub struct Sequential<R>(pub R);

impl<R: Read> SkipRead for Sequential<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }

    fn skip_ahead(&mut self, _size: u64) -> io::Result<Option<u64>> {
        Ok(None)
    }
}

/// A stream that supports seeking past bytes it has not produced.
///
/// A nominally seekable stream may still refuse at runtime (for example a
/// wrapped pipe); `ErrorKind::Unsupported` demotes it to the sequential
/// fallback rather than failing the skip.
pub struct Seekable<R>(pub R);

impl<R: Read + Seek> SkipRead for Seekable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }

    fn skip_ahead(&mut self, size: u64) -> io::Result<Option<u64>> {
        let position = match self.0.stream_position() {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::Unsupported => return Ok(None),
            Err(e) => return Err(e),
        };
        let end = match self.0.seek(SeekFrom::End(0)) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Unsupported => return Ok(None),
            Err(e) => return Err(e),
        };
        let step = size.min(end.saturating_sub(position));
        self.0.seek(SeekFrom::Start(position + step))?;
        Ok(Some(step))
    }
}

//--- The stream-backed source ---

/// A source that pulls bytes from an external stream on demand.
///
/// Owns the byte buffer supplied at construction; each
/// [`fill`](BufferedSource::fill) reclaims consumed space at the front of
/// the buffer (shifting the surviving window bytes, order preserved) and
/// issues one read into the free tail.
pub struct StreamSource<S: SkipRead> {
    stream: S,
    buffer: Vec<u8>,
    offset: usize,
    count: usize,
    ended: bool,
}

impl<R: Read> StreamSource<Sequential<R>> {
    /// Creates a source over a purely sequential reader.
    ///
    /// # Panics
    ///
    /// Panics when `buffer` is empty.
    pub fn new(reader: R, buffer: Vec<u8>) -> Self {
        Self::from_stream(Sequential(reader), buffer)
    }
}

impl<R: Read + Seek> StreamSource<Seekable<R>> {
    /// Creates a source over a seekable reader; far skips become seeks.
    ///
    /// # Panics
    ///
    /// Panics when `buffer` is empty.
    pub fn seekable(reader: R, buffer: Vec<u8>) -> Self {
        Self::from_stream(Seekable(reader), buffer)
    }
}

impl<S: SkipRead> StreamSource<S> {
    /// Creates a source over any [`SkipRead`] stream.
    ///
    /// # Panics
    ///
    /// Panics when `buffer` is empty.
    pub fn from_stream(stream: S, buffer: Vec<u8>) -> Self {
        assert!(!buffer.is_empty(), "buffer must hold at least one byte");
        Self {
            stream,
            buffer,
            offset: 0,
            count: 0,
            ended: false,
        }
    }

    /// Consumes the source, returning the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Shift the window to the front of the buffer when the tail is full.
    fn reclaim_tail(&mut self) {
        if self.offset > 0 && self.offset + self.count == self.buffer.len() {
            if self.count > 0 {
                self.buffer
                    .copy_within(self.offset..self.offset + self.count, 0);
            }
            self.offset = 0;
        }
    }
}

fn read_retrying<S: SkipRead>(stream: &mut S, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

impl<S: SkipRead> BufferedSource for StreamSource<S> {
    fn peek(&self) -> &[u8] {
        &self.buffer[self.offset..self.offset + self.count]
    }

    fn capacity(&self) -> usize {
        self.buffer.len()
    }

    fn is_exhausted(&self) -> bool {
        self.ended
    }

    fn fill(&mut self) -> Result<usize> {
        if !self.ended {
            self.reclaim_tail();
            let start = self.offset + self.count;
            if start < self.buffer.len() {
                let read = read_retrying(&mut self.stream, &mut self.buffer[start..])?;
                if read == 0 {
                    self.ended = true;
                } else {
                    self.count += read;
                }
            }
        }
        Ok(self.count)
    }

    fn ensure(&mut self, size: usize) -> Result<()> {
        if size > self.buffer.len() {
            return Err(Error::size_out_of_range(
                size as u64,
                self.buffer.len() as u64,
            ));
        }
        while self.count < size && !self.ended {
            self.fill()?;
        }
        if self.count < size {
            return Err(Error::insufficient_data(size, self.count));
        }
        Ok(())
    }

    fn consume(&mut self, size: usize) -> Result<()> {
        if size > self.count {
            return Err(Error::size_out_of_range(size as u64, self.count as u64));
        }
        self.offset += size;
        self.count -= size;
        Ok(())
    }

    fn skip(&mut self, size: u64) -> Result<u64> {
        if size <= self.count as u64 {
            self.offset += size as usize;
            self.count -= size as usize;
            return Ok(size);
        }

        // The whole window goes; the rest comes from upstream.
        let from_window = self.count as u64;
        self.offset = 0;
        self.count = 0;
        if self.ended {
            return Ok(from_window);
        }
        let mut remaining = size - from_window;

        if let Some(stepped) = self.stream.skip_ahead(remaining)? {
            if stepped < remaining {
                self.ended = true;
            }
            return Ok(from_window + stepped);
        }

        // Sequential fallback: drain whole-buffer reads, keeping any
        // overshoot as the new window.
        let mut skipped = from_window;
        while remaining > 0 {
            let read = read_retrying(&mut self.stream, &mut self.buffer[..])?;
            if read == 0 {
                self.ended = true;
                break;
            }
            if (read as u64) > remaining {
                self.offset = remaining as usize;
                self.count = read - self.offset;
                skipped += remaining;
                remaining = 0;
            } else {
                skipped += read as u64;
                remaining -= read as u64;
            }
        }
        Ok(skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn fill_reads_and_reports_eof() {
        let mut source = StreamSource::new(Cursor::new(vec![1u8, 2, 3]), vec![0u8; 8]);
        assert_eq!(source.fill().unwrap(), 3);
        assert_eq!(source.peek(), &[1, 2, 3]);
        assert!(!source.is_exhausted());
        assert_eq!(source.fill().unwrap(), 3);
        assert!(source.is_exhausted());
    }

    #[test]
    fn consume_preserves_window_tail() {
        let mut source = StreamSource::new(Cursor::new(vec![1u8, 2, 3, 4]), vec![0u8; 4]);
        source.ensure(4).unwrap();
        source.consume(2).unwrap();
        assert_eq!(source.peek(), &[3, 4]);
    }

    #[test]
    fn fill_reclaims_consumed_space() {
        // Buffer of 3 over 5 bytes: consuming from a full buffer must let
        // fill shift the survivors forward and read more.
        let mut source = StreamSource::new(Cursor::new(vec![1u8, 2, 3, 4, 5]), vec![0u8; 3]);
        source.ensure(3).unwrap();
        source.consume(2).unwrap();
        source.ensure(3).unwrap();
        assert_eq!(source.peek(), &[3, 4, 5]);
    }

    #[test]
    fn interrupted_reads_are_retried() {
        struct Flaky {
            data: Cursor<Vec<u8>>,
            hiccup: bool,
        }
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.hiccup {
                    self.hiccup = false;
                    return Err(io::Error::from(io::ErrorKind::Interrupted));
                }
                self.hiccup = true;
                self.data.read(buf)
            }
        }

        let flaky = Flaky {
            data: Cursor::new(vec![9u8, 8, 7]),
            hiccup: true,
        };
        let mut source = StreamSource::new(flaky, vec![0u8; 2]);
        source.ensure(2).unwrap();
        assert_eq!(source.peek(), &[9, 8]);
    }
}
