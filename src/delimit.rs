//! Splits a stream into parts at a fixed byte delimiter.

use crate::error::{Error, Result};
use crate::source::BufferedSource;

/// A source that exposes bytes up to (not including) the next occurrence
/// of a fixed delimiter in its inner source.
///
/// Shares the inner source's buffer. The scanner keeps an anchor to the
/// earliest position that could still start a delimiter match, tracked
/// *relative to the window start*: bytes survive upstream shifts in
/// order, so already-rejected bytes are never re-scanned.
///
/// Once the delimiter is fully matched the part ends and the source
/// reports exhausted; [`skip_part`](Self::skip_part) advances past the
/// delimiter to the next part. When the inner source ends without a
/// match, the trailing bytes form a final, unterminated part:
/// they remain readable, and `skip_part` drains them and returns `false`.
pub struct DelimitedSource<S: BufferedSource> {
    inner: S,
    delimiter: Vec<u8>,
    /// Window-relative position where a delimiter match could begin.
    match_pos: usize,
    /// Number of delimiter prefix bytes verified at `match_pos`.
    match_len: usize,
}

impl<S: BufferedSource> DelimitedSource<S> {
    /// Creates a source splitting `inner` at `delimiter`.
    ///
    /// # Panics
    ///
    /// Panics when `delimiter` is empty or longer than the inner buffer.
    pub fn new(inner: S, delimiter: impl Into<Vec<u8>>) -> Self {
        let delimiter = delimiter.into();
        assert!(!delimiter.is_empty(), "delimiter must not be empty");
        assert!(
            delimiter.len() <= inner.capacity(),
            "delimiter of {} bytes cannot fit the inner buffer of {} bytes",
            delimiter.len(),
            inner.capacity()
        );
        let mut source = Self {
            inner,
            delimiter,
            match_pos: 0,
            match_len: 0,
        };
        source.scan();
        source
    }

    /// Consumes the source, returning the inner source.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn found(&self) -> bool {
        self.match_len == self.delimiter.len()
    }

    /// Extends the scan over bytes not yet classified.
    ///
    /// Byte-at-a-time prefix matching; delimiters are short, so the
    /// quadratic worst case does not matter in practice.
    fn scan(&mut self) {
        let window = self.inner.peek();
        while self.match_len < self.delimiter.len() {
            let cursor = self.match_pos + self.match_len;
            if cursor >= window.len() {
                break;
            }
            if window[cursor] == self.delimiter[self.match_len] {
                self.match_len += 1;
            } else {
                self.match_pos += 1;
                self.match_len = 0;
            }
        }
        if self.match_len < self.delimiter.len() && self.inner.is_exhausted() {
            // No match can ever complete; the rest is the final part.
            self.match_pos = window.len();
            self.match_len = 0;
        }
    }

    /// Advances past the current part and its delimiter.
    ///
    /// Returns `true` when positioned at the start of the next part, or
    /// `false` when the inner source ran out without another delimiter
    /// (any trailing bytes are drained). Fails with
    /// [`Error::BufferTooSmall`] when the delimiter cannot be located
    /// within one buffer-worth of unconsumed data.
    ///
    /// [`Error::BufferTooSmall`]: crate::Error::BufferTooSmall
    pub fn skip_part(&mut self) -> Result<bool> {
        loop {
            if self.found() {
                let jump = self.match_pos + self.delimiter.len();
                self.inner.consume(jump)?;
                self.match_pos = 0;
                self.match_len = 0;
                self.scan();
                return Ok(true);
            }
            // Drop the bytes known not to start the delimiter.
            self.inner.consume(self.match_pos)?;
            self.match_pos = 0;
            if self.inner.is_exhausted() {
                let rest = self.inner.peek().len();
                self.inner.consume(rest)?;
                self.match_len = 0;
                return Ok(false);
            }
            let before = self.inner.peek().len();
            self.inner.fill()?;
            self.scan();
            if !self.found() && self.inner.peek().len() == before && !self.inner.is_exhausted() {
                return Err(Error::buffer_too_small(
                    "delimiter not found within one buffer of data",
                ));
            }
        }
    }
}

impl<S: BufferedSource> BufferedSource for DelimitedSource<S> {
    fn peek(&self) -> &[u8] {
        &self.inner.peek()[..self.match_pos]
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn is_exhausted(&self) -> bool {
        self.found() || self.inner.is_exhausted()
    }

    fn fill(&mut self) -> Result<usize> {
        if !self.found() {
            self.inner.fill()?;
            self.scan();
        }
        Ok(self.match_pos)
    }

    fn ensure(&mut self, size: usize) -> Result<()> {
        if size > self.capacity() {
            return Err(Error::size_out_of_range(
                size as u64,
                self.capacity() as u64,
            ));
        }
        while self.match_pos < size {
            if self.is_exhausted() {
                return Err(Error::insufficient_data(size, self.match_pos));
            }
            let before = self.inner.peek().len();
            self.fill()?;
            if self.match_pos < size
                && self.inner.peek().len() == before
                && !self.is_exhausted()
            {
                // Window full of a partial delimiter match; more context
                // cannot be bought without a bigger buffer.
                return Err(Error::insufficient_data(size, self.match_pos));
            }
        }
        Ok(())
    }

    fn consume(&mut self, size: usize) -> Result<()> {
        if size > self.match_pos {
            return Err(Error::size_out_of_range(size as u64, self.match_pos as u64));
        }
        self.inner.consume(size)?;
        self.match_pos -= size;
        Ok(())
    }

    fn skip(&mut self, size: u64) -> Result<u64> {
        let mut skipped = 0u64;
        loop {
            let remaining = size - skipped;
            let avail = self.match_pos as u64;
            if avail >= remaining {
                self.inner.consume(remaining as usize)?;
                self.match_pos -= remaining as usize;
                return Ok(size);
            }
            self.inner.consume(self.match_pos)?;
            skipped += avail;
            self.match_pos = 0;
            if self.is_exhausted() {
                return Ok(skipped);
            }
            let before = self.inner.peek().len();
            self.fill()?;
            if self.match_pos == 0
                && self.inner.peek().len() == before
                && !self.is_exhausted()
            {
                return Err(Error::buffer_too_small(
                    "delimiter not found within one buffer of data",
                ));
            }
        }
    }
}
