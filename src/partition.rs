//! Splits a stream into parts by a consumer-supplied predicate.

use crate::error::{Error, Result};
use crate::source::BufferedSource;

/// What a [`PartValidator`] concluded about the window it inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartVerdict {
    /// Window-relative length of the prefix classified as part interior.
    pub validated: usize,
    /// Whether the end of the current part was located.
    pub end_found: bool,
    /// Bytes following the validated prefix to discard when jumping to
    /// the next part. Only meaningful when `end_found` is set.
    pub epilogue: usize,
}

/// A strategy that classifies buffered bytes as part interior or part
/// boundary.
///
/// [`PartitionedSource`] calls [`validate`](Self::validate) whenever new
/// bytes arrive, passing how many leading bytes were already validated by
/// earlier calls; an implementation only needs to examine the tail from
/// that point on. The verdict's `validated` must never shrink and never
/// exceed `window.len()`, and `validated + epilogue` must stay within the
/// window when `end_found` is set.
pub trait PartValidator {
    fn validate(&mut self, window: &[u8], already_validated: usize) -> PartVerdict;
}

/// A source that exposes one predicate-delimited part of its inner source
/// at a time.
///
/// Shares the inner source's buffer; the window is the validated prefix.
/// The part ends where the validator says it does; the epilogue bytes are
/// consumed but never exposed. Like [`DelimitedSource`], a trailing
/// unterminated part stays readable, and [`skip_part`](Self::skip_part)
/// drains it and reports `false`.
///
/// [`DelimitedSource`]: crate::DelimitedSource
pub struct PartitionedSource<S: BufferedSource, V: PartValidator> {
    inner: S,
    validator: V,
    validated: usize,
    end_found: bool,
    epilogue: usize,
}

impl<S: BufferedSource, V: PartValidator> PartitionedSource<S, V> {
    /// Creates a source partitioning `inner` according to `validator`.
    pub fn new(inner: S, validator: V) -> Self {
        let mut source = Self {
            inner,
            validator,
            validated: 0,
            end_found: false,
            epilogue: 0,
        };
        source.revalidate();
        source
    }

    /// Consumes the source, returning the inner source and the validator.
    pub fn into_inner(self) -> (S, V) {
        (self.inner, self.validator)
    }

    fn revalidate(&mut self) {
        let verdict = self
            .validator
            .validate(self.inner.peek(), self.validated);
        debug_assert!(verdict.validated >= self.validated);
        debug_assert!(verdict.validated <= self.inner.peek().len());
        self.validated = verdict.validated;
        self.end_found = verdict.end_found;
        self.epilogue = if verdict.end_found { verdict.epilogue } else { 0 };
    }

    /// Advances past the current part and its epilogue.
    ///
    /// Returns `true` when positioned at the start of the next part, or
    /// `false` when the inner source ran out without another part
    /// boundary (trailing bytes are drained). Fails with
    /// [`Error::BufferTooSmall`] when the boundary cannot be detected
    /// within one buffer-worth of unconsumed data.
    ///
    /// [`Error::BufferTooSmall`]: crate::Error::BufferTooSmall
    pub fn skip_part(&mut self) -> Result<bool> {
        if self.inner.is_exhausted() && self.inner.peek().is_empty() {
            return Ok(false);
        }
        while !self.end_found {
            // Discard what is already classified and look further.
            self.inner.consume(self.validated)?;
            self.validated = 0;
            if self.inner.is_exhausted() {
                let rest = self.inner.peek().len();
                self.inner.consume(rest)?;
                return Ok(false);
            }
            let before = self.inner.peek().len();
            self.inner.fill()?;
            self.revalidate();
            if !self.end_found && self.inner.peek().len() == before && !self.inner.is_exhausted()
            {
                return Err(Error::buffer_too_small(
                    "part boundary not detectable within one buffer of data",
                ));
            }
        }
        self.inner.consume(self.validated + self.epilogue)?;
        self.validated = 0;
        self.end_found = false;
        self.epilogue = 0;
        self.revalidate();
        Ok(true)
    }
}

impl<S: BufferedSource, V: PartValidator> BufferedSource for PartitionedSource<S, V> {
    fn peek(&self) -> &[u8] {
        &self.inner.peek()[..self.validated]
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn is_exhausted(&self) -> bool {
        self.end_found
            || (self.inner.is_exhausted() && self.validated >= self.inner.peek().len())
    }

    fn fill(&mut self) -> Result<usize> {
        if !self.end_found {
            self.inner.fill()?;
            self.revalidate();
        }
        Ok(self.validated)
    }

    fn ensure(&mut self, size: usize) -> Result<()> {
        if size > self.capacity() {
            return Err(Error::size_out_of_range(
                size as u64,
                self.capacity() as u64,
            ));
        }
        while self.validated < size {
            if self.is_exhausted() {
                return Err(Error::insufficient_data(size, self.validated));
            }
            let before = self.inner.peek().len();
            self.fill()?;
            if self.validated < size
                && self.inner.peek().len() == before
                && !self.is_exhausted()
            {
                return Err(Error::insufficient_data(size, self.validated));
            }
        }
        Ok(())
    }

    fn consume(&mut self, size: usize) -> Result<()> {
        if size > self.validated {
            return Err(Error::size_out_of_range(size as u64, self.validated as u64));
        }
        self.inner.consume(size)?;
        self.validated -= size;
        Ok(())
    }

    fn skip(&mut self, size: u64) -> Result<u64> {
        let mut skipped = 0u64;
        loop {
            let remaining = size - skipped;
            let avail = self.validated as u64;
            if avail >= remaining {
                self.inner.consume(remaining as usize)?;
                self.validated -= remaining as usize;
                return Ok(size);
            }
            self.inner.consume(self.validated)?;
            skipped += avail;
            self.validated = 0;
            if self.is_exhausted() {
                return Ok(skipped);
            }
            let before = self.inner.peek().len();
            self.fill()?;
            if self.validated == 0
                && self.inner.peek().len() == before
                && !self.is_exhausted()
            {
                return Err(Error::buffer_too_small(
                    "part boundary not detectable within one buffer of data",
                ));
            }
        }
    }
}
