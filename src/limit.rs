//! Caps how many bytes of an inner source are visible.

use crate::error::{Error, Result};
use crate::source::BufferedSource;

/// A source that exposes at most `limit` bytes of its inner source.
///
/// Shares the inner source's buffer: the window is a prefix of the inner
/// window. The unexposed remainder of the quota is tracked separately so
/// limits far larger than the buffer work without reading ahead.
pub struct LimitedSource<S: BufferedSource> {
    inner: S,
    in_buffer: usize,
    remainder: u64,
}

impl<S: BufferedSource> LimitedSource<S> {
    /// Creates a source exposing at most `limit` bytes of `inner`.
    pub fn new(inner: S, limit: u64) -> Self {
        let mut source = Self {
            inner,
            in_buffer: 0,
            remainder: 0,
        };
        source.update_limits(limit);
        source
    }

    /// Consumes the source, returning the inner source.
    ///
    /// The inner source is positioned wherever consumption left it; bytes
    /// of the quota never read remain unread upstream.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Splits the remaining quota into the visible prefix of the inner
    /// window and the upstream remainder.
    fn update_limits(&mut self, limit: u64) {
        let inner_count = self.inner.peek().len() as u64;
        if limit > inner_count {
            self.in_buffer = inner_count as usize;
            self.remainder = limit - inner_count;
        } else {
            self.in_buffer = limit as usize;
            self.remainder = 0;
        }
    }
}

impl<S: BufferedSource> BufferedSource for LimitedSource<S> {
    fn peek(&self) -> &[u8] {
        &self.inner.peek()[..self.in_buffer]
    }

    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn is_exhausted(&self) -> bool {
        self.remainder == 0 || self.inner.is_exhausted()
    }

    fn fill(&mut self) -> Result<usize> {
        if self.remainder > 0 {
            self.inner.fill()?;
            self.update_limits(self.in_buffer as u64 + self.remainder);
        }
        Ok(self.in_buffer)
    }

    fn ensure(&mut self, size: usize) -> Result<()> {
        if size > self.capacity() {
            return Err(Error::size_out_of_range(
                size as u64,
                self.capacity() as u64,
            ));
        }
        while self.in_buffer < size {
            if self.is_exhausted() {
                return Err(Error::insufficient_data(size, self.in_buffer));
            }
            self.fill()?;
        }
        Ok(())
    }

    fn consume(&mut self, size: usize) -> Result<()> {
        if size > self.in_buffer {
            return Err(Error::size_out_of_range(size as u64, self.in_buffer as u64));
        }
        self.inner.consume(size)?;
        self.in_buffer -= size;
        Ok(())
    }

    fn skip(&mut self, size: u64) -> Result<u64> {
        let total = self.in_buffer as u64 + self.remainder;
        if size < total {
            let skipped = self.inner.skip(size)?;
            self.update_limits(total - skipped);
            Ok(skipped)
        } else {
            // The caller wants the whole quota (or more): hand the inner
            // source exactly the quota and report what it managed.
            let skipped = self.inner.skip(total)?;
            self.in_buffer = 0;
            self.remainder = 0;
            Ok(skipped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArraySource;
    use crate::ext::BufferedSourceExt;

    #[test]
    fn limit_caps_visible_bytes() {
        let mut source = LimitedSource::new(ArraySource::new([1u8, 2, 3, 4, 5]), 3);
        assert_eq!(source.fill().unwrap(), 3);
        assert_eq!(source.peek(), &[1, 2, 3]);
        assert!(source.is_exhausted());
        assert_eq!(source.read_all().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn limit_beyond_content_exposes_everything() {
        let mut source = LimitedSource::new(ArraySource::new([1u8, 2]), 100);
        assert_eq!(source.read_all().unwrap(), vec![1, 2]);
    }

    #[test]
    fn zero_limit_is_immediately_exhausted() {
        let mut source = LimitedSource::new(ArraySource::new([1u8, 2]), 0);
        assert!(source.is_exhausted());
        assert_eq!(source.fill().unwrap(), 0);
        assert_eq!(source.skip(10).unwrap(), 0);
    }

    #[test]
    fn skip_of_whole_quota_empties_the_source() {
        let mut source = LimitedSource::new(ArraySource::new([1u8, 2, 3, 4]), 3);
        assert_eq!(source.skip(50).unwrap(), 3);
        assert!(source.peek().is_empty());
        assert!(source.is_exhausted());
        // The fourth byte stays with the inner source.
        assert_eq!(source.into_inner().peek(), &[4]);
    }

    #[test]
    fn ensure_past_quota_is_insufficient() {
        let mut source = LimitedSource::new(ArraySource::new([1u8, 2, 3, 4]), 2);
        assert!(matches!(
            source.ensure(3),
            Err(Error::InsufficientData { .. })
        ));
    }
}
