//! An already-full source over in-memory bytes.

use crate::error::{Error, Result};
use crate::source::BufferedSource;

/// A source whose entire content is present up front.
///
/// The window initially covers the whole slice and the source is
/// permanently exhausted: [`fill`](BufferedSource::fill) is a no-op and
/// [`ensure`](BufferedSource::ensure) can only fail once the request
/// outgrows what is left.
pub struct ArraySource<B: AsRef<[u8]>> {
    data: B,
    offset: usize,
    count: usize,
}

impl<B: AsRef<[u8]>> ArraySource<B> {
    /// Creates a source over all of `data`.
    pub fn new(data: B) -> Self {
        let count = data.as_ref().len();
        Self {
            data,
            offset: 0,
            count,
        }
    }

    /// Creates a source over `data[offset..offset + count]`.
    ///
    /// # Panics
    ///
    /// Panics when the region falls outside `data`.
    pub fn slice(data: B, offset: usize, count: usize) -> Self {
        let len = data.as_ref().len();
        assert!(
            offset <= len && count <= len - offset,
            "region {offset}+{count} outside buffer of {len} bytes"
        );
        Self {
            data,
            offset,
            count,
        }
    }
}

impl<B: AsRef<[u8]>> BufferedSource for ArraySource<B> {
    fn peek(&self) -> &[u8] {
        &self.data.as_ref()[self.offset..self.offset + self.count]
    }

    fn capacity(&self) -> usize {
        self.data.as_ref().len()
    }

    fn is_exhausted(&self) -> bool {
        true
    }

    fn fill(&mut self) -> Result<usize> {
        Ok(self.count)
    }

    fn ensure(&mut self, size: usize) -> Result<()> {
        if size > self.capacity() {
            return Err(Error::size_out_of_range(
                size as u64,
                self.capacity() as u64,
            ));
        }
        if size > self.count {
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
        let skipped = size.min(self.count as u64) as usize;
        self.offset += skipped;
        self.count -= skipped;
        Ok(skipped as u64)
    }
}
