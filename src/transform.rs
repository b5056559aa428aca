//! Applies a block-oriented transformation to an inner source.

use crate::error::{Error, Result};
use crate::source::BufferedSource;

/// A block-oriented transformation with independent input and output
/// block sizes.
///
/// The transform consumes input in whole blocks of
/// [`input_block_size`](Self::input_block_size) bytes and produces up to
/// [`output_block_size`](Self::output_block_size) bytes per input block.
/// The trailing partial block (possibly empty) goes through
/// [`transform_final`](Self::transform_final), which is invoked at most
/// once per source lifetime and may emit padding.
pub trait BlockTransform {
    /// Input block size in bytes; at least 1.
    fn input_block_size(&self) -> usize;

    /// Output block size in bytes; at least 1.
    fn output_block_size(&self) -> usize;

    /// Whether [`transform_block`](Self::transform_block) accepts several
    /// input blocks per call.
    fn transforms_multiple_blocks(&self) -> bool;

    /// Transforms `input` (a positive multiple of the input block size;
    /// exactly one block unless
    /// [`transforms_multiple_blocks`](Self::transforms_multiple_blocks))
    /// into `output`, returning the number of bytes produced. `output`
    /// holds one output block per input block.
    fn transform_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize>;

    /// Transforms the final partial block (shorter than one input block,
    /// possibly empty), returning the trailing output.
    fn transform_final(&mut self, input: &[u8]) -> Result<Vec<u8>>;
}

/// A source that exposes the block-transformed content of its inner
/// source.
///
/// Owns its output buffer; input is staged in the inner source's buffer
/// in whole blocks. When the free output space is smaller than one output
/// block, one block is transformed into scratch and the overflow parks in
/// a one-block cache that is drained before anything else on later fills.
pub struct TransformingSource<S: BufferedSource, T: BlockTransform> {
    inner: S,
    transform: T,
    buffer: Vec<u8>,
    offset: usize,
    count: usize,
    /// Spilled output bytes not yet surfaced: `cache[cache_start..cache_end]`.
    cache: Vec<u8>,
    cache_start: usize,
    cache_end: usize,
    /// The final block has been transformed; no further input exists.
    source_ended: bool,
    /// `source_ended` and the cache is drained.
    exhausted: bool,
    /// Whole input blocks the inner buffer can stage (may be 0).
    input_max_blocks: usize,
}

impl<S: BufferedSource, T: BlockTransform> TransformingSource<S, T> {
    /// Creates a source exposing `transform(inner)`.
    ///
    /// # Panics
    ///
    /// Panics when either block size is 0 or `buffer` is smaller than one
    /// output block.
    pub fn new(inner: S, transform: T, buffer: Vec<u8>) -> Self {
        let ib = transform.input_block_size();
        let ob = transform.output_block_size();
        assert!(ib >= 1 && ob >= 1, "block sizes must be at least 1");
        assert!(
            buffer.len() >= ob.max(1),
            "buffer of {} bytes cannot hold one {ob}-byte output block",
            buffer.len()
        );
        let input_max_blocks = inner.capacity() / ib;
        Self {
            inner,
            transform,
            buffer,
            offset: 0,
            count: 0,
            cache: Vec::new(),
            cache_start: 0,
            cache_end: 0,
            source_ended: false,
            exhausted: false,
            input_max_blocks,
        }
    }

    /// Consumes the source, returning the inner source and the transform.
    pub fn into_inner(self) -> (S, T) {
        (self.inner, self.transform)
    }

    fn defragment(&mut self) {
        if self.offset > 0 {
            if self.count > 0 {
                self.buffer
                    .copy_within(self.offset..self.offset + self.count, 0);
            }
            self.offset = 0;
        }
    }

    /// Surfaces spilled bytes from the cache. Returns bytes produced.
    fn load_from_cache(&mut self, out_free: usize) -> usize {
        let cached = self.cache_end - self.cache_start;
        if cached == 0 {
            return 0;
        }
        let n = cached.min(out_free);
        let dst = self.offset + self.count;
        self.buffer[dst..dst + n]
            .copy_from_slice(&self.cache[self.cache_start..self.cache_start + n]);
        self.cache_start += n;
        if self.cache_start == self.cache_end && self.source_ended {
            self.exhausted = true;
        }
        n
    }

    /// Stages inner bytes and runs the transform once. Returns bytes
    /// produced directly into the output buffer (spill goes to the cache).
    fn load_from_source(&mut self, out_free: usize) -> Result<usize> {
        let ib = self.transform.input_block_size();
        let ob = self.transform.output_block_size();
        let multi = self.transform.transforms_multiple_blocks();

        // Couple staged input to the output space at hand: enough blocks
        // to fill it, bounded by what the inner buffer can stage.
        let staged = if self.input_max_blocks == 0 {
            self.inner.capacity()
        } else {
            (out_free / ob).min(self.input_max_blocks).max(1) * ib
        };
        let want = if multi { staged } else { ib };
        if want > self.inner.peek().len() && !self.inner.is_exhausted() {
            // One fill issues one read, which may come back short; keep
            // filling while the window still grows. Stopping below one
            // block with the source live means the inner buffer cannot
            // stage a block.
            loop {
                let before = self.inner.peek().len();
                self.inner.fill()?;
                let now = self.inner.peek().len();
                if now >= want || now == before || self.inner.is_exhausted() {
                    break;
                }
            }
            if self.inner.peek().len() < ib && !self.inner.is_exhausted() {
                return Err(Error::invalid_configuration(
                    "inner source buffer cannot hold one transform input block",
                ));
            }
        }

        let avail = self.inner.peek().len();
        let dst = self.offset + self.count;
        if avail >= ib {
            let out_blocks = out_free / ob;
            if out_blocks >= 1 {
                let blocks = if multi { (avail / ib).min(out_blocks) } else { 1 };
                let in_len = blocks * ib;
                let out_len = blocks * ob;
                let produced = self.transform.transform_block(
                    &self.inner.peek()[..in_len],
                    &mut self.buffer[dst..dst + out_len],
                )?;
                self.inner.consume(in_len)?;
                Ok(produced)
            } else {
                // Free output space holds less than one output block:
                // transform into scratch and spill forward.
                let mut scratch = vec![0u8; ob];
                let produced = self
                    .transform
                    .transform_block(&self.inner.peek()[..ib], &mut scratch)?;
                self.inner.consume(ib)?;
                let copied = out_free.min(produced);
                self.buffer[dst..dst + copied].copy_from_slice(&scratch[..copied]);
                if produced > copied {
                    self.cache = scratch;
                    self.cache_start = copied;
                    self.cache_end = produced;
                }
                Ok(copied)
            }
        } else {
            // Fewer than one block remains and the inner source is done.
            self.source_ended = true;
            let tail = self.transform.transform_final(self.inner.peek())?;
            let rest = self.inner.peek().len();
            self.inner.consume(rest)?;
            let copied = out_free.min(tail.len());
            self.buffer[dst..dst + copied].copy_from_slice(&tail[..copied]);
            if tail.len() > copied {
                self.cache = tail;
                self.cache_start = copied;
                self.cache_end = self.cache.len();
            } else {
                self.exhausted = true;
            }
            Ok(copied)
        }
    }
}

impl<S: BufferedSource, T: BlockTransform> BufferedSource for TransformingSource<S, T> {
    fn peek(&self) -> &[u8] {
        &self.buffer[self.offset..self.offset + self.count]
    }

    fn capacity(&self) -> usize {
        self.buffer.len()
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn fill(&mut self) -> Result<usize> {
        while !self.exhausted {
            self.defragment();
            let out_free = self.buffer.len() - self.count;
            if out_free == 0 {
                break;
            }
            let mut produced = self.load_from_cache(out_free);
            if produced == 0 && !self.source_ended {
                produced = self.load_from_source(out_free)?;
            }
            self.count += produced;
            if produced > 0 {
                break;
            }
            // A transform may legitimately produce nothing for an input
            // block; go around again.
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
        while self.count < size && !self.exhausted {
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
        // No fast path: skipped bytes still go through the transform.
        let mut skipped = size.min(self.count as u64);
        self.offset += skipped as usize;
        self.count -= skipped as usize;
        while skipped < size && !self.exhausted {
            self.fill()?;
            if self.count == 0 {
                break;
            }
            let take = (size - skipped).min(self.count as u64) as usize;
            self.offset += take;
            self.count -= take;
            skipped += take as u64;
        }
        Ok(skipped)
    }
}
