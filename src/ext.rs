//! Convenience operations over any [`BufferedSource`].

use std::io::Write;

use memchr::memchr;

use crate::error::{Error, Result};
use crate::source::BufferedSource;

/// Utility reads implemented on top of the buffer-window contract.
///
/// Blanket-implemented for every [`BufferedSource`]; import the trait and
/// the methods appear on any source.
pub trait BufferedSourceExt: BufferedSource {
    /// Reports whether the source holds no further bytes, filling once if
    /// the window is currently empty.
    fn is_empty(&mut self) -> Result<bool> {
        if !self.peek().is_empty() {
            return Ok(false);
        }
        self.fill()?;
        Ok(self.peek().is_empty() && self.is_exhausted())
    }

    /// Finds `value` in the buffered bytes, filling as needed.
    ///
    /// Returns the position relative to the window start, or `Ok(None)`
    /// when the source exhausts or the buffer fills without a match.
    fn index_of(&mut self, value: u8) -> Result<Option<usize>> {
        let mut searched = 0usize;
        loop {
            let window = self.peek();
            if let Some(i) = memchr(value, &window[searched..]) {
                return Ok(Some(searched + i));
            }
            searched = window.len();
            if self.is_exhausted() {
                return Ok(None);
            }
            if self.fill()? == searched {
                // No growth; a larger buffer would be needed to look further.
                return Ok(None);
            }
        }
    }

    /// Copies up to `dst.len()` bytes into `dst`, consuming them.
    ///
    /// Returns the number copied; short only when the source exhausted.
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let mut copied = 0usize;
        while copied < dst.len() {
            if self.peek().is_empty() {
                if self.is_exhausted() {
                    break;
                }
                match self.ensure(1) {
                    Ok(()) => {}
                    Err(Error::InsufficientData { .. }) if self.is_exhausted() => break,
                    Err(e) => return Err(e),
                }
            }
            let window = self.peek();
            let n = window.len().min(dst.len() - copied);
            dst[copied..copied + n].copy_from_slice(&window[..n]);
            self.consume(n)?;
            copied += n;
        }
        Ok(copied)
    }

    /// Drains the source into a vector.
    fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let n = {
                let window = self.peek();
                out.extend_from_slice(window);
                window.len()
            };
            self.consume(n)?;
            if self.is_exhausted() {
                break;
            }
            match self.ensure(1) {
                Ok(()) => {}
                Err(Error::InsufficientData { .. }) if self.is_exhausted() => break,
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    /// Drains the source and decodes it as UTF-8.
    fn read_all_string(&mut self) -> Result<String> {
        Ok(String::from_utf8(self.read_all()?)?)
    }

    /// Drains the source into an `io::Write` sink, returning the number
    /// of bytes written.
    fn write_to<W: Write>(&mut self, sink: &mut W) -> Result<u64> {
        let mut written = 0u64;
        loop {
            let n = {
                let window = self.peek();
                sink.write_all(window)?;
                window.len()
            };
            self.consume(n)?;
            written += n as u64;
            if self.is_exhausted() {
                break;
            }
            match self.ensure(1) {
                Ok(()) => {}
                Err(Error::InsufficientData { .. }) if self.is_exhausted() => break,
                Err(e) => return Err(e),
            }
        }
        Ok(written)
    }
}

impl<S: BufferedSource + ?Sized> BufferedSourceExt for S {}
