//! The buffer-window contract every data source implements.

use crate::error::Result;

/// A pull-based source of bytes exposing a fixed-capacity buffer window.
///
/// A source owns (or borrows through its inner source) a byte buffer of
/// fixed capacity. At any moment some contiguous region of that buffer,
/// the *window* returned by [`peek`](Self::peek), holds bytes that the
/// consumer may inspect in place. The consumer advances over inspected
/// bytes with [`consume`](Self::consume) and asks for more with
/// [`fill`](Self::fill) or [`ensure`](Self::ensure).
///
/// # Window guarantees
///
/// * The backing buffer's capacity is fixed for the lifetime of the source.
/// * Once [`is_exhausted`](Self::is_exhausted) reports `true` it never
///   reverts, and the window can only shrink from then on.
/// * Operations that do not fill or skip leave the window bytes untouched:
///   a consumer may read `peek()` repeatedly and see the same bytes.
/// * [`consume`](Self::consume) drops bytes from the *front* of the window
///   without moving the remaining bytes; [`fill`](Self::fill) may shift
///   the remaining bytes toward the start of the buffer to reclaim
///   trailing capacity, preserving their order and values.
pub trait BufferedSource {
    /// Returns the bytes currently available for in-place inspection.
    fn peek(&self) -> &[u8];

    /// Returns the total capacity of the backing buffer.
    ///
    /// [`ensure`](Self::ensure) can never satisfy a request larger than
    /// this.
    fn capacity(&self) -> usize;

    /// Returns `true` once the source will never produce another byte.
    ///
    /// The window may still hold unread bytes; exhaustion only means no
    /// *new* bytes will appear.
    fn is_exhausted(&self) -> bool;

    /// Attempts to enlarge the window by acquiring more bytes.
    ///
    /// Returns the new window length. After a successful call the window
    /// is non-empty or the source is exhausted; splitting sources may
    /// need further calls while a potential part boundary straddles the
    /// window edge. Idempotent once exhausted.
    fn fill(&mut self) -> Result<usize>;

    /// Acquires bytes until the window holds at least `size` of them.
    ///
    /// `size == 0` is a no-op. Fails with [`Error::SizeOutOfRange`] when
    /// `size` exceeds [`capacity`](Self::capacity), and with
    /// [`Error::InsufficientData`] when the source exhausts first.
    ///
    /// [`Error::SizeOutOfRange`]: crate::Error::SizeOutOfRange
    /// [`Error::InsufficientData`]: crate::Error::InsufficientData
    fn ensure(&mut self, size: usize) -> Result<()>;

    /// Drops `size` bytes from the front of the window.
    ///
    /// Performs no reads and never changes the exhaustion state. Fails
    /// with [`Error::SizeOutOfRange`] when `size` exceeds the current
    /// window length.
    ///
    /// [`Error::SizeOutOfRange`]: crate::Error::SizeOutOfRange
    fn consume(&mut self, size: usize) -> Result<()>;

    /// Skips up to `size` bytes, drawing on both the window and the
    /// upstream.
    ///
    /// Returns the number actually skipped; a short return means the
    /// source exhausted. Afterwards the source resumes immediately after
    /// the skipped bytes.
    fn skip(&mut self, size: u64) -> Result<u64>;
}
