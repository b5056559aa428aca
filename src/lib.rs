//! # BufSource
//!
//! A lightweight, composable library of byte-buffered data sources for
//! sequential, pull-based reading.
//!
//! ## Overview
//!
//! `bufsource` models a byte stream as a [`BufferedSource`]: a
//! fixed-capacity buffer whose current window of bytes can be inspected
//! in place, consumed, and refilled on demand. Sources wrap other sources
//! to add behavior: adapting an external stream, capping length,
//! splitting at a delimiter or a predicate boundary, or applying a
//! block-oriented transformation. Wrappers share buffer storage wherever
//! the exposed bytes are the inner source's own.
//!
//! ## Key Features
//!
//! * **Composable Architecture**: every source implements one small
//!   trait, so wrappers stack freely
//! * **Zero-Copy Inspection**: consumers parse directly out of the buffer
//!   window, no per-read allocation
//! * **Seek-Aware Skipping**: far skips over seekable streams become
//!   seeks instead of reads
//! * **Lazy Splitting**: delimiter and predicate splitters never re-scan
//!   bytes they have already rejected
//! * **Block Transforms**: cryptographic-style transforms with
//!   independent input/output block sizes and a spill cache
//!
//! ## Quick Start
//!
//! ```rust
//! use bufsource::*;
//! use std::io::Cursor;
//!
//! fn main() -> Result<()> {
//!     // Lift a plain reader into the buffer-window contract.
//!     let stream = Cursor::new(b"alpha;beta;gamma".to_vec());
//!     let inner = StreamSource::new(stream, vec![0u8; 16]);
//!
//!     // Split it into parts at a delimiter.
//!     let mut parts = DelimitedSource::new(inner, b";".to_vec());
//!
//!     assert_eq!(parts.read_all()?, b"alpha");
//!     assert!(parts.skip_part()?);
//!     assert_eq!(parts.read_all()?, b"beta");
//!     assert!(parts.skip_part()?);
//!     assert_eq!(parts.read_all()?, b"gamma");
//!     assert!(!parts.skip_part()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is built around three seams:
//!
//! * **[`BufferedSource`]**: the buffer-window contract every source
//!   implements (`peek`/`fill`/`ensure`/`consume`/`skip`)
//! * **Collaborator traits**: [`SkipRead`] for external streams,
//!   [`PartValidator`] for predicate splitting, and [`BlockTransform`]
//!   for block transforms; inject an implementation to specialize a source
//! * **[`BufferedSourceExt`]** and [`SourceReader`]: the consumer side,
//!   with utility reads and a `std::io::Read`/`BufRead` view
//!
//! Wrapping sources that expose a subset of their inner source's bytes
//! (limit, delimiter, partition) borrow the inner buffer; sources whose
//! bytes differ in content or origin (stream, transform) own their own.

pub mod array;
pub mod delimit;
pub mod error;
pub mod ext;
pub mod limit;
pub mod partition;
pub mod reader;
pub mod source;
pub mod stream;
pub mod transform;

// Re-export the main public API for user convenience.
pub use array::ArraySource;
pub use delimit::DelimitedSource;
pub use error::{Error, Result};
pub use ext::BufferedSourceExt;
pub use limit::LimitedSource;
pub use partition::{PartValidator, PartVerdict, PartitionedSource};
pub use reader::SourceReader;
pub use source::BufferedSource;
pub use stream::{Seekable, Sequential, SkipRead, StreamSource};
pub use transform::{BlockTransform, TransformingSource};
