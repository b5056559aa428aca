use thiserror::Error;

/// Custom error types for the bufsource library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from std::io operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A size argument fell outside its documented bounds.
    #[error("size {size} is out of range (at most {max} allowed)")]
    SizeOutOfRange { size: u64, max: u64 },

    /// The source was exhausted before the requested number of bytes
    /// became available.
    #[error("source exhausted: {required} bytes required, {available} available")]
    InsufficientData { required: usize, available: usize },

    /// The buffer cannot make progress (e.g. a part boundary does not fit
    /// within one buffer-worth of data).
    #[error("buffer too small: {message}")]
    BufferTooSmall { message: String },

    /// A source was wired together with incompatible collaborators.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Drained bytes were not valid UTF-8.
    #[error("invalid UTF-8 in stream: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Create a new `SizeOutOfRange` error for the given argument and bound.
    pub fn size_out_of_range(size: u64, max: u64) -> Self {
        Self::SizeOutOfRange { size, max }
    }

    /// Create a new `InsufficientData` error with the observed shortfall.
    pub fn insufficient_data(required: usize, available: usize) -> Self {
        Self::InsufficientData {
            required,
            available,
        }
    }

    /// Create a new `BufferTooSmall` error with a descriptive message.
    pub fn buffer_too_small(message: impl Into<String>) -> Self {
        Self::BufferTooSmall {
            message: message.into(),
        }
    }

    /// Create a new `InvalidConfiguration` error with a descriptive message.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
