use thiserror::Error;

/// Errors produced by this crate.
///
/// [`Error::NotTrained`] is a state fault: the caller violated the
/// train-before-query contract. It is never produced by the persistence
/// paths, so callers can tell a precondition violation apart from a
/// recoverable IO or decode failure.
#[derive(Debug, Error)]
pub enum Error {
    /// A query was issued while the corpus statistics are stale.
    #[error("corpus statistics are stale; call train() before querying")]
    NotTrained,

    /// Failed to open, read, or write a persisted image.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode or decode a persisted image.
    #[error("codec error: {0}")]
    Codec(#[from] serde_cbor::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
