use std::io;
use std::num::TryFromIntError;

use thiserror::Error;

/// Error taxonomy for reading a CDF file.
///
/// `Format`/`Decode` correspond to a malformed file (unrecoverable for the
/// operation that hit it); `Io` propagates a failure of the underlying
/// random-access source verbatim; `OutOfRange` signals a caller contract
/// violation (a record index that doesn't fit the integer width the format
/// uses), not a property of the file itself.
#[derive(Error, Debug)]
pub enum CdfError {
    /// The bytes are not a CDF file, or declare a combination of magic
    /// numbers, record tags, or flags this reader doesn't support.
    #[error("{0}")]
    Format(String),

    /// A record failed a field-level sanity check (reserved-for-future-use
    /// field not zero/-1, unexpected record tag, malformed value) while
    /// otherwise looking like a CDF record.
    #[error("{0}")]
    Decode(String),

    /// The underlying random-access source failed.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// A record index, count, or offset does not fit the integer width the
    /// caller or the file format requires.
    #[error("{0}")]
    OutOfRange(String),

    /// Catch-all for contextual errors that don't fit the above (e.g.
    /// propagated from a third-party crate such as the version parser).
    #[error("{0}")]
    Other(String),
}

impl From<TryFromIntError> for CdfError {
    fn from(err: TryFromIntError) -> Self {
        CdfError::OutOfRange(err.to_string())
    }
}
