use ckb_error::{Error, ErrorKind};
use thiserror::Error;

/// Outcome of a single data-loader access.
///
/// Mirrors the host status space: running out of a sequence is reported
/// apart from a present cell lacking the requested field, and both apart
/// from transport problems. Callers must never fold the first case into
/// the others, it is the only benign one.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum LoadError {
    /// The requested index lies past the end of the source sequence.
    #[error("IndexOutOfBound")]
    IndexOutOfBound,

    /// The cell exists but does not carry the requested field.
    #[error("ItemMissing")]
    ItemMissing,

    /// The data exists but exceeds the buffer the caller allotted for it.
    #[error("LengthNotEnough: the data is {actual} bytes but at most {limit} are allowed")]
    LengthNotEnough {
        /// Allotted buffer capacity in bytes.
        limit: usize,
        /// Actual data length in bytes.
        actual: usize,
    },

    /// Any other host failure.
    #[error("Other: {0}")]
    Other(String),
}

/// Error kinds raised by Type ID validation. All of them are terminal: the
/// enclosing transaction is rejected and nothing is retried.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TypeIdError {
    /// The data loader could not supply a required piece of the transaction.
    #[error("LoadFailure: {0}")]
    LoadFailure(#[from] LoadError),

    /// The current script bytes do not verify as a molecule `Script`.
    #[error("MalformedSchema: current script is not a well-formed molecule Script")]
    MalformedSchema,

    /// `offset + 32` runs past the end of the script args.
    #[error("OffsetOutOfRange: args hold {args_len} bytes, offset {offset} leaves no room for a type id")]
    OffsetOutOfRange {
        /// Length of the current script args in bytes.
        args_len: usize,
        /// Caller-supplied byte offset of the claimed identifier.
        offset: usize,
    },

    /// A second cell of this type id was found at group position 1.
    #[error("DuplicateTypeIdCell")]
    DuplicateTypeIdCell,

    /// No transaction output carries a type script hashing to the current
    /// script hash, so a created type id cell has no position to bind to.
    #[error("NoMatchingOutput")]
    NoMatchingOutput,

    /// The claimed identifier differs from the one derived from the first
    /// input and the matching output position.
    #[error("TypeIdMismatch")]
    TypeIdMismatch,
}

impl From<TypeIdError> for Error {
    fn from(error: TypeIdError) -> Self {
        ErrorKind::Script.because(error)
    }
}
