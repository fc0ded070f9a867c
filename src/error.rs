use core::fmt;

use thiserror::Error;

/// The high-level class of an error.
///
/// - **Decode** errors surface from cursors and typed-array reads.
/// - **Encode** errors surface from the [`Encoder`](crate::Encoder) and its sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CborErrorKind {
    /// Decode/traversal failure.
    Decode,
    /// Encoding failure.
    Encode,
}

impl fmt::Display for CborErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => f.write_str("decode"),
            Self::Encode => f.write_str("encode"),
        }
    }
}

/// A structured error code identifying why a cursor entered its error state,
/// or why a fallible operation was rejected.
///
/// Codes are string-free and carry a stable numeric value (see [`ErrorCode::code`]),
/// so they can be stored inside a [`Cursor`](crate::Cursor) without allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum ErrorCode {
    /// A read was attempted at or after the end of the buffer.
    #[error("end of data")]
    EndOfData,
    /// The additional-info bits are reserved or invalid for the major type.
    #[error("invalid additional info for major type")]
    InvalidAdditionalInfo,
    /// Structurally invalid value: unpaired map key, or a chunk of the wrong type.
    #[error("invalid value")]
    InvalidValue,
    /// An indefinite-length string contains a chunk of a different major type.
    #[error("inconsistent indefinite-length string chunk")]
    InconsistentIndefinite,
    /// The cursor was never decoded.
    #[error("cursor not initialised")]
    NotInitialised,
    /// A container-shaped operation was invoked on a value of another kind.
    #[error("operation does not apply to this kind of value")]
    MethodTypeMismatch,
    /// Internal consistency failure.
    #[error("internal decode state should be impossible")]
    ShouldBeImpossible,
    /// Nesting depth limit exceeded.
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,
    /// The typed-array element type is recognized but cannot be decoded.
    #[error("unsupported typed-array element type")]
    UnsupportedElementType,
    /// A fixed-size output buffer has no room for more bytes.
    #[error("output buffer full")]
    BufferFull,
    /// Memory allocation failed while growing an output buffer.
    #[error("allocation failed")]
    AllocationFailed,
    /// Arithmetic overflow while computing a length or offset.
    #[error("length overflow")]
    LengthOverflow,
}

impl ErrorCode {
    /// Stable, non-zero numeric value of this code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::EndOfData => 1,
            Self::InvalidAdditionalInfo => 2,
            Self::InvalidValue => 3,
            Self::InconsistentIndefinite => 4,
            Self::NotInitialised => 5,
            Self::MethodTypeMismatch => 6,
            Self::ShouldBeImpossible => 7,
            Self::DepthLimitExceeded => 8,
            Self::UnsupportedElementType => 9,
            Self::BufferFull => 10,
            Self::AllocationFailed => 11,
            Self::LengthOverflow => 12,
        }
    }
}

/// An error with structured classification, a stable code, and a byte offset.
///
/// For decode errors `offset` is the position in the input where the error was
/// detected; for encode errors it is the number of bytes the sink held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cbor {kind} failed at {offset}: {code}")]
pub struct CborError {
    /// The error kind.
    pub kind: CborErrorKind,
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset where the error was detected.
    pub offset: usize,
}

impl CborError {
    /// Construct a decode error at `offset`.
    #[inline]
    #[must_use]
    pub const fn decode(code: ErrorCode, offset: usize) -> Self {
        Self {
            kind: CborErrorKind::Decode,
            code,
            offset,
        }
    }

    /// Construct an encoding error at sink position `offset`.
    #[inline]
    #[must_use]
    pub const fn encode(code: ErrorCode, offset: usize) -> Self {
        Self {
            kind: CborErrorKind::Encode,
            code,
            offset,
        }
    }

    /// Returns true iff this error came from the decode side.
    #[inline]
    #[must_use]
    pub const fn is_decode(self) -> bool {
        matches!(self.kind, CborErrorKind::Decode)
    }
}
