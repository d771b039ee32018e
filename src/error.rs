//! Error types for the codec and hash-tree-root engine.

use thiserror::Error;

/// Errors that can occur while encoding, decoding or hashing a value.
///
/// Every failure is reported to the immediate caller. Nothing is clamped,
/// truncated or otherwise coerced into a valid value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SszError {
    /// Integer does not fit the declared width.
    #[error("value does not fit in uint{bits}")]
    ValueOutOfRange { bits: usize },

    /// Sequence is longer than its declared limit.
    #[error("length {len} exceeds limit {limit}")]
    LimitExceeded { len: usize, limit: usize },

    /// Fixed-length sequence given the wrong number of elements.
    #[error("expected exactly {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Container value has a different field count than its descriptor.
    #[error("container {name} has {expected} fields, value has {actual}")]
    FieldCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Value shape does not match the descriptor.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    /// Input is shorter than the type requires.
    #[error("truncated input: expected {expected} bytes, got {actual}")]
    TruncatedInput { expected: usize, actual: usize },

    /// Input is longer than the type allows.
    #[error("trailing bytes: expected {expected} bytes, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },

    /// Byte length is not a whole number of fixed-size elements.
    #[error("byte length {len} is not a multiple of element size {elem_size}")]
    MisalignedLength { len: usize, elem_size: usize },

    /// Byte length falls outside the range the type can produce.
    #[error("byte length {len} outside [{min}, {max}]")]
    ByteLengthOutOfRange { len: usize, min: usize, max: usize },

    /// Offset is smaller than the offset before it.
    #[error("offset {offset} precedes previous offset {previous}")]
    OffsetOutOfOrder { offset: usize, previous: usize },

    /// Offset points outside the region it must address.
    #[error("offset {offset} out of bounds [{min}, {max}]")]
    OffsetOutOfBounds { offset: usize, min: usize, max: usize },

    /// Boolean byte other than 0 or 1.
    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBoolean(u8),

    /// Bit-list encoding without a terminating boundary bit.
    #[error("bit list is missing its boundary bit")]
    MissingBoundaryBit,

    /// Bit-vector encoding with bits set above its declared length.
    #[error("bit vector has padding bits set")]
    PaddingBitsSet,

    /// Union selector does not name an option.
    #[error("unknown union selector {selector} (options: {options})")]
    UnknownSelector { selector: u8, options: usize },

    /// Encoded container exceeds what a 4-byte offset can address.
    #[error("encoding of {len} bytes does not fit a 4-byte offset")]
    EncodingTooLarge { len: usize },

    /// Field lookup by a name the container does not declare.
    #[error("container {container} has no field {field}")]
    UnknownField { container: String, field: String },

    /// JSON object form does not describe a value of the descriptor.
    #[error("invalid object form: {0}")]
    InvalidObject(String),

    /// Descriptor has no valid wire form.
    #[error("invalid type descriptor: {0}")]
    InvalidDescriptor(String),
}

/// Result type alias for codec and hashing operations.
pub type Result<T> = std::result::Result<T, SszError>;
