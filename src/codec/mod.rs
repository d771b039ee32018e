//! Canonical byte encoding.
//!
//! Fixed-size values are laid out back to back. Composite values with
//! variable-size parts use a header region (one slot per field: either the
//! field's fixed-size encoding or a 4-byte little-endian offset) followed by
//! the variable-size encodings in field order. Offsets are absolute within
//! the container's own encoding.
//!
//! | Type | Encoding |
//! |------|----------|
//! | `boolean`, `bit` | 1 byte, `0x00` or `0x01` |
//! | `uintN` | `N / 8` bytes, little-endian |
//! | `Bitvector[N]` | `ceil(N / 8)` bytes, LSB-first, zero padding |
//! | `Bitlist[N]` | LSB-first bits, then a boundary bit |
//! | `Union[...]` | selector byte, then the selected value (if any) |

mod decode;
mod encode;

use crate::{error::Result, TypeDescriptor, Value};

pub(crate) use encode::{check_length, check_limit, encode_into};

/// Size of a header offset slot in bytes.
pub const OFFSET_SIZE: usize = 4;

/// Encode `value` as `descriptor`.
///
/// # Errors
///
/// Fails if the descriptor is invalid, if the value does not type-check
/// against it, if an integer overflows its width, or if a sequence violates
/// its declared length or limit.
pub fn serialize(descriptor: &TypeDescriptor, value: &Value) -> Result<Vec<u8>> {
    descriptor.validate()?;
    let mut out = Vec::new();
    encode::encode_into(descriptor, value, &mut out)?;
    Ok(out)
}

/// Decode `bytes` as `descriptor`.
///
/// Every length, offset, selector and boundary bit is validated before it
/// is used; malformed input returns an error and never panics.
pub fn deserialize(descriptor: &TypeDescriptor, bytes: &[u8]) -> Result<Value> {
    descriptor.validate()?;
    decode::decode(descriptor, bytes)
}
