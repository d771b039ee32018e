//! Bytes to value.
//!
//! Input is untrusted. Each length, offset, selector and boundary bit is
//! checked before anything is sized from it, so an adversarial buffer can
//! neither cause an out-of-bounds read nor an allocation larger than the
//! buffer itself.

use alloy_primitives::U256;

use crate::{
    chunk::unpack_bits,
    descriptor::BasicType,
    error::Result,
    SszError, TypeDescriptor, Value,
};

use super::OFFSET_SIZE;

pub(super) fn decode(ty: &TypeDescriptor, bytes: &[u8]) -> Result<Value> {
    match ty {
        TypeDescriptor::Basic(basic) => decode_basic(*basic, bytes),
        TypeDescriptor::Vector { elem, length } => match elem.fixed_size() {
            Some(size) => {
                check_exact(size.saturating_mul(*length), bytes.len())?;
                decode_fixed_elements(elem, size, bytes)
            }
            None => {
                check_max_length(ty, bytes.len())?;
                decode_variable_elements(elem, bytes, Count::Exact(*length))
            }
        },
        TypeDescriptor::List { elem, limit } => match elem.fixed_size() {
            Some(size) => {
                if bytes.len() % size != 0 {
                    return Err(SszError::MisalignedLength {
                        len: bytes.len(),
                        elem_size: size,
                    });
                }
                let count = bytes.len() / size;
                if count > *limit {
                    return Err(SszError::LimitExceeded { len: count, limit: *limit });
                }
                decode_fixed_elements(elem, size, bytes)
            }
            None => {
                check_max_length(ty, bytes.len())?;
                decode_variable_elements(elem, bytes, Count::AtMost(*limit))
            }
        },
        TypeDescriptor::BitVector { length } => {
            check_exact(length.div_ceil(8), bytes.len())?;
            let used = length % 8;
            if used != 0 && bytes[bytes.len() - 1] >> used != 0 {
                return Err(SszError::PaddingBitsSet);
            }
            Ok(Value::Bits(unpack_bits(bytes, *length)))
        }
        TypeDescriptor::BitList { limit } => {
            let Some(&last) = bytes.last() else {
                return Err(missing_boundary());
            };
            if last == 0 {
                return Err(missing_boundary());
            }
            // The boundary is the highest set bit of the last byte.
            let bit_len = (bytes.len() - 1) * 8 + (7 - last.leading_zeros() as usize);
            if bit_len > *limit {
                return Err(SszError::LimitExceeded {
                    len: bit_len,
                    limit: *limit,
                });
            }
            Ok(Value::Bits(unpack_bits(bytes, bit_len)))
        }
        TypeDescriptor::ByteVector { length } => {
            check_exact(*length, bytes.len())?;
            Ok(Value::Bytes(bytes.to_vec()))
        }
        TypeDescriptor::ByteList { limit } => {
            if bytes.len() > *limit {
                return Err(SszError::LimitExceeded {
                    len: bytes.len(),
                    limit: *limit,
                });
            }
            Ok(Value::Bytes(bytes.to_vec()))
        }
        TypeDescriptor::Union(union) => {
            let Some((&selector, rest)) = bytes.split_first() else {
                return Err(SszError::TruncatedInput {
                    expected: 1,
                    actual: 0,
                });
            };
            let option = union.option(selector).map_err(|err| {
                tracing::debug!(selector, "rejected unknown union selector");
                err
            })?;
            match option {
                None if rest.is_empty() => Ok(Value::union(selector, None)),
                None => Err(SszError::TrailingBytes {
                    expected: 1,
                    actual: bytes.len(),
                }),
                Some(option_ty) => Ok(Value::union(selector, Some(decode(option_ty, rest)?))),
            }
        }
        TypeDescriptor::Container(container) => {
            if !ty.is_fixed_size() {
                check_max_length(ty, bytes.len())?;
            }
            let types: Vec<&TypeDescriptor> = container.fields().iter().map(|f| &*f.ty).collect();
            Ok(Value::Container(decode_composite(&types, bytes)?))
        }
    }
}

fn decode_basic(basic: BasicType, bytes: &[u8]) -> Result<Value> {
    check_exact(basic.byte_size(), bytes.len())?;
    if basic.is_boolean() {
        return match bytes[0] {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            other => Err(SszError::InvalidBoolean(other)),
        };
    }
    Ok(Value::Uint(U256::from_le_slice(bytes)))
}

/// `bytes.len()` must already be a multiple of `size`.
fn decode_fixed_elements(elem: &TypeDescriptor, size: usize, bytes: &[u8]) -> Result<Value> {
    let items = bytes
        .chunks_exact(size)
        .map(|part| decode(elem, part))
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Sequence(items))
}

#[derive(Clone, Copy, Debug)]
enum Count {
    Exact(usize),
    AtMost(usize),
}

/// Variable-size elements: the first offset gives the element count.
fn decode_variable_elements(elem: &TypeDescriptor, bytes: &[u8], count: Count) -> Result<Value> {
    if bytes.is_empty() {
        return match count {
            Count::AtMost(_) => Ok(Value::Sequence(Vec::new())),
            Count::Exact(n) => Err(SszError::TruncatedInput {
                expected: n.saturating_mul(OFFSET_SIZE),
                actual: 0,
            }),
        };
    }

    let first = read_offset(bytes, 0)?;
    if first == 0 || first % OFFSET_SIZE != 0 || first > bytes.len() {
        return Err(offset_out_of_bounds(first, OFFSET_SIZE, bytes.len()));
    }
    let found = first / OFFSET_SIZE;
    match count {
        Count::Exact(n) if found != n => {
            let expected = n.saturating_mul(OFFSET_SIZE);
            return Err(offset_out_of_bounds(first, expected, expected));
        }
        Count::AtMost(limit) if found > limit => {
            return Err(SszError::LimitExceeded { len: found, limit });
        }
        _ => {}
    }

    // `found` is bounded by the buffer length, so this cannot over-allocate.
    let types = vec![elem; found];
    Ok(Value::Sequence(decode_composite(&types, bytes)?))
}

/// Split a header region plus variable region into per-part values.
fn decode_composite(types: &[&TypeDescriptor], bytes: &[u8]) -> Result<Vec<Value>> {
    let header_size = types
        .iter()
        .fold(0usize, |acc, ty| acc.saturating_add(ty.header_slot_size()));
    if bytes.len() < header_size {
        return Err(SszError::TruncatedInput {
            expected: header_size,
            actual: bytes.len(),
        });
    }

    enum Slot<'a> {
        Fixed(&'a [u8]),
        Variable(usize),
    }

    let mut slots = Vec::with_capacity(types.len());
    let mut offsets = Vec::new();
    let mut pos = 0;
    for ty in types {
        match ty.fixed_size() {
            Some(size) => {
                slots.push(Slot::Fixed(&bytes[pos..pos + size]));
                pos += size;
            }
            None => {
                let offset = read_offset(bytes, pos)?;
                match offsets.last() {
                    None if offset != header_size => {
                        return Err(offset_out_of_bounds(offset, header_size, header_size));
                    }
                    Some(&previous) if offset < previous => {
                        tracing::debug!(offset, previous, "rejected out-of-order offset");
                        return Err(SszError::OffsetOutOfOrder { offset, previous });
                    }
                    Some(&previous) if offset > bytes.len() => {
                        return Err(offset_out_of_bounds(offset, previous, bytes.len()));
                    }
                    _ => {}
                }
                slots.push(Slot::Variable(offsets.len()));
                offsets.push(offset);
                pos += OFFSET_SIZE;
            }
        }
    }

    if offsets.is_empty() && bytes.len() != header_size {
        return Err(SszError::TrailingBytes {
            expected: header_size,
            actual: bytes.len(),
        });
    }

    types
        .iter()
        .zip(slots)
        .map(|(ty, slot)| match slot {
            Slot::Fixed(part) => decode(ty, part),
            Slot::Variable(i) => {
                let start = offsets[i];
                let end = offsets.get(i + 1).copied().unwrap_or(bytes.len());
                decode(ty, &bytes[start..end])
            }
        })
        .collect()
}

/// Read a 4-byte little-endian offset at `pos`.
fn read_offset(bytes: &[u8], pos: usize) -> Result<usize> {
    let end = pos.saturating_add(OFFSET_SIZE);
    let Some(raw) = bytes.get(pos..end) else {
        return Err(SszError::TruncatedInput {
            expected: end,
            actual: bytes.len(),
        });
    };
    let mut buf = [0u8; OFFSET_SIZE];
    buf.copy_from_slice(raw);
    Ok(u32::from_le_bytes(buf) as usize)
}

fn check_exact(expected: usize, actual: usize) -> Result<()> {
    if actual < expected {
        return Err(SszError::TruncatedInput { expected, actual });
    }
    if actual > expected {
        return Err(SszError::TrailingBytes { expected, actual });
    }
    Ok(())
}

/// Upper bound for variable-size composites; shorter input is reported by the offset checks.
fn check_max_length(ty: &TypeDescriptor, len: usize) -> Result<()> {
    let max = ty.max_byte_length();
    if len > max {
        tracing::debug!(len, max, "rejected oversized input");
        return Err(SszError::ByteLengthOutOfRange {
            len,
            min: ty.min_byte_length(),
            max,
        });
    }
    Ok(())
}

fn offset_out_of_bounds(offset: usize, min: usize, max: usize) -> SszError {
    tracing::debug!(offset, min, max, "rejected offset out of bounds");
    SszError::OffsetOutOfBounds { offset, min, max }
}

fn missing_boundary() -> SszError {
    tracing::debug!("rejected bit list without boundary bit");
    SszError::MissingBoundaryBit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{deserialize, serialize};

    fn var_test_struct() -> TypeDescriptor {
        TypeDescriptor::container(
            "VarTestStruct",
            [
                ("A", TypeDescriptor::uint16()),
                ("B", TypeDescriptor::list(TypeDescriptor::uint16(), 1024)),
                ("C", TypeDescriptor::uint8()),
            ],
        )
    }

    #[test]
    fn test_fixed_length_mismatch() {
        assert_eq!(
            deserialize(&TypeDescriptor::uint32(), &[1, 2, 3]),
            Err(SszError::TruncatedInput {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            deserialize(&TypeDescriptor::uint16(), &[1, 2, 3]),
            Err(SszError::TrailingBytes {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_invalid_boolean() {
        assert_eq!(
            deserialize(&TypeDescriptor::boolean(), &[2]),
            Err(SszError::InvalidBoolean(2))
        );
        assert_eq!(
            deserialize(&TypeDescriptor::bit(), &[0xff]),
            Err(SszError::InvalidBoolean(0xff))
        );
    }

    #[test]
    fn test_bitlist_boundary() {
        let ty = TypeDescriptor::bitlist(16);
        assert_eq!(deserialize(&ty, &[]), Err(SszError::MissingBoundaryBit));
        assert_eq!(deserialize(&ty, &[0x05, 0x00]), Err(SszError::MissingBoundaryBit));
        assert_eq!(deserialize(&ty, &[0x01]).unwrap(), Value::Bits(vec![]));
        assert_eq!(
            deserialize(&ty, &[0x05]).unwrap(),
            Value::Bits(vec![true, false])
        );
        assert_eq!(
            deserialize(&TypeDescriptor::bitlist(1), &[0x04]),
            Err(SszError::LimitExceeded { len: 2, limit: 1 })
        );
    }

    #[test]
    fn test_bitvector_padding() {
        let ty = TypeDescriptor::bitvector(4);
        assert_eq!(deserialize(&ty, &[0x10]), Err(SszError::PaddingBitsSet));
        assert!(deserialize(&ty, &[0x0f]).is_ok());
        assert!(deserialize(&TypeDescriptor::bitvector(8), &[0xff]).is_ok());
    }

    #[test]
    fn test_list_limits_on_decode() {
        let ty = TypeDescriptor::list(TypeDescriptor::uint16(), 2);
        assert_eq!(
            deserialize(&ty, &[0; 6]),
            Err(SszError::LimitExceeded { len: 3, limit: 2 })
        );
        assert_eq!(
            deserialize(&ty, &[0; 3]),
            Err(SszError::MisalignedLength {
                len: 3,
                elem_size: 2
            })
        );
        assert_eq!(
            deserialize(&TypeDescriptor::bytelist(2), &[0; 3]),
            Err(SszError::LimitExceeded { len: 3, limit: 2 })
        );
    }

    #[test]
    fn test_first_offset_must_match_header() {
        let ty = var_test_struct();
        let good = serialize(
            &ty,
            &Value::Container(vec![
                Value::from(0xabcdu16),
                Value::Sequence(vec![Value::from(1u16), Value::from(2u16)]),
                Value::from(0xffu8),
            ]),
        )
        .unwrap();
        assert_eq!(hex::encode(&good), "cdab07000000ff01000200");
        assert!(deserialize(&ty, &good).is_ok());

        // Offset pointing into the header region.
        let mut bad = good.clone();
        bad[2] = 6;
        assert_eq!(
            deserialize(&ty, &bad),
            Err(SszError::OffsetOutOfBounds {
                offset: 6,
                min: 7,
                max: 7
            })
        );

        // Offset past the end of the buffer.
        let mut bad = good.clone();
        bad[2] = 0x40;
        assert!(matches!(
            deserialize(&ty, &bad),
            Err(SszError::OffsetOutOfBounds { offset: 0x40, .. })
        ));

        // Header cut short.
        assert!(matches!(
            deserialize(&ty, &good[..5]),
            Err(SszError::TruncatedInput { expected: 7, .. })
        ));
    }

    #[test]
    fn test_offsets_must_not_decrease() {
        let ty = TypeDescriptor::container(
            "TwoLists",
            [
                ("a", TypeDescriptor::bytelist(8)),
                ("b", TypeDescriptor::bytelist(8)),
            ],
        );
        // header = 8, a = [1, 2], b = [3]
        let good = hex::decode("080000000a000000010203").unwrap();
        assert_eq!(
            deserialize(&ty, &good).unwrap(),
            Value::Container(vec![Value::Bytes(vec![1, 2]), Value::Bytes(vec![3])])
        );

        let mut bad = good.clone();
        bad[4] = 0x07;
        assert_eq!(
            deserialize(&ty, &bad),
            Err(SszError::OffsetOutOfOrder {
                offset: 7,
                previous: 8
            })
        );

        let mut bad = good;
        bad[4] = 0x0c;
        assert_eq!(
            deserialize(&ty, &bad),
            Err(SszError::OffsetOutOfBounds {
                offset: 12,
                min: 8,
                max: 11
            })
        );
    }

    #[test]
    fn test_list_of_variable_elements() {
        let ty = TypeDescriptor::list(TypeDescriptor::bytelist(4), 2);
        let value = Value::Sequence(vec![Value::Bytes(vec![0xaa]), Value::Bytes(vec![])]);
        let bytes = serialize(&ty, &value).unwrap();
        assert_eq!(hex::encode(&bytes), "0800000009000000aa");
        assert_eq!(deserialize(&ty, &bytes).unwrap(), value);

        // Three offsets claimed, limit is two.
        assert_eq!(
            deserialize(&ty, &hex::decode("0c0000000c0000000c000000").unwrap()),
            Err(SszError::LimitExceeded { len: 3, limit: 2 })
        );
        // First offset not a multiple of the offset size.
        assert!(matches!(
            deserialize(&ty, &hex::decode("05000000aa").unwrap()),
            Err(SszError::OffsetOutOfBounds { offset: 5, .. })
        ));
        // Huge first offset on a tiny buffer is rejected before allocating.
        assert!(matches!(
            deserialize(&ty, &hex::decode("fcffffff").unwrap()),
            Err(SszError::OffsetOutOfBounds { .. })
        ));
        assert_eq!(deserialize(&ty, &[]).unwrap(), Value::Sequence(vec![]));
    }

    #[test]
    fn test_oversized_variable_input() {
        // Two byte lists of at most 4 bytes: at most 2 * (4 + 4) bytes.
        let ty = TypeDescriptor::list(TypeDescriptor::bytelist(4), 2);
        let mut bytes = hex::decode("08000000").unwrap();
        bytes.resize(17, 0);
        assert_eq!(
            deserialize(&ty, &bytes),
            Err(SszError::ByteLengthOutOfRange {
                len: 17,
                min: 0,
                max: 16
            })
        );
    }

    #[test]
    fn test_vector_of_variable_elements_count() {
        let ty = TypeDescriptor::vector(TypeDescriptor::bytelist(4), 2);
        assert!(matches!(
            deserialize(&ty, &hex::decode("04000000aa").unwrap()),
            Err(SszError::OffsetOutOfBounds { offset: 4, min: 8, max: 8 })
        ));
        assert!(matches!(
            deserialize(&ty, &[]),
            Err(SszError::TruncatedInput { expected: 8, actual: 0 })
        ));
    }

    #[test]
    fn test_union_decode() {
        let ty = TypeDescriptor::union([None, Some(TypeDescriptor::uint16())]);
        assert_eq!(
            deserialize(&ty, &[]),
            Err(SszError::TruncatedInput {
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            deserialize(&ty, &[2, 0, 0]),
            Err(SszError::UnknownSelector {
                selector: 2,
                options: 2
            })
        );
        assert_eq!(
            deserialize(&ty, &[0, 1]),
            Err(SszError::TrailingBytes {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            deserialize(&ty, &[1, 0xbb]),
            Err(SszError::TruncatedInput {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_fixed_container_trailing_bytes() {
        let ty = TypeDescriptor::container(
            "Small",
            [("A", TypeDescriptor::uint16()), ("B", TypeDescriptor::uint16())],
        );
        assert_eq!(
            deserialize(&ty, &[1, 0, 2, 0, 9]),
            Err(SszError::TrailingBytes {
                expected: 4,
                actual: 5
            })
        );
    }
}
