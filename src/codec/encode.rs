//! Value to bytes.

use crate::{
    chunk::{pack_bits, pack_bits_with_boundary},
    descriptor::BasicType,
    error::Result,
    SszError, TypeDescriptor, Value,
};

/// Append the encoding of `value` to `out`.
pub(crate) fn encode_into(ty: &TypeDescriptor, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match (ty, value) {
        (TypeDescriptor::Basic(basic), _) => encode_basic(*basic, value, out),
        (TypeDescriptor::Vector { elem, length }, Value::Sequence(items)) => {
            check_length(*length, items.len())?;
            encode_sequence(elem, items, out)
        }
        (TypeDescriptor::List { elem, limit }, Value::Sequence(items)) => {
            check_limit(*limit, items.len())?;
            encode_sequence(elem, items, out)
        }
        (TypeDescriptor::BitVector { length }, Value::Bits(bits)) => {
            check_length(*length, bits.len())?;
            out.extend_from_slice(&pack_bits(bits));
            Ok(())
        }
        (TypeDescriptor::BitList { limit }, Value::Bits(bits)) => {
            check_limit(*limit, bits.len())?;
            out.extend_from_slice(&pack_bits_with_boundary(bits));
            Ok(())
        }
        (TypeDescriptor::ByteVector { length }, Value::Bytes(bytes)) => {
            check_length(*length, bytes.len())?;
            out.extend_from_slice(bytes);
            Ok(())
        }
        (TypeDescriptor::ByteList { limit }, Value::Bytes(bytes)) => {
            check_limit(*limit, bytes.len())?;
            out.extend_from_slice(bytes);
            Ok(())
        }
        (TypeDescriptor::Union(union), Value::Union { selector, value }) => {
            let option = union.option(*selector)?;
            out.push(*selector);
            match (option, value) {
                (None, None) => Ok(()),
                (Some(option_ty), Some(inner)) => encode_into(option_ty, inner, out),
                (None, Some(inner)) => Err(SszError::TypeMismatch {
                    expected: "None".to_string(),
                    found: inner.kind(),
                }),
                (Some(option_ty), None) => Err(SszError::TypeMismatch {
                    expected: option_ty.to_string(),
                    found: "none",
                }),
            }
        }
        (TypeDescriptor::Container(container), Value::Container(values)) => {
            let fields = container.fields();
            if fields.len() != values.len() {
                return Err(SszError::FieldCountMismatch {
                    name: container.name().to_string(),
                    expected: fields.len(),
                    actual: values.len(),
                });
            }
            let parts: Vec<_> = fields.iter().map(|f| &*f.ty).zip(values).collect();
            encode_composite(&parts, out)
        }
        _ => Err(mismatch(ty, value)),
    }
}

fn encode_basic(basic: BasicType, value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Bool(b) if basic.is_boolean() => {
            out.push(u8::from(*b));
            Ok(())
        }
        Value::Uint(v) if !basic.is_boolean() => {
            if *v > basic.max_value() {
                return Err(SszError::ValueOutOfRange {
                    bits: basic.bit_width(),
                });
            }
            let le = v.to_le_bytes::<32>();
            out.extend_from_slice(&le[..basic.byte_size()]);
            Ok(())
        }
        _ => Err(mismatch(&TypeDescriptor::Basic(basic), value)),
    }
}

fn encode_sequence(elem: &TypeDescriptor, items: &[Value], out: &mut Vec<u8>) -> Result<()> {
    if elem.is_fixed_size() {
        for item in items {
            encode_into(elem, item, out)?;
        }
        Ok(())
    } else {
        let parts: Vec<_> = items.iter().map(|item| (elem, item)).collect();
        encode_composite(&parts, out)
    }
}

/// Header region of fixed parts and offsets, then the variable parts in order.
fn encode_composite(parts: &[(&TypeDescriptor, &Value)], out: &mut Vec<u8>) -> Result<()> {
    let header_size = parts
        .iter()
        .fold(0usize, |acc, (ty, _)| acc.saturating_add(ty.header_slot_size()));

    let mut variable = Vec::new();
    for (ty, value) in parts {
        if ty.is_fixed_size() {
            encode_into(ty, value, out)?;
        } else {
            let offset = header_size.saturating_add(variable.len());
            let offset =
                u32::try_from(offset).map_err(|_| SszError::EncodingTooLarge { len: offset })?;
            out.extend_from_slice(&offset.to_le_bytes());
            encode_into(ty, value, &mut variable)?;
        }
    }

    out.extend_from_slice(&variable);
    Ok(())
}

pub(crate) fn check_length(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(SszError::LengthMismatch { expected, actual });
    }
    Ok(())
}

pub(crate) fn check_limit(limit: usize, len: usize) -> Result<()> {
    if len > limit {
        return Err(SszError::LimitExceeded { len, limit });
    }
    Ok(())
}

fn mismatch(ty: &TypeDescriptor, value: &Value) -> SszError {
    SszError::TypeMismatch {
        expected: ty.to_string(),
        found: value.kind(),
    }
}
