//! JSON object form of values, for fixtures and debugging.
//!
//! | Type | Object form |
//! |------|-------------|
//! | `boolean`, `bit` | JSON bool |
//! | `uint8`..`uint64` | JSON number |
//! | `uint128`, `uint256` | decimal string |
//! | `Bytevector`, `Bytelist` | `0x`-prefixed hex string |
//! | `Bitvector`, `Bitlist` | array of bools |
//! | `Vector`, `List` | array |
//! | container | object keyed by field name, in field order |
//! | `Union` | `{"selector": n, "value": v}`, `value` is `null` for no value |

use alloy_primitives::U256;
use serde_json::{json, Map, Value as Json};

use crate::{
    codec::{check_length, check_limit},
    descriptor::BasicType,
    error::Result,
    SszError, TypeDescriptor, Value,
};

/// Render `value` as `descriptor` in object form.
pub fn to_obj(descriptor: &TypeDescriptor, value: &Value) -> Result<Json> {
    descriptor.validate()?;
    render(descriptor, value)
}

/// Parse the object form of a `descriptor` value.
pub fn from_obj(descriptor: &TypeDescriptor, obj: &Json) -> Result<Value> {
    descriptor.validate()?;
    parse(descriptor, obj)
}

fn render(ty: &TypeDescriptor, value: &Value) -> Result<Json> {
    match (ty, value) {
        (TypeDescriptor::Basic(basic), Value::Bool(b)) if basic.is_boolean() => Ok(Json::Bool(*b)),
        (TypeDescriptor::Basic(basic), Value::Uint(v)) if !basic.is_boolean() => {
            if *v > basic.max_value() {
                return Err(SszError::ValueOutOfRange {
                    bits: basic.bit_width(),
                });
            }
            if basic.bit_width() <= 64 {
                Ok(json!(v.as_limbs()[0]))
            } else {
                Ok(Json::String(v.to_string()))
            }
        }
        (TypeDescriptor::Vector { elem, length }, Value::Sequence(items)) => {
            check_length(*length, items.len())?;
            render_items(elem, items)
        }
        (TypeDescriptor::List { elem, limit }, Value::Sequence(items)) => {
            check_limit(*limit, items.len())?;
            render_items(elem, items)
        }
        (TypeDescriptor::BitVector { length }, Value::Bits(bits)) => {
            check_length(*length, bits.len())?;
            Ok(json!(bits))
        }
        (TypeDescriptor::BitList { limit }, Value::Bits(bits)) => {
            check_limit(*limit, bits.len())?;
            Ok(json!(bits))
        }
        (TypeDescriptor::ByteVector { length }, Value::Bytes(bytes)) => {
            check_length(*length, bytes.len())?;
            Ok(Json::String(format!("0x{}", hex::encode(bytes))))
        }
        (TypeDescriptor::ByteList { limit }, Value::Bytes(bytes)) => {
            check_limit(*limit, bytes.len())?;
            Ok(Json::String(format!("0x{}", hex::encode(bytes))))
        }
        (TypeDescriptor::Union(union), Value::Union { selector, value }) => {
            let inner = match (union.option(*selector)?, value) {
                (None, None) => Json::Null,
                (Some(option_ty), Some(inner)) => render(option_ty, inner)?,
                (None, Some(inner)) => {
                    return Err(SszError::TypeMismatch {
                        expected: "None".to_string(),
                        found: inner.kind(),
                    })
                }
                (Some(option_ty), None) => {
                    return Err(SszError::TypeMismatch {
                        expected: option_ty.to_string(),
                        found: "none",
                    })
                }
            };
            Ok(json!({ "selector": selector, "value": inner }))
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
            let mut map = Map::with_capacity(fields.len());
            for (field, value) in fields.iter().zip(values) {
                map.insert(field.name.clone(), render(&field.ty, value)?);
            }
            Ok(Json::Object(map))
        }
        _ => Err(SszError::TypeMismatch {
            expected: ty.to_string(),
            found: value.kind(),
        }),
    }
}

fn render_items(elem: &TypeDescriptor, items: &[Value]) -> Result<Json> {
    items
        .iter()
        .map(|item| render(elem, item))
        .collect::<Result<Vec<_>>>()
        .map(Json::Array)
}

fn parse(ty: &TypeDescriptor, obj: &Json) -> Result<Value> {
    match (ty, obj) {
        (TypeDescriptor::Basic(basic), Json::Bool(b)) if basic.is_boolean() => Ok(Value::Bool(*b)),
        (TypeDescriptor::Basic(basic), Json::Number(_) | Json::String(_)) if !basic.is_boolean() => {
            parse_uint(*basic, obj)
        }
        (TypeDescriptor::Vector { elem, length }, Json::Array(items)) => {
            check_length(*length, items.len())?;
            parse_items(elem, items)
        }
        (TypeDescriptor::List { elem, limit }, Json::Array(items)) => {
            check_limit(*limit, items.len())?;
            parse_items(elem, items)
        }
        (TypeDescriptor::BitVector { length }, Json::Array(items)) => {
            check_length(*length, items.len())?;
            parse_bits(ty, items)
        }
        (TypeDescriptor::BitList { limit }, Json::Array(items)) => {
            check_limit(*limit, items.len())?;
            parse_bits(ty, items)
        }
        (TypeDescriptor::ByteVector { length }, Json::String(s)) => {
            let bytes = parse_hex(s)?;
            check_length(*length, bytes.len())?;
            Ok(Value::Bytes(bytes))
        }
        (TypeDescriptor::ByteList { limit }, Json::String(s)) => {
            let bytes = parse_hex(s)?;
            check_limit(*limit, bytes.len())?;
            Ok(Value::Bytes(bytes))
        }
        (TypeDescriptor::Union(union), Json::Object(map)) => {
            let selector = map
                .get("selector")
                .and_then(Json::as_u64)
                .and_then(|s| u8::try_from(s).ok())
                .ok_or_else(|| SszError::InvalidObject("union selector must be a u8".into()))?;
            let value = map.get("value").unwrap_or(&Json::Null);
            match union.option(selector)? {
                None if value.is_null() => Ok(Value::union(selector, None)),
                None => Err(SszError::TypeMismatch {
                    expected: "None".to_string(),
                    found: json_kind(value),
                }),
                Some(option_ty) => Ok(Value::union(selector, Some(parse(option_ty, value)?))),
            }
        }
        (TypeDescriptor::Container(container), Json::Object(map)) => {
            if let Some(unknown) = map.keys().find(|k| container.field_index(k).is_none()) {
                return Err(SszError::InvalidObject(format!(
                    "{} has no field {unknown}",
                    container.name()
                )));
            }
            container
                .fields()
                .iter()
                .map(|field| match map.get(&field.name) {
                    Some(obj) => parse(&field.ty, obj),
                    None => Err(SszError::InvalidObject(format!(
                        "{} is missing field {}",
                        container.name(),
                        field.name
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Container)
        }
        _ => Err(SszError::TypeMismatch {
            expected: ty.to_string(),
            found: json_kind(obj),
        }),
    }
}

fn parse_uint(basic: BasicType, obj: &Json) -> Result<Value> {
    let value = match obj {
        Json::Number(n) => n.as_u64().map(U256::from),
        Json::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            U256::from_str_radix(s, 10).ok()
        }
        _ => None,
    }
    .ok_or_else(|| SszError::InvalidObject(format!("{obj} is not an unsigned integer")))?;
    if value > basic.max_value() {
        return Err(SszError::ValueOutOfRange {
            bits: basic.bit_width(),
        });
    }
    Ok(Value::Uint(value))
}

fn parse_items(elem: &TypeDescriptor, items: &[Json]) -> Result<Value> {
    items
        .iter()
        .map(|item| parse(elem, item))
        .collect::<Result<Vec<_>>>()
        .map(Value::Sequence)
}

fn parse_bits(ty: &TypeDescriptor, items: &[Json]) -> Result<Value> {
    items
        .iter()
        .map(|item| {
            item.as_bool().ok_or_else(|| SszError::TypeMismatch {
                expected: ty.to_string(),
                found: json_kind(item),
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Bits)
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| SszError::InvalidObject(format!("byte string {s:?} lacks 0x prefix")))?;
    hex::decode(digits).map_err(|err| SszError::InvalidObject(format!("byte string {s:?}: {err}")))
}

fn json_kind(obj: &Json) -> &'static str {
    match obj {
        Json::Null => "null",
        Json::Bool(_) => "json bool",
        Json::Number(_) => "json number",
        Json::String(_) => "json string",
        Json::Array(_) => "json array",
        Json::Object(_) => "json object",
    }
}
