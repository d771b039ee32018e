//! Dynamic values checked against a [`TypeDescriptor`](crate::TypeDescriptor).

use alloy_primitives::U256;

use crate::{error::Result, SszError, TypeDescriptor};

/// A value of some descriptor type.
///
/// The representation is deliberately loose (every unsigned integer is a
/// `U256`, vectors and lists share [`Value::Sequence`]); the encoder and the
/// hasher type-check it against the descriptor they are given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// `boolean` or `bit`.
    Bool(bool),
    /// Any `uintN`; range is checked against the declared width.
    Uint(U256),
    /// `ByteVector` or `ByteList` contents.
    Bytes(Vec<u8>),
    /// `Bitvector` or `Bitlist` contents, without the boundary bit.
    Bits(Vec<bool>),
    /// `Vector` or `List` elements.
    Sequence(Vec<Value>),
    /// Union selector and the selected option's value (`None` for "no value").
    Union {
        selector: u8,
        value: Option<Box<Value>>,
    },
    /// Container field values in declaration order.
    Container(Vec<Value>),
}

impl Value {
    /// Variant name used in type-mismatch errors.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint",
            Self::Bytes(_) => "bytes",
            Self::Bits(_) => "bits",
            Self::Sequence(_) => "sequence",
            Self::Union { .. } => "union",
            Self::Container(_) => "container",
        }
    }

    /// Build a union value.
    pub fn union(selector: u8, value: Option<Value>) -> Self {
        Self::Union {
            selector,
            value: value.map(Box::new),
        }
    }

    /// Look up a container field by name.
    pub fn field(&self, descriptor: &TypeDescriptor, name: &str) -> Result<&Value> {
        let (TypeDescriptor::Container(container), Value::Container(values)) = (descriptor, self)
        else {
            return Err(SszError::TypeMismatch {
                expected: descriptor.to_string(),
                found: self.kind(),
            });
        };
        container
            .field_index(name)
            .and_then(|i| values.get(i))
            .ok_or_else(|| SszError::UnknownField {
                container: container.name().to_string(),
                field: name.to_string(),
            })
    }

    /// The integer, if this is a `Uint`.
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// The flag, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The contents, if this is `Bytes`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! impl_from_uint {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Uint(U256::from(v))
                }
            }
        )*
    };
}

impl_from_uint!(u8, u16, u32, u64, u128);

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Self::Uint(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<bool>> for Value {
    fn from(v: Vec<bool>) -> Self {
        Self::Bits(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Sequence(v)
    }
}
