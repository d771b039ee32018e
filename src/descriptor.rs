//! Type descriptors.
//!
//! A [`TypeDescriptor`] is a static, composable description of a value's
//! shape. Descriptors are immutable and shared through [`Arc`], so a nested
//! type can be referenced from many parents without copying.
//!
//! Every algorithm in the crate (encode, decode, hash-tree-root) is a single
//! exhaustive `match` over the descriptor variant.

use alloy_primitives::U256;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::{
    chunk::{BITS_PER_CHUNK, BYTES_PER_CHUNK},
    codec::OFFSET_SIZE,
    error::Result,
    SszError, Value,
};

/// Maximum number of options a union selector byte can address.
pub const MAX_UNION_OPTIONS: usize = 128;

/// Fixed-width basic types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasicType {
    Boolean,
    Bit,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    Uint256,
}

impl BasicType {
    /// Width in bits as declared (1 for booleans and bits).
    pub const fn bit_width(self) -> usize {
        match self {
            Self::Boolean | Self::Bit => 1,
            Self::Uint8 => 8,
            Self::Uint16 => 16,
            Self::Uint32 => 32,
            Self::Uint64 => 64,
            Self::Uint128 => 128,
            Self::Uint256 => 256,
        }
    }

    /// Encoded size in bytes.
    pub const fn byte_size(self) -> usize {
        match self {
            Self::Boolean | Self::Bit => 1,
            _ => self.bit_width() / 8,
        }
    }

    /// Whether values are restricted to 0 and 1.
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::Boolean | Self::Bit)
    }

    /// Largest representable value.
    pub fn max_value(self) -> U256 {
        match self {
            Self::Boolean | Self::Bit => U256::from(1u8),
            Self::Uint256 => U256::MAX,
            _ => (U256::from(1u8) << self.bit_width()) - U256::from(1u8),
        }
    }

    /// Type name as used in descriptor notation.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Bit => "bit",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uint128 => "uint128",
            Self::Uint256 => "uint256",
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tagged union over an ordered list of options.
///
/// Option 0 may be `None`, which makes the union nullable: selector 0 then
/// carries no value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionType {
    options: Vec<Option<Arc<TypeDescriptor>>>,
}

impl UnionType {
    /// All options in selector order.
    pub fn options(&self) -> &[Option<Arc<TypeDescriptor>>] {
        &self.options
    }

    /// Descriptor for `selector`, `Ok(None)` for the "no value" option.
    pub fn option(&self, selector: u8) -> Result<Option<&TypeDescriptor>> {
        match self.options.get(selector as usize) {
            Some(option) => Ok(option.as_deref()),
            None => Err(SszError::UnknownSelector {
                selector,
                options: self.options.len(),
            }),
        }
    }

    /// Whether selector 0 denotes "no value".
    pub fn is_nullable(&self) -> bool {
        matches!(self.options.first(), Some(None))
    }
}

/// A named field of a container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: Arc<TypeDescriptor>,
}

/// Composite record with an ordered field list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerType {
    name: String,
    fields: Vec<Field>,
}

impl ContainerType {
    /// Container name, used in notation and error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Position of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Static description of a value's shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDescriptor {
    Basic(BasicType),
    Vector {
        elem: Arc<TypeDescriptor>,
        length: usize,
    },
    List {
        elem: Arc<TypeDescriptor>,
        limit: usize,
    },
    BitVector {
        length: usize,
    },
    BitList {
        limit: usize,
    },
    ByteVector {
        length: usize,
    },
    ByteList {
        limit: usize,
    },
    Union(UnionType),
    Container(ContainerType),
}

impl TypeDescriptor {
    /// `boolean`: one byte, `0x00` or `0x01`.
    pub const fn boolean() -> Self {
        Self::Basic(BasicType::Boolean)
    }

    /// `bit`: encodes like `boolean`.
    pub const fn bit() -> Self {
        Self::Basic(BasicType::Bit)
    }

    /// Alias of `uint8`; byte and uint8 share encoding and root.
    pub const fn byte() -> Self {
        Self::Basic(BasicType::Uint8)
    }

    /// `uint8`.
    pub const fn uint8() -> Self {
        Self::Basic(BasicType::Uint8)
    }

    /// `uint16`.
    pub const fn uint16() -> Self {
        Self::Basic(BasicType::Uint16)
    }

    /// `uint32`.
    pub const fn uint32() -> Self {
        Self::Basic(BasicType::Uint32)
    }

    /// `uint64`.
    pub const fn uint64() -> Self {
        Self::Basic(BasicType::Uint64)
    }

    /// `uint128`.
    pub const fn uint128() -> Self {
        Self::Basic(BasicType::Uint128)
    }

    /// `uint256`.
    pub const fn uint256() -> Self {
        Self::Basic(BasicType::Uint256)
    }

    /// `Vector[elem, length]`: exactly `length` elements. `length` must be nonzero.
    pub fn vector(elem: impl Into<Arc<TypeDescriptor>>, length: usize) -> Self {
        Self::Vector {
            elem: elem.into(),
            length,
        }
    }

    /// `List[elem, limit]`: up to `limit` elements, length mixed into the root.
    pub fn list(elem: impl Into<Arc<TypeDescriptor>>, limit: usize) -> Self {
        Self::List {
            elem: elem.into(),
            limit,
        }
    }

    /// `Bitvector[length]`: exactly `length` bits. `length` must be nonzero.
    pub const fn bitvector(length: usize) -> Self {
        Self::BitVector { length }
    }

    /// `Bitlist[limit]`: up to `limit` bits, encoded with a boundary bit.
    pub const fn bitlist(limit: usize) -> Self {
        Self::BitList { limit }
    }

    /// `ByteVector[length]`: exactly `length` bytes. `length` must be nonzero.
    pub const fn bytevector(length: usize) -> Self {
        Self::ByteVector { length }
    }

    /// `ByteList[limit]`: up to `limit` bytes.
    pub const fn bytelist(limit: usize) -> Self {
        Self::ByteList { limit }
    }

    /// Union over `options`; pass `None` first for a nullable union.
    pub fn union<I, T>(options: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
        T: Into<Arc<TypeDescriptor>>,
    {
        Self::Union(UnionType {
            options: options.into_iter().map(|o| o.map(Into::into)).collect(),
        })
    }

    /// Container with the given fields in declaration order.
    pub fn container<I, N, T>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<Arc<TypeDescriptor>>,
    {
        Self::Container(ContainerType {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(name, ty)| Field {
                    name: name.into(),
                    ty: ty.into(),
                })
                .collect(),
        })
    }

    /// The basic type, if this descriptor is one.
    pub fn as_basic(&self) -> Option<BasicType> {
        match self {
            Self::Basic(basic) => Some(*basic),
            _ => None,
        }
    }

    /// Check the descriptor (recursively) has a valid wire form.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Basic(_) | Self::BitList { .. } | Self::ByteList { .. } => Ok(()),
            Self::Vector { elem, length } => {
                if *length == 0 {
                    return Err(invalid(format!("{self} has zero length")));
                }
                elem.validate()
            }
            Self::List { elem, .. } => elem.validate(),
            Self::BitVector { length } | Self::ByteVector { length } => {
                if *length == 0 {
                    return Err(invalid(format!("{self} has zero length")));
                }
                Ok(())
            }
            Self::Union(union) => {
                let options = union.options();
                if options.is_empty() {
                    return Err(invalid("union without options".into()));
                }
                if options.len() > MAX_UNION_OPTIONS {
                    return Err(invalid(format!(
                        "union with {} options exceeds {MAX_UNION_OPTIONS}",
                        options.len()
                    )));
                }
                if options.len() == 1 && options[0].is_none() {
                    return Err(invalid("union with only a None option".into()));
                }
                for (i, option) in options.iter().enumerate() {
                    match option {
                        Some(ty) => ty.validate()?,
                        None if i == 0 => {}
                        None => {
                            return Err(invalid(format!("None option at selector {i}")));
                        }
                    }
                }
                Ok(())
            }
            Self::Container(container) => {
                if container.fields.is_empty() {
                    return Err(invalid(format!("container {} has no fields", container.name)));
                }
                let mut seen = HashSet::with_capacity(container.fields.len());
                for field in &container.fields {
                    if !seen.insert(field.name.as_str()) {
                        return Err(invalid(format!(
                            "container {} repeats field {}",
                            container.name, field.name
                        )));
                    }
                    field.ty.validate()?;
                }
                Ok(())
            }
        }
    }

    /// Whether every value of this type encodes to the same number of bytes.
    pub fn is_fixed_size(&self) -> bool {
        match self {
            Self::Basic(_) | Self::BitVector { .. } | Self::ByteVector { .. } => true,
            Self::Vector { elem, .. } => elem.is_fixed_size(),
            Self::List { .. } | Self::BitList { .. } | Self::ByteList { .. } | Self::Union(_) => {
                false
            }
            Self::Container(container) => container.fields.iter().all(|f| f.ty.is_fixed_size()),
        }
    }

    /// Encoded size for fixed-size types, `None` for variable-size ones.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Basic(basic) => Some(basic.byte_size()),
            Self::Vector { elem, length } => elem.fixed_size().map(|s| s.saturating_mul(*length)),
            Self::BitVector { length } => Some(length.div_ceil(8)),
            Self::ByteVector { length } => Some(*length),
            Self::List { .. } | Self::BitList { .. } | Self::ByteList { .. } | Self::Union(_) => {
                None
            }
            Self::Container(container) => container
                .fields
                .iter()
                .try_fold(0usize, |acc, f| f.ty.fixed_size().map(|s| acc.saturating_add(s))),
        }
    }

    /// Bytes this type occupies in its parent's header region.
    pub fn header_slot_size(&self) -> usize {
        self.fixed_size().unwrap_or(OFFSET_SIZE)
    }

    /// Smallest valid encoding length.
    pub fn min_byte_length(&self) -> usize {
        match self {
            Self::Basic(_) | Self::BitVector { .. } | Self::ByteVector { .. } => {
                self.fixed_size().unwrap_or_default()
            }
            Self::Vector { elem, length } => match elem.fixed_size() {
                Some(size) => size.saturating_mul(*length),
                None => (OFFSET_SIZE.saturating_add(elem.min_byte_length())).saturating_mul(*length),
            },
            Self::List { .. } | Self::ByteList { .. } => 0,
            Self::BitList { .. } => 1,
            Self::Union(union) => {
                let smallest = union
                    .options
                    .iter()
                    .map(|o| o.as_ref().map_or(0, |ty| ty.min_byte_length()))
                    .min()
                    .unwrap_or_default();
                smallest.saturating_add(1)
            }
            Self::Container(container) => container.fields.iter().fold(0usize, |acc, f| {
                let len = match f.ty.fixed_size() {
                    Some(size) => size,
                    None => OFFSET_SIZE.saturating_add(f.ty.min_byte_length()),
                };
                acc.saturating_add(len)
            }),
        }
    }

    /// Largest valid encoding length (saturating at `usize::MAX`).
    pub fn max_byte_length(&self) -> usize {
        match self {
            Self::Basic(_) | Self::BitVector { .. } | Self::ByteVector { .. } => {
                self.fixed_size().unwrap_or_default()
            }
            Self::Vector { elem, length } => match elem.fixed_size() {
                Some(size) => size.saturating_mul(*length),
                None => (OFFSET_SIZE.saturating_add(elem.max_byte_length())).saturating_mul(*length),
            },
            Self::List { elem, limit } => match elem.fixed_size() {
                Some(size) => size.saturating_mul(*limit),
                None => (OFFSET_SIZE.saturating_add(elem.max_byte_length())).saturating_mul(*limit),
            },
            Self::BitList { limit } => limit / 8 + 1,
            Self::ByteList { limit } => *limit,
            Self::Union(union) => {
                let largest = union
                    .options
                    .iter()
                    .map(|o| o.as_ref().map_or(0, |ty| ty.max_byte_length()))
                    .max()
                    .unwrap_or_default();
                largest.saturating_add(1)
            }
            Self::Container(container) => container.fields.iter().fold(0usize, |acc, f| {
                let len = match f.ty.fixed_size() {
                    Some(size) => size,
                    None => OFFSET_SIZE.saturating_add(f.ty.max_byte_length()),
                };
                acc.saturating_add(len)
            }),
        }
    }

    /// Number of leaf chunks the contents are merkleized over (the tree `limit`).
    ///
    /// For lists this is the capacity at `limit`, not the current length.
    pub fn chunk_count(&self) -> usize {
        match self {
            Self::Basic(_) => 1,
            Self::Vector { elem, length } => match elem.as_basic() {
                Some(basic) => packed_chunks(basic.byte_size(), *length),
                None => *length,
            },
            Self::List { elem, limit } => match elem.as_basic() {
                Some(basic) => packed_chunks(basic.byte_size(), *limit),
                None => *limit,
            },
            Self::BitVector { length } => length.div_ceil(BITS_PER_CHUNK),
            Self::BitList { limit } => limit.div_ceil(BITS_PER_CHUNK),
            Self::ByteVector { length } => length.div_ceil(BYTES_PER_CHUNK),
            Self::ByteList { limit } => limit.div_ceil(BYTES_PER_CHUNK),
            Self::Union(_) => 1,
            Self::Container(container) => container.fields.len(),
        }
    }

    /// The zero value of this type.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Basic(basic) if basic.is_boolean() => Value::Bool(false),
            Self::Basic(_) => Value::Uint(U256::ZERO),
            Self::Vector { elem, length } => {
                Value::Sequence((0..*length).map(|_| elem.default_value()).collect())
            }
            Self::List { .. } => Value::Sequence(Vec::new()),
            Self::BitVector { length } => Value::Bits(vec![false; *length]),
            Self::BitList { .. } => Value::Bits(Vec::new()),
            Self::ByteVector { length } => Value::Bytes(vec![0u8; *length]),
            Self::ByteList { .. } => Value::Bytes(Vec::new()),
            Self::Union(union) => Value::Union {
                selector: 0,
                value: union
                    .options
                    .first()
                    .and_then(|o| o.as_ref())
                    .map(|ty| Box::new(ty.default_value())),
            },
            Self::Container(container) => {
                Value::Container(container.fields.iter().map(|f| f.ty.default_value()).collect())
            }
        }
    }
}

/// Chunks needed to pack `count` basic values of `size` bytes each.
fn packed_chunks(size: usize, count: usize) -> usize {
    size.saturating_mul(count).div_ceil(BYTES_PER_CHUNK)
}

fn invalid(reason: String) -> SszError {
    SszError::InvalidDescriptor(reason)
}

impl From<BasicType> for TypeDescriptor {
    fn from(basic: BasicType) -> Self {
        Self::Basic(basic)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic(basic) => write!(f, "{basic}"),
            Self::Vector { elem, length } => write!(f, "Vector[{elem}, {length}]"),
            Self::List { elem, limit } => write!(f, "List[{elem}, {limit}]"),
            Self::BitVector { length } => write!(f, "Bitvector[{length}]"),
            Self::BitList { limit } => write!(f, "Bitlist[{limit}]"),
            Self::ByteVector { length } => write!(f, "ByteVector[{length}]"),
            Self::ByteList { limit } => write!(f, "ByteList[{limit}]"),
            Self::Union(union) => {
                f.write_str("Union[")?;
                for (i, option) in union.options.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match option {
                        Some(ty) => write!(f, "{ty}")?,
                        None => f.write_str("None")?,
                    }
                }
                f.write_str("]")
            }
            Self::Container(container) => f.write_str(&container.name),
        }
    }
}
