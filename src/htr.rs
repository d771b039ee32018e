//! Hash tree roots.
//!
//! The root of a value is computed from its descriptor:
//!
//! - basic values, and sequences of them, are packed into chunks and Merkleized
//!   to the chunk count of the type;
//! - sequences of composite values Merkleize one root per element;
//! - lists mix their element count into the root, unions mix in the selector;
//! - containers Merkleize their field roots.

use alloy_primitives::B256;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    chunk::{chunkify, pack_bits},
    codec::{check_length, check_limit, encode_into},
    error::Result,
    merkle::{merkleize_with, mix_in_length_with, mix_in_selector_with},
    Hasher, Sha256Hasher, SszError, TypeDescriptor, Value,
};

/// SHA-256 hash tree root of `value` as `descriptor`.
///
/// # Errors
///
/// Fails if the descriptor is invalid or the value does not type-check
/// against it (the same checks as [`serialize`](crate::serialize)).
pub fn hash_tree_root(descriptor: &TypeDescriptor, value: &Value) -> Result<B256> {
    TreeHasher::new().hash_tree_root(descriptor, value)
}

/// Hash tree root computation over a chosen [`Hasher`].
///
/// ```
/// use ssz_tree::{Blake3Hasher, TreeHasher, TypeDescriptor, Value};
///
/// let ty = TypeDescriptor::uint64();
/// let root = TreeHasher::with_hasher(Blake3Hasher)
///     .hash_tree_root(&ty, &Value::from(7u64))
///     .unwrap();
/// assert_eq!(root[0], 7);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TreeHasher<H: Hasher = Sha256Hasher> {
    hasher: H,
}

impl TreeHasher<Sha256Hasher> {
    /// Create a tree hasher over SHA-256.
    pub fn new() -> Self {
        Self::with_hasher(Sha256Hasher)
    }
}

impl<H: Hasher> TreeHasher<H> {
    /// Create a tree hasher with a custom hash function.
    ///
    /// Roots from a hasher other than [`Sha256Hasher`] are only comparable
    /// with roots from the same hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    /// The hash function in use.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Root of `value` as `descriptor`.
    pub fn hash_tree_root(&self, descriptor: &TypeDescriptor, value: &Value) -> Result<B256> {
        descriptor.validate()?;
        self.root(descriptor, value)
    }

    fn root(&self, ty: &TypeDescriptor, value: &Value) -> Result<B256> {
        match (ty, value) {
            (TypeDescriptor::Basic(_), _) => self.packed_root(ty, value),
            (TypeDescriptor::Vector { elem, length }, Value::Sequence(items)) => {
                if elem.as_basic().is_some() {
                    return self.packed_root(ty, value);
                }
                check_length(*length, items.len())?;
                let roots = self.element_roots(elem, items)?;
                merkleize_with(&self.hasher, &roots, *length)
            }
            (TypeDescriptor::List { elem, limit }, Value::Sequence(items)) => {
                let root = if elem.as_basic().is_some() {
                    self.packed_root(ty, value)?
                } else {
                    check_limit(*limit, items.len())?;
                    let roots = self.element_roots(elem, items)?;
                    merkleize_with(&self.hasher, &roots, *limit)?
                };
                Ok(mix_in_length_with(&self.hasher, &root, items.len()))
            }
            (TypeDescriptor::BitVector { length }, Value::Bits(bits)) => {
                check_length(*length, bits.len())?;
                merkleize_with(&self.hasher, &chunkify(&pack_bits(bits)), ty.chunk_count())
            }
            (TypeDescriptor::BitList { limit }, Value::Bits(bits)) => {
                check_limit(*limit, bits.len())?;
                // No boundary bit: the length is mixed in instead.
                let root =
                    merkleize_with(&self.hasher, &chunkify(&pack_bits(bits)), ty.chunk_count())?;
                Ok(mix_in_length_with(&self.hasher, &root, bits.len()))
            }
            (TypeDescriptor::ByteVector { length }, Value::Bytes(bytes)) => {
                check_length(*length, bytes.len())?;
                merkleize_with(&self.hasher, &chunkify(bytes), ty.chunk_count())
            }
            (TypeDescriptor::ByteList { limit }, Value::Bytes(bytes)) => {
                check_limit(*limit, bytes.len())?;
                let root = merkleize_with(&self.hasher, &chunkify(bytes), ty.chunk_count())?;
                Ok(mix_in_length_with(&self.hasher, &root, bytes.len()))
            }
            (TypeDescriptor::Union(union), Value::Union { selector, value }) => {
                let root = match (union.option(*selector)?, value) {
                    (None, None) => B256::ZERO,
                    (Some(option_ty), Some(inner)) => self.root(option_ty, inner)?,
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
                Ok(mix_in_selector_with(&self.hasher, &root, *selector))
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
                let roots = self.part_roots(&parts)?;
                merkleize_with(&self.hasher, &roots, fields.len())
            }
            _ => Err(SszError::TypeMismatch {
                expected: ty.to_string(),
                found: value.kind(),
            }),
        }
    }

    /// Basic values and vectors/lists of them: encode, chunk, Merkleize.
    /// The encoder performs the range and length checks.
    fn packed_root(&self, ty: &TypeDescriptor, value: &Value) -> Result<B256> {
        let mut packed = Vec::new();
        encode_into(ty, value, &mut packed)?;
        merkleize_with(&self.hasher, &chunkify(&packed), ty.chunk_count())
    }

    fn element_roots(&self, elem: &TypeDescriptor, items: &[Value]) -> Result<Vec<B256>> {
        let parts: Vec<_> = items.iter().map(|item| (elem, item)).collect();
        self.part_roots(&parts)
    }

    #[cfg(not(feature = "parallel"))]
    fn part_roots(&self, parts: &[(&TypeDescriptor, &Value)]) -> Result<Vec<B256>> {
        parts.iter().map(|(ty, value)| self.root(ty, value)).collect()
    }

    #[cfg(feature = "parallel")]
    fn part_roots(&self, parts: &[(&TypeDescriptor, &Value)]) -> Result<Vec<B256>> {
        parts
            .par_iter()
            .map(|(ty, value)| self.root(ty, value))
            .collect()
    }
}
