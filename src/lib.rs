//! # ssz-tree
//!
//! Deterministic binary encoding and hash-tree-root computation for typed
//! values described at runtime by a [`TypeDescriptor`].
//!
//! Two primitives sit at the core:
//!
//! - [`serialize`] / [`deserialize`]: a canonical byte encoding. Fixed-size
//!   parts are laid out in order; variable-size parts are addressed through
//!   4-byte little-endian offsets in a header region.
//! - [`hash_tree_root`]: a 32-byte commitment to a value. Values are split
//!   into 32-byte chunks and Merkleized over a binary tree padded with zero
//!   subtrees to the capacity of the type, with list lengths and union
//!   selectors mixed into the root.
//!
//! ## Example
//!
//! ```
//! use ssz_tree::{deserialize, hash_tree_root, serialize, TypeDescriptor, Value};
//!
//! let ty = TypeDescriptor::list(TypeDescriptor::uint16(), 128);
//! let value = Value::Sequence(vec![Value::from(0x1122u16), Value::from(0x3344u16)]);
//!
//! let bytes = serialize(&ty, &value).unwrap();
//! assert_eq!(bytes, [0x22, 0x11, 0x44, 0x33]);
//! assert_eq!(deserialize(&ty, &bytes).unwrap(), value);
//!
//! let root = hash_tree_root(&ty, &value).unwrap();
//! assert_ne!(root, ssz_tree::B256::ZERO);
//! ```
//!
//! ## Hash Function
//!
//! Roots use SHA-256 by default. [`TreeHasher::with_hasher`] and the `_with`
//! Merkleization functions accept any [`Hasher`], e.g. [`Blake3Hasher`].
//!
//! ## Features
//!
//! - `parallel`: hash wide tree layers and the element roots of composite
//!   collections on the rayon thread pool.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod chunk;
mod codec;
mod descriptor;
mod error;
mod hash;
mod htr;
mod merkle;
mod obj;
mod value;
mod zero;

pub use chunk::{
    chunkify, pack_bits, pack_bits_with_boundary, unpack_bits, BITS_PER_CHUNK, BYTES_PER_CHUNK,
};
pub use codec::{deserialize, serialize, OFFSET_SIZE};
pub use descriptor::{BasicType, ContainerType, Field, TypeDescriptor, UnionType, MAX_UNION_OPTIONS};
pub use error::{Result, SszError};
pub use hash::{Blake3Hasher, Hasher, Sha256Hasher};
pub use htr::{hash_tree_root, TreeHasher};
pub use merkle::{
    depth_for_limit, merkleize, merkleize_with, mix_in_length, mix_in_length_with,
    mix_in_selector, mix_in_selector_with, StreamingMerkleizer,
};
pub use obj::{from_obj, to_obj};
pub use value::Value;
pub use zero::{zero_hash, ZeroHashes, MAX_TREE_DEPTH};

/// Re-export alloy primitives for convenience
pub use alloy_primitives::{B256, U256};
