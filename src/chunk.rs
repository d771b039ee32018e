//! Chunking and packing.
//!
//! A chunk is the 32-byte leaf unit of Merkleization. Basic values are packed
//! by concatenating their encodings and splitting the result into chunks, so
//! several small values share one leaf.

use alloy_primitives::B256;

/// Size of a chunk in bytes.
pub const BYTES_PER_CHUNK: usize = 32;

/// Number of bits that fit in one chunk.
pub const BITS_PER_CHUNK: usize = BYTES_PER_CHUNK * 8;

/// Split `bytes` into 32-byte chunks, zero-padding the last one.
///
/// Empty input yields no chunks; the caller's tree limit decides padding.
pub fn chunkify(bytes: &[u8]) -> Vec<B256> {
    bytes
        .chunks(BYTES_PER_CHUNK)
        .map(|group| {
            let mut chunk = [0u8; BYTES_PER_CHUNK];
            chunk[..group.len()].copy_from_slice(group);
            B256::from(chunk)
        })
        .collect()
}

/// Pack bits LSB-first into `ceil(len / 8)` bytes; unused high bits are zero.
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; bits.len().div_ceil(8)];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            bytes[i / 8] |= 1 << (i % 8);
        }
    }
    bytes
}

/// Pack bits LSB-first followed by a single boundary bit set to 1.
///
/// An empty bit list encodes as `[0x01]`.
pub fn pack_bits_with_boundary(bits: &[bool]) -> Vec<u8> {
    let len = bits.len();
    let mut bytes = pack_bits(bits);
    if len % 8 == 0 {
        bytes.push(1);
    } else {
        bytes[len / 8] |= 1 << (len % 8);
    }
    bytes
}

/// Unpack the first `len` bits of `bytes`, LSB-first.
///
/// Bits past the end of `bytes` read as zero.
pub fn unpack_bits(bytes: &[u8], len: usize) -> Vec<bool> {
    (0..len)
        .map(|i| bytes.get(i / 8).is_some_and(|byte| (byte >> (i % 8)) & 1 == 1))
        .collect()
}
