//! Reference fixture: a container mixing fixed and variable fields, nested
//! containers and vectors of containers.
//!
//! The expected root is rebuilt here from raw SHA-256 calls so it does not
//! depend on the crate's Merkleizer.

use sha2::{Digest, Sha256};
use ssz_tree::{
    deserialize, from_obj, hash_tree_root, serialize, to_obj, TypeDescriptor, Value, B256,
};

const COMPLEX_HEX: &str = concat!(
    "bbaa",
    "47000000",
    "ff",
    "4b000000",
    "51000000",
    "cc424242424242424237133713",
    "dd3333333333333333cdabcdab",
    "ee444444444444444433221100",
    "ff555555555555555577665544",
    "5e000000",
    "22114433",
    "666f6f626172",
    "cdab07000000ff010002000300",
    "08000000",
    "15000000",
    "adde0700000011010002000300",
    "efbe0700000022040005000600",
);

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

fn fixed_test_struct() -> TypeDescriptor {
    TypeDescriptor::container(
        "FixedTestStruct",
        [
            ("A", TypeDescriptor::uint8()),
            ("B", TypeDescriptor::uint64()),
            ("C", TypeDescriptor::uint32()),
        ],
    )
}

fn complex_test_struct() -> TypeDescriptor {
    TypeDescriptor::container(
        "ComplexTestStruct",
        [
            ("A", TypeDescriptor::uint16()),
            ("B", TypeDescriptor::list(TypeDescriptor::uint16(), 128)),
            ("C", TypeDescriptor::uint8()),
            ("D", TypeDescriptor::bytelist(256)),
            ("E", var_test_struct()),
            ("F", TypeDescriptor::vector(fixed_test_struct(), 4)),
            ("G", TypeDescriptor::vector(var_test_struct(), 2)),
        ],
    )
}

fn var_value(a: u16, b: &[u16], c: u8) -> Value {
    Value::Container(vec![
        Value::from(a),
        Value::Sequence(b.iter().map(|&x| Value::from(x)).collect()),
        Value::from(c),
    ])
}

fn fixed_value(a: u8, b: u64, c: u32) -> Value {
    Value::Container(vec![Value::from(a), Value::from(b), Value::from(c)])
}

fn complex_value() -> Value {
    Value::Container(vec![
        Value::from(0xaabbu16),
        Value::Sequence(vec![Value::from(0x1122u16), Value::from(0x3344u16)]),
        Value::from(0xffu8),
        Value::Bytes(b"foobar".to_vec()),
        var_value(0xabcd, &[1, 2, 3], 0xff),
        Value::Sequence(vec![
            fixed_value(0xcc, 0x4242424242424242, 0x13371337),
            fixed_value(0xdd, 0x3333333333333333, 0xabcdabcd),
            fixed_value(0xee, 0x4444444444444444, 0x00112233),
            fixed_value(0xff, 0x5555555555555555, 0x44556677),
        ]),
        Value::Sequence(vec![
            var_value(0xdead, &[1, 2, 3], 0x11),
            var_value(0xbeef, &[4, 5, 6], 0x22),
        ]),
    ])
}

// ============================================================================
// Independent tree helpers
// ============================================================================

fn h(left: &B256, right: &B256) -> B256 {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    B256::from_slice(&hasher.finalize())
}

fn chunk(hex_str: &str) -> B256 {
    let bytes = hex::decode(hex_str).unwrap();
    let mut c = [0u8; 32];
    c[..bytes.len()].copy_from_slice(&bytes);
    B256::from(c)
}

fn zero(depth: usize) -> B256 {
    (0..depth).fold(B256::ZERO, |acc, _| h(&acc, &acc))
}

/// Climb from a single leaf to `depth` with zero siblings on the right.
fn merge(leaf: B256, depth: usize) -> B256 {
    (0..depth).fold(leaf, |acc, level| h(&acc, &zero(level)))
}

fn len_chunk(n: u8) -> B256 {
    chunk(&format!("{n:02x}"))
}

fn var_root(a: &str, b: &str, b_len: u8, c: &str) -> B256 {
    // List[uint16, 1024] spans 64 chunks.
    let b_root = h(&merge(chunk(b), 6), &len_chunk(b_len));
    h(&h(&chunk(a), &b_root), &h(&chunk(c), &B256::ZERO))
}

fn fixed_root(a: &str, b: &str, c: &str) -> B256 {
    h(&h(&chunk(a), &chunk(b)), &h(&chunk(c), &B256::ZERO))
}

fn expected_root() -> B256 {
    let a = chunk("bbaa");
    // List[uint16, 128] and List[byte, 256] both span 8 chunks.
    let b = h(&merge(chunk("22114433"), 3), &len_chunk(2));
    let c = chunk("ff");
    let d = h(&merge(chunk("666f6f626172"), 3), &len_chunk(6));
    let e = var_root("cdab", "010002000300", 3, "ff");
    let f = h(
        &h(
            &fixed_root("cc", "4242424242424242", "37133713"),
            &fixed_root("dd", "3333333333333333", "cdabcdab"),
        ),
        &h(
            &fixed_root("ee", "4444444444444444", "33221100"),
            &fixed_root("ff", "5555555555555555", "77665544"),
        ),
    );
    let g = h(
        &var_root("adde", "010002000300", 3, "11"),
        &var_root("efbe", "040005000600", 3, "22"),
    );
    h(
        &h(&h(&a, &b), &h(&c, &d)),
        &h(&h(&e, &f), &h(&g, &B256::ZERO)),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_complex_serialization() {
    let bytes = serialize(&complex_test_struct(), &complex_value()).unwrap();
    assert_eq!(hex::encode(&bytes), COMPLEX_HEX);
}

#[test]
fn test_complex_deserialization() {
    let bytes = hex::decode(COMPLEX_HEX).unwrap();
    assert_eq!(
        deserialize(&complex_test_struct(), &bytes).unwrap(),
        complex_value()
    );
}

#[test]
fn test_complex_hash_tree_root() {
    assert_eq!(
        hash_tree_root(&complex_test_struct(), &complex_value()).unwrap(),
        expected_root()
    );
}

#[test]
fn test_decoded_value_has_same_root() {
    let ty = complex_test_struct();
    let decoded = deserialize(&ty, &hex::decode(COMPLEX_HEX).unwrap()).unwrap();
    assert_eq!(hash_tree_root(&ty, &decoded).unwrap(), expected_root());
}

#[test]
fn test_byte_list_matches_list_of_bytes() {
    let as_bytes = TypeDescriptor::bytelist(256);
    let as_list = TypeDescriptor::list(TypeDescriptor::byte(), 256);
    let bytes_value = Value::Bytes(b"foobar".to_vec());
    let list_value = Value::Sequence(b"foobar".iter().map(|&b| Value::from(b)).collect());
    assert_eq!(
        serialize(&as_bytes, &bytes_value).unwrap(),
        serialize(&as_list, &list_value).unwrap()
    );
    assert_eq!(
        hash_tree_root(&as_bytes, &bytes_value).unwrap(),
        hash_tree_root(&as_list, &list_value).unwrap()
    );
}

#[test]
fn test_field_access() {
    let ty = complex_test_struct();
    let value = complex_value();
    assert_eq!(value.field(&ty, "C").unwrap(), &Value::from(0xffu8));
    assert_eq!(
        value.field(&ty, "D").unwrap().as_bytes(),
        Some(&b"foobar"[..])
    );
    assert!(value.field(&ty, "Z").is_err());
}

#[test]
fn test_object_form_roundtrip() {
    let ty = complex_test_struct();
    let obj = to_obj(&ty, &complex_value()).unwrap();
    assert_eq!(obj["A"], 0xaabb);
    assert_eq!(obj["D"], "0x666f6f626172");
    assert_eq!(obj["G"][1]["B"], serde_json::json!([4, 5, 6]));
    assert_eq!(from_obj(&ty, &obj).unwrap(), complex_value());
}

#[test]
fn test_default_value_roundtrip() {
    let ty = complex_test_struct();
    let value = ty.default_value();
    let bytes = serialize(&ty, &value).unwrap();
    assert_eq!(bytes.len(), ty.min_byte_length());
    assert_eq!(deserialize(&ty, &bytes).unwrap(), value);
}
