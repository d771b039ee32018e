#![no_main]

use libfuzzer_sys::fuzz_target;
use ssz_tree::{deserialize, hash_tree_root, serialize, TypeDescriptor};

/// Accepted input is canonical: decode, re-encode and decode again are stable
fuzz_target!(|data: &[u8]| {
    let ty = TypeDescriptor::container(
        "Mixed",
        [
            ("a", TypeDescriptor::uint16()),
            ("b", TypeDescriptor::list(TypeDescriptor::bytelist(8), 4)),
            ("c", TypeDescriptor::bitlist(20)),
            (
                "d",
                TypeDescriptor::union([None, Some(TypeDescriptor::uint8())]),
            ),
        ],
    );

    let Ok(value) = deserialize(&ty, data) else {
        return;
    };
    let encoded = serialize(&ty, &value).unwrap();
    assert_eq!(encoded, data);
    assert_eq!(deserialize(&ty, &encoded).unwrap(), value);
    hash_tree_root(&ty, &value).unwrap();
});
