#![no_main]

use libfuzzer_sys::fuzz_target;
use ssz_tree::{deserialize, TypeDescriptor};

fn descriptors() -> Vec<TypeDescriptor> {
    let var = TypeDescriptor::container(
        "VarTestStruct",
        [
            ("A", TypeDescriptor::uint16()),
            ("B", TypeDescriptor::list(TypeDescriptor::uint16(), 1024)),
            ("C", TypeDescriptor::uint8()),
        ],
    );
    vec![
        TypeDescriptor::boolean(),
        TypeDescriptor::uint256(),
        TypeDescriptor::bitlist(100),
        TypeDescriptor::bitvector(13),
        TypeDescriptor::list(TypeDescriptor::uint64(), 1 << 20),
        TypeDescriptor::list(TypeDescriptor::bytelist(64), 32),
        TypeDescriptor::union([
            None,
            Some(TypeDescriptor::uint32()),
            Some(var.clone()),
        ]),
        TypeDescriptor::vector(var.clone(), 2),
        TypeDescriptor::list(var, 8),
    ]
}

/// Arbitrary bytes must decode or fail, never panic
fuzz_target!(|data: &[u8]| {
    let Some((&which, bytes)) = data.split_first() else {
        return;
    };
    let descriptors = descriptors();
    let ty = &descriptors[which as usize % descriptors.len()];
    let _ = deserialize(ty, bytes);
});
