//! End-to-end codec laws: decode ∘ encode = id, determinism, convergence.

use std::io::Cursor;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use eris_codec::{decode, encode, BlockSize, MemoryStore, ReadCapability};

fn encode_into(
    store: &mut MemoryStore,
    content: &[u8],
    secret: &[u8],
    size: BlockSize,
) -> ReadCapability {
    encode(&mut Cursor::new(content), store, secret, size).unwrap()
}

fn decode_all(store: &MemoryStore, root: &ReadCapability) -> Vec<u8> {
    let mut out = Vec::new();
    decode(store, &mut out, root).unwrap();
    out
}

fn block_size_strategy() -> impl Strategy<Value = BlockSize> {
    prop_oneof![Just(BlockSize::Size1KiB), Just(BlockSize::Size32KiB)]
}

proptest! {
    #[test]
    fn decode_inverts_encode(
        content in proptest::collection::vec(any::<u8>(), 0..40 * 1024),
        secret in prop_oneof![
            Just(Vec::new()),
            proptest::collection::vec(any::<u8>(), 32..=32),
        ],
        size in block_size_strategy(),
    ) {
        let mut store = MemoryStore::new();
        let root = encode_into(&mut store, &content, &secret, size);
        prop_assert_eq!(decode_all(&store, &root), content);
    }

    #[test]
    fn encoding_converges(
        content in proptest::collection::vec(any::<u8>(), 0..8 * 1024),
    ) {
        let mut store = MemoryStore::new();
        let first = encode_into(&mut store, &content, b"", BlockSize::Size1KiB);
        let blocks_after_first = store.len();

        // Re-encoding identical content adds nothing to the store and
        // produces the identical root.
        let second = encode_into(&mut store, &content, b"", BlockSize::Size1KiB);
        prop_assert_eq!(first, second);
        prop_assert_eq!(store.len(), blocks_after_first);
    }

    #[test]
    fn secret_scopes_deduplication(
        content in proptest::collection::vec(any::<u8>(), 1..4 * 1024),
    ) {
        let mut store = MemoryStore::new();
        let open = encode_into(&mut store, &content, b"", BlockSize::Size1KiB);
        let scoped = encode_into(&mut store, &content, &[0xaa; 32], BlockSize::Size1KiB);
        prop_assert_ne!(open.reference(), scoped.reference());
    }

    #[test]
    fn capability_urn_roundtrips_from_encoding(
        content in proptest::collection::vec(any::<u8>(), 0..2 * 1024),
    ) {
        let mut store = MemoryStore::new();
        let root = encode_into(&mut store, &content, b"", BlockSize::Size1KiB);
        let reparsed: ReadCapability = root.urn().parse().unwrap();
        prop_assert_eq!(reparsed, root);
    }
}

#[test]
fn two_level_tree_at_32kib() {
    // One byte past 512 full blocks forces a second node level.
    let len = 32 * 1024 * 512 + 1;
    let mut content = vec![0u8; len];
    StdRng::seed_from_u64(0x4552_4953).fill_bytes(&mut content);

    let mut store = MemoryStore::new();
    let root = encode_into(&mut store, &content, b"", BlockSize::Size32KiB);

    assert_eq!(root.level(), 2);
    // 513 content blocks, two level-1 nodes, one root.
    assert_eq!(store.len(), 516);
    assert_eq!(decode_all(&store, &root), content);
}

#[test]
fn cross_block_size_roots_differ() {
    let content = vec![9u8; 500];
    let mut store = MemoryStore::new();
    let small = encode_into(&mut store, &content, b"", BlockSize::Size1KiB);
    let large = encode_into(&mut store, &content, b"", BlockSize::Size32KiB);
    assert_ne!(small.reference(), large.reference());
    assert_eq!(decode_all(&store, &small), content);
    assert_eq!(decode_all(&store, &large), content);
}
