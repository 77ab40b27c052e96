//! Verifying streaming decoder
//!
//! Decoding walks the block tree depth first from the root capability,
//! fetching each block from a caller-supplied [`BlockStorage`] oracle. The
//! oracle is never trusted: every fetched block is length-checked and
//! re-hashed against the reference it was requested under before its key is
//! applied. Content blocks stream through a one-block look-ahead sink so
//! that the final block, and only that block, has its padding stripped.
//! Plaintext reaches the writer in source order.
//!
//! ## Example Usage
//!
//! ```
//! use eris_codec::{decode, encode_1kib, MemoryStore};
//! use std::io::Cursor;
//!
//! let mut store = MemoryStore::new();
//! let root = encode_1kib(&mut Cursor::new(b"fetch me"), &mut store, b"").unwrap();
//!
//! let mut out = Vec::new();
//! decode(&store, &mut out, &root).unwrap();
//! assert_eq!(out, b"fetch me");
//! ```

pub mod error;
mod sink;

use std::io::{self, Write};

use bytes::Bytes;

use crate::block::open_block;
use crate::capability::{BlockSize, ReadCapability};
use crate::crypto::ref_hash;
use crate::error::Result;
use crate::reference::{Key, RefKeyPair, Reference};
use error::DecodeError;
use sink::PaddingSink;

/// Fetches encrypted blocks by reference
///
/// The contract is to return the exact ciphertext previously emitted under
/// the reference; the decoder re-verifies every block it receives, so a
/// misbehaving implementation is detected, not believed. Stateful oracles
/// (caches, network fetchers) take `&self` and use interior mutability.
pub trait BlockStorage {
    /// Return the ciphertext stored under `reference`.
    fn get(&self, reference: &Reference) -> io::Result<Bytes>;
}

/// Streams the decrypted content of `root` into `writer`.
///
/// Stops at the first block that cannot be fetched, fails verification, or
/// unpads incorrectly; nothing more reaches the writer after an error.
pub fn decode<S, W>(storage: &S, writer: &mut W, root: &ReadCapability) -> Result<()>
where
    S: BlockStorage + ?Sized,
    W: Write + ?Sized,
{
    let mut sink = PaddingSink::new(writer, root.block_size());
    decode_level(
        storage,
        &mut sink,
        root.level(),
        &root.reference(),
        &root.key(),
        root.block_size(),
    )?;
    sink.finish()
}

fn decode_level<S, W>(
    storage: &S,
    sink: &mut PaddingSink<'_, W>,
    level: u8,
    reference: &Reference,
    key: &Key,
    size: BlockSize,
) -> Result<()>
where
    S: BlockStorage + ?Sized,
    W: Write + ?Sized,
{
    let block = fetch_verified(storage, reference, size)?;
    let mut plain = block.to_vec();
    open_block(&mut plain, key);

    if level == 0 {
        return sink.write_block(&plain);
    }
    for slot in plain.chunks_exact(RefKeyPair::SIZE) {
        let pair = RefKeyPair::try_from(slot)?;
        if pair.is_zero() {
            // The zero sentinel: no further children in this node.
            break;
        }
        decode_level(storage, sink, level - 1, &pair.reference, &pair.key, size)?;
    }
    Ok(())
}

/// Fetches one block and proves it matches the requested reference.
fn fetch_verified<S>(storage: &S, reference: &Reference, size: BlockSize) -> Result<Bytes>
where
    S: BlockStorage + ?Sized,
{
    let block = storage.get(reference)?;
    if block.len() != size.bytes() {
        return Err(DecodeError::BlockLength {
            expected: size.bytes(),
            actual: block.len(),
        }
        .into());
    }
    let actual = ref_hash(&block);
    if actual != *reference {
        return Err(DecodeError::ReferenceMismatch {
            expected: *reference,
            actual,
        }
        .into());
    }
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::seal_block;
    use crate::encode::encode_1kib;
    use crate::padding::PaddingError;
    use crate::storage::MemoryStore;
    use crate::ErisError;
    use std::io::Cursor;

    fn roundtrip(content: &[u8]) -> Vec<u8> {
        let mut store = MemoryStore::new();
        let root = encode_1kib(&mut Cursor::new(content), &mut store, b"").unwrap();
        let mut out = Vec::new();
        decode(&store, &mut out, &root).unwrap();
        out
    }

    #[test]
    fn test_roundtrip_boundaries() {
        for len in [0usize, 1, 10, 1023, 1024, 1025, 15 * 1024, 16 * 1024, 16 * 1024 + 1] {
            let content: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            assert_eq!(roundtrip(&content), content, "length {len}");
        }
    }

    #[test]
    fn test_corrupt_root_fails_before_any_output() {
        let content = vec![0x11u8; 2048];
        let mut store = MemoryStore::new();
        let root = encode_1kib(&mut Cursor::new(&content), &mut store, b"").unwrap();

        // Flip one byte of the root block, keyed under its old reference.
        let victim = root.reference();
        let mut bytes = store.block(&victim).unwrap().to_vec();
        bytes[100] ^= 0xff;
        store.put(victim, bytes);

        let mut out = Vec::new();
        let result = decode(&store, &mut out, &root);
        assert!(matches!(
            result,
            Err(ErisError::Decode(DecodeError::ReferenceMismatch { .. }))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_any_corrupt_block_fails_decode() {
        let content = vec![0x11u8; 2048];
        let mut pristine = MemoryStore::new();
        let root = encode_1kib(&mut Cursor::new(&content), &mut pristine, b"").unwrap();

        // Whichever block is damaged, decoding stops with an integrity
        // error; whatever reached the writer first is a clean prefix.
        let victims: Vec<_> = pristine.references().copied().collect();
        for victim in victims {
            let mut store = pristine.clone();
            let mut bytes = store.block(&victim).unwrap().to_vec();
            bytes[0] ^= 0xff;
            store.put(victim, bytes);

            let mut out = Vec::new();
            let result = decode(&store, &mut out, &root);
            assert!(matches!(
                result,
                Err(ErisError::Decode(DecodeError::ReferenceMismatch { .. }))
            ));
            assert!(out.len() <= content.len());
            assert_eq!(out, content[..out.len()]);
        }
    }

    #[test]
    fn test_short_block_fails_length_check() {
        let mut store = MemoryStore::new();
        let reference = Reference::new([9u8; 32]);
        store.put(reference, vec![0u8; 100]);

        let root = ReadCapability::new(
            BlockSize::Size1KiB,
            0,
            RefKeyPair::new(reference, Key::new([0u8; 32])),
        )
        .unwrap();

        let mut out = Vec::new();
        let result = decode(&store, &mut out, &root);
        assert!(matches!(
            result,
            Err(ErisError::Decode(DecodeError::BlockLength {
                expected: 1024,
                actual: 100
            }))
        ));
    }

    #[test]
    fn test_missing_block_is_an_io_error() {
        let store = MemoryStore::new();
        let root = ReadCapability::new(
            BlockSize::Size1KiB,
            0,
            RefKeyPair::new(Reference::new([1u8; 32]), Key::new([2u8; 32])),
        )
        .unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            decode(&store, &mut out, &root),
            Err(ErisError::Io(_))
        ));
    }

    #[test]
    fn test_unpadded_final_block_is_rejected() {
        // A block that is all zeros decrypts fine but carries no marker.
        let mut block = vec![0u8; 1024];
        let pair = seal_block(&mut block, b"").unwrap();

        let mut store = MemoryStore::new();
        store.put(pair.reference, block);
        let root = ReadCapability::new(BlockSize::Size1KiB, 0, pair).unwrap();

        let mut out = Vec::new();
        let result = decode(&store, &mut out, &root);
        assert!(matches!(
            result,
            Err(ErisError::Decode(DecodeError::Padding(
                PaddingError::MissingMarker
            )))
        ));
    }

    #[test]
    fn test_trailing_garbage_in_padding_is_rejected() {
        let mut block = vec![0u8; 1024];
        block[0] = 0x80;
        block[1023] = 0x01;
        let pair = seal_block(&mut block, b"").unwrap();

        let mut store = MemoryStore::new();
        store.put(pair.reference, block);
        let root = ReadCapability::new(BlockSize::Size1KiB, 0, pair).unwrap();

        let mut out = Vec::new();
        let result = decode(&store, &mut out, &root);
        assert!(matches!(
            result,
            Err(ErisError::Decode(DecodeError::Padding(
                PaddingError::UnexpectedByte { byte: 0x01, .. }
            )))
        ));
    }

    #[test]
    fn test_decode_with_secret() {
        let content = vec![0x77u8; 3000];
        let secret = [5u8; 32];
        let mut store = MemoryStore::new();
        let root = encode_1kib(&mut Cursor::new(&content), &mut store, &secret).unwrap();

        // The secret scopes key derivation at encode time only; the
        // capability alone decodes.
        let mut out = Vec::new();
        decode(&store, &mut out, &root).unwrap();
        assert_eq!(out, content);
    }
}
