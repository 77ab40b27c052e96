//! In-memory block storage
//!
//! [`MemoryStore`] implements both sides of the codec's storage contract:
//! it collects blocks as a [`BlockSink`] during encoding and serves them
//! back as a [`BlockStorage`] oracle during decoding. Useful for tests,
//! examples, and small tools; a production substrate would put the same two
//! traits in front of a disk or network store.

use std::collections::HashMap;
use std::io;

use bytes::Bytes;

use crate::decode::BlockStorage;
use crate::encode::BlockSink;
use crate::reference::{Key, Reference};

/// A `HashMap`-backed block store
///
/// Blocks are keyed by reference, so emitting identical content twice
/// keeps a single copy: convergent encodings deduplicate for free.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blocks: HashMap<Reference, Bytes>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Checks whether the store holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Checks whether a block is stored under `reference`.
    pub fn contains(&self, reference: &Reference) -> bool {
        self.blocks.contains_key(reference)
    }

    /// Stores `block` under `reference` without inspecting it.
    ///
    /// Nothing is verified here: blocks fetched from untrusted transport
    /// can be loaded as-is, since the decoder re-checks every block it
    /// reads against its reference.
    pub fn put(&mut self, reference: Reference, block: impl Into<Bytes>) {
        self.blocks.insert(reference, block.into());
    }

    /// Ciphertext stored under `reference`, if any
    pub fn block(&self, reference: &Reference) -> Option<&Bytes> {
        self.blocks.get(reference)
    }

    /// Iterates over the stored references.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.blocks.keys()
    }
}

impl BlockSink for MemoryStore {
    fn emit(&mut self, block: &[u8], reference: &Reference, _key: &Key) -> io::Result<()> {
        self.blocks
            .entry(*reference)
            .or_insert_with(|| Bytes::copy_from_slice(block));
        Ok(())
    }
}

impl BlockStorage for MemoryStore {
    fn get(&self, reference: &Reference) -> io::Result<Bytes> {
        self.blocks.get(reference).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no block stored for reference {reference}"),
            )
        })
    }
}
