//! Streaming encoder and decoder for ERIS (Encoding for Robust Immutable
//! Storage).
//!
//! ERIS turns an arbitrary byte stream into a set of fixed-size encrypted
//! blocks arranged as a balanced tree, addressed by the hash of their
//! ciphertext. Anyone holding the compact root [`ReadCapability`] can fetch
//! the blocks from an untrusted store, verify each one against its address,
//! and reconstruct the original stream. Encryption is convergent: the same
//! content under the same convergence secret always produces the same
//! blocks, so identical data deduplicates.
//!
//! ## Key Components
//!
//! - **Encoding**: single-pass streaming tree construction ([`encode`],
//!   [`encode_1kib`], [`encode_32kib`]) emitting blocks to a [`BlockSink`]
//! - **Decoding**: verifying depth-first traversal ([`decode`]) fetching
//!   blocks from a [`BlockStorage`] oracle
//! - **ReadCapability**: the 66-byte record (and its `urn:erisx2:` textual
//!   form) sufficient to decode an entire stream
//!
//! ## Usage Examples
//!
//! ```
//! use eris_codec::{decode, encode_1kib, MemoryStore};
//! use std::io::Cursor;
//!
//! // Encode a stream into an in-memory block store.
//! let mut store = MemoryStore::new();
//! let root = encode_1kib(&mut Cursor::new(b"Hail ERIS!"), &mut store, b"").unwrap();
//!
//! // The capability round-trips through its URN form.
//! let urn = root.urn();
//! assert!(urn.starts_with("urn:erisx2:"));
//! assert_eq!(urn.parse::<eris_codec::ReadCapability>().unwrap(), root);
//!
//! // Decode it back, re-verifying every block against its address.
//! let mut out = Vec::new();
//! decode(&store, &mut out, &root).unwrap();
//! assert_eq!(out, b"Hail ERIS!");
//! ```

// Re-export dependencies that are part of our public API
pub use bytes;

mod block;
pub mod capability;
pub mod crypto;
pub mod decode;
pub mod encode;
pub mod error;
pub mod padding;
pub mod reference;
pub mod storage;

// Re-export core types
pub use capability::{BlockSize, ReadCapability, URN_PREFIX};
pub use error::{ErisError, Result};
pub use reference::{Key, RefKeyPair, Reference};

// Core codec entry points
pub use decode::{decode, BlockStorage};
pub use encode::{encode, encode_1kib, encode_32kib, BlockSink, SinkFn};

// Block storage for tests, examples, and small tools
pub use storage::MemoryStore;
