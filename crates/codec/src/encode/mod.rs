//! Streaming encoder
//!
//! Encoding reads the input once, front to back, splitting it into
//! fixed-size content blocks. Each block is sealed (key-hashed, encrypted,
//! reference-hashed) and emitted to the caller's [`BlockSink`] the moment it
//! is complete; its reference-key pair feeds the bottom-up tree
//! construction one level up. Blocks therefore leave the encoder in
//! strict left-to-right, bottom-up order: all descendants of a node are
//! emitted before the node itself, and the root block comes last.
//!
//! ## Example Usage
//!
//! ```
//! use eris_codec::{encode, BlockSize, MemoryStore};
//! use std::io::Cursor;
//!
//! let mut store = MemoryStore::new();
//! let root = encode(
//!     &mut Cursor::new(vec![0u8; 4096]),
//!     &mut store,
//!     b"",
//!     BlockSize::Size1KiB,
//! )
//! .unwrap();
//!
//! assert_eq!(root.level(), 1);
//! assert!(store.contains(&root.reference()));
//! ```

mod accumulator;
pub mod error;

use std::io::{self, Read};

use crate::block::seal_block;
use crate::capability::{BlockSize, ReadCapability};
use crate::error::Result;
use crate::padding::pad;
use crate::reference::{Key, RefKeyPair, Reference};
use accumulator::LevelAccumulator;

/// Receives every encrypted block as encoding produces it
///
/// `emit` is called exactly once per produced block, ciphertext alongside
/// its reference and read key; callers may deduplicate by reference. An
/// error terminates the encoding and no further calls are made.
pub trait BlockSink {
    /// Accept one sealed block.
    fn emit(&mut self, block: &[u8], reference: &Reference, key: &Key) -> io::Result<()>;
}

/// Adapts a closure into a [`BlockSink`]
///
/// ```
/// use eris_codec::{encode_1kib, SinkFn};
/// use std::io::Cursor;
///
/// let mut count = 0usize;
/// let mut sink = SinkFn::new(|_block, _reference, _key| {
///     count += 1;
///     Ok(())
/// });
/// encode_1kib(&mut Cursor::new(b"counted"), &mut sink, b"").unwrap();
/// assert_eq!(count, 1);
/// ```
pub struct SinkFn<F>(F);

impl<F> SinkFn<F>
where
    F: FnMut(&[u8], &Reference, &Key) -> io::Result<()>,
{
    /// Wraps `f` so it can serve as an emit callback.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> BlockSink for SinkFn<F>
where
    F: FnMut(&[u8], &Reference, &Key) -> io::Result<()>,
{
    fn emit(&mut self, block: &[u8], reference: &Reference, key: &Key) -> io::Result<()> {
        (self.0)(block, reference, key)
    }
}

/// Encodes `reader` into 1 KiB blocks.
///
/// See [`encode`].
pub fn encode_1kib<R, S>(reader: &mut R, sink: &mut S, secret: &[u8]) -> Result<ReadCapability>
where
    R: Read + ?Sized,
    S: BlockSink + ?Sized,
{
    encode(reader, sink, secret, BlockSize::Size1KiB)
}

/// Encodes `reader` into 32 KiB blocks.
///
/// See [`encode`].
pub fn encode_32kib<R, S>(reader: &mut R, sink: &mut S, secret: &[u8]) -> Result<ReadCapability>
where
    R: Read + ?Sized,
    S: BlockSink + ?Sized,
{
    encode(reader, sink, secret, BlockSize::Size32KiB)
}

/// Encodes the byte stream from `reader`, emitting every sealed block to
/// `sink` and returning the root read capability.
///
/// Runs in a single pass over the input with one working buffer plus one
/// node buffer per tree level, so memory stays logarithmic in the input
/// length. The encoding is deterministic: the same input, block size, and
/// convergence secret always yield the same blocks and the same root. An
/// empty secret leaves the content key unscoped, so anyone can deduplicate
/// it; a non-empty secret (at most 64 bytes) confines deduplication to
/// holders of the secret.
pub fn encode<R, S>(
    reader: &mut R,
    sink: &mut S,
    secret: &[u8],
    size: BlockSize,
) -> Result<ReadCapability>
where
    R: Read + ?Sized,
    S: BlockSink + ?Sized,
{
    let mut levels = LevelAccumulator::new(size, 1);
    let mut buf = vec![0u8; size.bytes()];
    loop {
        let n = read_full(reader, &mut buf)?;
        if n == buf.len() {
            let pair = emit_sealed(&mut buf, secret, sink)?;
            levels.push(&pair, secret, sink)?;
            continue;
        }
        // Terminal block. Everything past the content is overwritten with
        // fresh padding; an input that ended exactly on a block boundary
        // gets a whole block of it.
        pad(&mut buf[n..]);
        let pair = emit_sealed(&mut buf, secret, sink)?;
        levels.push(&pair, secret, sink)?;
        return levels.flush(secret, sink);
    }
}

/// Seals `block` in place and hands the ciphertext to the sink.
pub(crate) fn emit_sealed<S>(block: &mut [u8], secret: &[u8], sink: &mut S) -> Result<RefKeyPair>
where
    S: BlockSink + ?Sized,
{
    let pair = seal_block(block, secret)?;
    sink.emit(block, &pair.reference, &pair.key)?;
    Ok(pair)
}

/// Reads until `buf` is full or the reader reports end of stream.
fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
