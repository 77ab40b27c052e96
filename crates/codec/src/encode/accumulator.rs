//! Bottom-up tree construction
//!
//! A [`LevelAccumulator`] gathers the reference-key pairs produced at one
//! tree level. When a node's worth of pairs has accumulated, the buffer is
//! sealed and emitted as a block of its own, and the resulting pair is
//! handed to the accumulator one level up, created the first time it is
//! needed. The chain of accumulators therefore grows with the logarithm of
//! the input while encoding runs in a single pass.

use super::error::EncodeError;
use super::{emit_sealed, BlockSink};
use crate::capability::{BlockSize, ReadCapability};
use crate::error::Result;
use crate::reference::RefKeyPair;

pub(crate) struct LevelAccumulator {
    size: BlockSize,
    level: usize,
    /// One node's worth of pairs, zero-filled past the cursor
    buf: Vec<u8>,
    n: usize,
    parent: Option<Box<LevelAccumulator>>,
}

impl LevelAccumulator {
    pub(crate) fn new(size: BlockSize, level: usize) -> Self {
        Self {
            size,
            level,
            buf: vec![0u8; size.bytes()],
            n: 0,
            parent: None,
        }
    }

    /// Appends one pair, first sealing a finished node into the level above.
    pub(crate) fn push<S>(
        &mut self,
        pair: &RefKeyPair,
        secret: &[u8],
        sink: &mut S,
    ) -> Result<()>
    where
        S: BlockSink + ?Sized,
    {
        if self.n == self.buf.len() {
            let sealed = emit_sealed(&mut self.buf, secret, sink)?;
            let (size, level) = (self.size, self.level);
            let parent = self
                .parent
                .get_or_insert_with(|| Box::new(Self::new(size, level + 1)));
            parent.push(&sealed, secret, sink)?;
            self.reset();
        }
        if self.n + RefKeyPair::SIZE > self.buf.len() {
            return Err(EncodeError::BufferOverflow {
                capacity: self.buf.len(),
                len: self.n + RefKeyPair::SIZE,
            }
            .into());
        }
        pair.write_to(&mut self.buf[self.n..self.n + RefKeyPair::SIZE]);
        self.n += RefKeyPair::SIZE;
        Ok(())
    }

    /// Clears the cursor and the whole buffer.
    ///
    /// The zero fill is what keeps the unused tail of a partially filled
    /// final node at the all-zero sentinel; stale pairs there would change
    /// the node's reference.
    fn reset(&mut self) {
        self.buf.fill(0);
        self.n = 0;
    }

    /// Consumes the chain, sealing every partially filled level upward, and
    /// returns the root capability.
    pub(crate) fn flush<S>(mut self, secret: &[u8], sink: &mut S) -> Result<ReadCapability>
    where
        S: BlockSink + ?Sized,
    {
        if self.n == 0 {
            return Err(EncodeError::EmptyLevelBuffer.into());
        }
        match self.parent.take() {
            None => {
                if self.n == RefKeyPair::SIZE {
                    // A single pair needs no node above it: it is the root
                    // itself, one level down.
                    let root = RefKeyPair::try_from(&self.buf[..RefKeyPair::SIZE])?;
                    return Ok(ReadCapability::new(self.size, self.level - 1, root)?);
                }
                let root = emit_sealed(&mut self.buf, secret, sink)?;
                Ok(ReadCapability::new(self.size, self.level, root)?)
            }
            Some(mut parent) => {
                let sealed = emit_sealed(&mut self.buf, secret, sink)?;
                parent.push(&sealed, secret, sink)?;
                parent.flush(secret, sink)
            }
        }
    }
}
