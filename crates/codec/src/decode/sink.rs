//! One-block look-ahead writer
//!
//! Every decoded content block except the last passes through verbatim;
//! the sink always holds one block back so that, at end of stream, the
//! buffered block is the one whose padding must be stripped.

use std::io::Write;

use super::error::DecodeError;
use crate::capability::BlockSize;
use crate::error::Result;
use crate::padding::unpad;

pub(crate) struct PaddingSink<'a, W: Write + ?Sized> {
    writer: &'a mut W,
    buf: Vec<u8>,
    buffered: bool,
}

impl<'a, W: Write + ?Sized> PaddingSink<'a, W> {
    pub(crate) fn new(writer: &'a mut W, size: BlockSize) -> Self {
        Self {
            writer,
            buf: vec![0u8; size.bytes()],
            buffered: false,
        }
    }

    /// Buffers `block`, first passing any previously held block through.
    pub(crate) fn write_block(&mut self, block: &[u8]) -> Result<()> {
        if block.len() != self.buf.len() {
            return Err(DecodeError::SinkBlockLength {
                expected: self.buf.len(),
                actual: block.len(),
            }
            .into());
        }
        if self.buffered {
            self.writer.write_all(&self.buf)?;
        }
        self.buf.copy_from_slice(block);
        self.buffered = true;
        Ok(())
    }

    /// Unpads the held block and writes what survives.
    ///
    /// Never having buffered a block leaves `buf` all zeros, which fails
    /// the marker scan exactly like a malformed final block.
    pub(crate) fn finish(self) -> Result<()> {
        let content = unpad(&self.buf).map_err(DecodeError::from)?;
        self.writer.write_all(content)?;
        Ok(())
    }
}
