//! ISO/IEC 7816-4 padding for the final content block

use thiserror::Error;

/// Errors from stripping the final content block's padding
#[derive(Error, Debug)]
pub enum PaddingError {
    /// No `0x80` marker anywhere in the block
    #[error("final content block has no 0x80 padding marker")]
    MissingMarker,

    /// A non-zero byte where only zeros may trail the marker
    #[error("unexpected byte {byte:#04x} at offset {offset} in block padding")]
    UnexpectedByte { byte: u8, offset: usize },
}

/// Fill `tail` with the padding marker followed by zeros.
pub(crate) fn pad(tail: &mut [u8]) {
    if let Some((marker, zeros)) = tail.split_first_mut() {
        *marker = 0x80;
        zeros.fill(0);
    }
}

/// Strip the padding from `block`, returning the content prefix.
///
/// Scans backward: trailing zeros are dropped, the first non-zero byte must
/// be the `0x80` marker.
pub(crate) fn unpad(block: &[u8]) -> Result<&[u8], PaddingError> {
    for (offset, byte) in block.iter().enumerate().rev() {
        match *byte {
            0x80 => return Ok(&block[..offset]),
            0x00 => continue,
            byte => return Err(PaddingError::UnexpectedByte { byte, offset }),
        }
    }
    Err(PaddingError::MissingMarker)
}
