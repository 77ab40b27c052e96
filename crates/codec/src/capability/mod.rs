//! Read capabilities and their URN form
//!
//! A [`ReadCapability`] is everything needed to reconstruct a stream: the
//! block size, the root level, and the root block's reference-key pair. Its
//! binary form is exactly 66 bytes; its textual form is `urn:erisx2:`
//! followed by the unpadded base32 encoding of those bytes.
//!
//! ## Example Usage
//!
//! ```
//! use eris_codec::{BlockSize, ReadCapability};
//!
//! let cap = ReadCapability::new(
//!     BlockSize::Size1KiB,
//!     0,
//!     eris_codec::RefKeyPair::default(),
//! )
//! .unwrap();
//!
//! // URN and binary forms both round-trip.
//! let parsed: ReadCapability = cap.urn().parse().unwrap();
//! assert_eq!(parsed, cap);
//! assert_eq!(ReadCapability::from_bytes(&cap.to_bytes()).unwrap(), cap);
//! ```

pub mod error;

use std::fmt;
use std::str::FromStr;

use base32::Alphabet;

use crate::error::Result;
use crate::reference::{Key, RefKeyPair, Reference};
use error::CapabilityError;

const URN_ALPHABET: Alphabet = Alphabet::RFC4648 { padding: false };

/// Prefix of every ERIS read-capability URN
pub const URN_PREFIX: &str = "urn:erisx2:";

/// The two admissible block sizes
///
/// Every block of a single encoding shares one size. Small content fits
/// 1 KiB blocks with little padding waste; bulk data amortizes better over
/// 32 KiB blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockSize {
    /// 1 KiB blocks
    Size1KiB,
    /// 32 KiB blocks
    Size32KiB,
}

impl BlockSize {
    /// Width of one block in bytes
    pub const fn bytes(self) -> usize {
        match self {
            Self::Size1KiB => 1024,
            Self::Size32KiB => 32 * 1024,
        }
    }

    /// Number of reference-key pairs held by one inner node
    pub const fn arity(self) -> usize {
        self.bytes() / RefKeyPair::SIZE
    }

    /// One-byte tag used in the serialized capability
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Size1KiB => 0x00,
            Self::Size32KiB => 0x01,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> std::result::Result<Self, CapabilityError> {
        match tag {
            0x00 => Ok(Self::Size1KiB),
            0x01 => Ok(Self::Size32KiB),
            other => Err(CapabilityError::UnknownBlockSizeTag(other)),
        }
    }
}

impl TryFrom<usize> for BlockSize {
    type Error = CapabilityError;

    fn try_from(bytes: usize) -> std::result::Result<Self, CapabilityError> {
        match bytes {
            1024 => Ok(Self::Size1KiB),
            32768 => Ok(Self::Size32KiB),
            other => Err(CapabilityError::UnsupportedBlockSize(other)),
        }
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size1KiB => write!(f, "1KiB"),
            Self::Size32KiB => write!(f, "32KiB"),
        }
    }
}

/// The compact root record sufficient to decode an entire stream
///
/// Level 0 means the root references a content block directly; level n > 0
/// means it references an inner node whose children sit at level n − 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadCapability {
    block_size: BlockSize,
    level: u8,
    root: RefKeyPair,
}

impl ReadCapability {
    /// Width of the serialized capability: tag, level, reference, key
    pub const BINARY_SIZE: usize = 2 + RefKeyPair::SIZE;

    /// Creates a capability, rejecting levels that do not fit one byte.
    pub fn new(
        block_size: BlockSize,
        level: usize,
        root: RefKeyPair,
    ) -> std::result::Result<Self, CapabilityError> {
        let level =
            u8::try_from(level).map_err(|_| CapabilityError::LevelOverflow { level })?;
        Ok(Self {
            block_size,
            level,
            root,
        })
    }

    /// Block size shared by every block of the encoding
    pub fn block_size(&self) -> BlockSize {
        self.block_size
    }

    /// Distance of the root block from the content blocks
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Content address of the root block
    pub fn reference(&self) -> Reference {
        self.root.reference
    }

    /// Key that decrypts the root block
    pub fn key(&self) -> Key {
        self.root.key
    }

    /// The root reference-key pair
    pub fn root(&self) -> RefKeyPair {
        self.root
    }

    /// Serializes the capability into its 66-byte binary layout.
    pub fn to_bytes(&self) -> [u8; 66] {
        let mut bytes = [0u8; Self::BINARY_SIZE];
        bytes[0] = self.block_size.tag();
        bytes[1] = self.level;
        self.root.write_to(&mut bytes[2..]);
        bytes
    }

    /// Parses a capability from its 66-byte binary layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::BINARY_SIZE {
            return Err(CapabilityError::InvalidLength {
                expected: Self::BINARY_SIZE,
                actual: bytes.len(),
            }
            .into());
        }
        let block_size = BlockSize::from_tag(bytes[0])?;
        let root = RefKeyPair::try_from(&bytes[2..])?;
        Ok(Self {
            block_size,
            level: bytes[1],
            root,
        })
    }

    /// Renders the `urn:erisx2:` textual form.
    pub fn urn(&self) -> String {
        let mut urn = String::with_capacity(URN_PREFIX.len() + 106);
        urn.push_str(URN_PREFIX);
        urn.push_str(&base32::encode(URN_ALPHABET, &self.to_bytes()));
        urn
    }

    /// Parses the `urn:erisx2:` textual form.
    pub fn from_urn(urn: &str) -> Result<Self> {
        let payload = urn
            .strip_prefix(URN_PREFIX)
            .ok_or(CapabilityError::MissingUrnPrefix)?;
        let bytes =
            base32::decode(URN_ALPHABET, payload).ok_or(CapabilityError::MalformedBase32)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for ReadCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.urn())
    }
}

impl FromStr for ReadCapability {
    type Err = crate::error::ErisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_urn(s)
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for BlockSize {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(if u.arbitrary()? {
            Self::Size1KiB
        } else {
            Self::Size32KiB
        })
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for ReadCapability {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self {
            block_size: u.arbitrary()?,
            level: u.arbitrary()?,
            root: u.arbitrary()?,
        })
    }
}
