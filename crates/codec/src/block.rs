//! Single-block sealing and opening

use crate::crypto::{key_hash, keystream_xor, ref_hash};
use crate::error::Result;
use crate::reference::{Key, RefKeyPair};

/// Encrypt `block` in place, returning the pair that names and unlocks it.
///
/// The read key is the hash of the plaintext under the convergence secret;
/// the reference is the hash of the resulting ciphertext.
pub(crate) fn seal_block(block: &mut [u8], secret: &[u8]) -> Result<RefKeyPair> {
    let key = key_hash(block, secret)?;
    keystream_xor(&key, block);
    let reference = ref_hash(block);
    Ok(RefKeyPair::new(reference, key))
}

/// Decrypt `block` in place.
///
/// The caller has already verified the ciphertext against its reference.
pub(crate) fn open_block(block: &mut [u8], key: &Key) {
    keystream_xor(key, block);
}
