//! AEAD-based sealing of file payloads.

use crate::errors::{CryptoError, Result};
use crate::payload::PlainPayload;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use hkdf::Hkdf;
use rand_core::{OsRng, RngCore};
use sha2::Sha256;

/// Sealing/opening of individual file payloads under an owner key string.
///
/// A matching key pair is whatever the implementation defines: the
/// shipped [`SealedBoxCipher`] derives the same AEAD key from the same
/// string on both sides, while an asymmetric implementation can accept a
/// public key for `seal` and the corresponding private key for `open`
/// behind this same seam. Key generation and distribution policy lives
/// with the caller.
pub trait FileCipher: Send + Sync {
    /// Seal a payload under the given key. Output is opaque ciphertext.
    fn seal(&self, key: &str, payload: &PlainPayload) -> Result<Vec<u8>>;

    /// Open a sealed payload, recovering content and the embedded name.
    fn open(&self, key: &str, sealed: &[u8]) -> Result<PlainPayload>;
}

const NONCE_LEN: usize = 12;
const KEY_CONTEXT: &[u8] = b"anchorfs.file-key.v1";

/// The shipped cipher: AES-256-GCM under an HKDF-SHA256 derived key.
///
/// Layout of a sealed payload: `nonce (12 bytes) || ciphertext`. The
/// plaintext inside is the bincode framing of [`PlainPayload`], so every
/// byte value round-trips exactly, including values outside printable
/// ASCII.
#[derive(Debug, Default, Clone, Copy)]
pub struct SealedBoxCipher;

impl SealedBoxCipher {
    pub fn new() -> Self {
        Self
    }

    fn derive_key(key: &str) -> Result<[u8; 32]> {
        let hk = Hkdf::<Sha256>::new(None, key.as_bytes());
        let mut okm = [0u8; 32];
        hk.expand(KEY_CONTEXT, &mut okm)
            .map_err(|_| CryptoError::KeyDerivation)?;
        Ok(okm)
    }
}

impl FileCipher for SealedBoxCipher {
    fn seal(&self, key: &str, payload: &PlainPayload) -> Result<Vec<u8>> {
        let key_bytes = Self::derive_key(key)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));

        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let framed = bincode::serialize(payload)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), framed.as_slice())
            .map_err(|_| CryptoError::SealFailed)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn open(&self, key: &str, sealed: &[u8]) -> Result<PlainPayload> {
        if sealed.len() < NONCE_LEN {
            return Err(CryptoError::Malformed("shorter than the nonce"));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);

        let key_bytes = Self::derive_key(key)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key_bytes));

        let framed = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::OpenFailed)?;

        Ok(bincode::deserialize(&framed)?)
    }
}

/// Generate a fresh random owner key, hex-encoded.
pub fn generate_key() -> String {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    hex::encode(key)
}
