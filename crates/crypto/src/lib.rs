//! Per-file payload sealing for AnchorFS.
//!
//! Every stored file is sealed individually for its owner before it
//! reaches the content store. The sealed payload carries the original
//! file name inside the ciphertext, so a decrypted file reconstructs its
//! own name without trusting the surrounding index entry.

pub mod cipher;
pub mod errors;
pub mod payload;

pub use cipher::{generate_key, FileCipher, SealedBoxCipher};
pub use errors::CryptoError;
pub use payload::PlainPayload;
