use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::CoreError;

/// Argon2id parameters for key derivation.
/// Stored in the file header so they can be upgraded in future versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65536 = 64 MB)
    pub memory_cost: u32,
    /// Number of iterations (default: 3)
    pub time_cost: u32,
    /// Degree of parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 65_536, // 64 MB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// AES-256-GCM sealing key bound to the salt and KDF parameters it was
/// derived with.
///
/// Deriving is the expensive step, so a store derives once when it opens its
/// file and reuses the key for every later save (each with a fresh nonce).
pub struct RecordCipher {
    key: [u8; 32],
    salt: [u8; 16],
    kdf_params: KdfParams,
}

impl std::fmt::Debug for RecordCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCipher")
            .field("kdf_params", &self.kdf_params)
            .finish_non_exhaustive()
    }
}

impl RecordCipher {
    /// Derive the key for `password` with Argon2id over `salt`.
    pub fn derive(password: &str, salt: [u8; 16], kdf_params: KdfParams) -> Result<Self, CoreError> {
        let params = Params::new(
            kdf_params.memory_cost,
            kdf_params.time_cost,
            kdf_params.parallelism,
            Some(32),
        )
        .map_err(|e| CoreError::Encryption(format!("Invalid Argon2 params: {e}")))?;

        let mut key = [0u8; 32];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password_into(password.as_bytes(), &salt, &mut key)
            .map_err(|e| CoreError::Encryption(format!("Argon2 key derivation failed: {e}")))?;

        Ok(Self {
            key,
            salt,
            kdf_params,
        })
    }

    /// Derive a key over a freshly generated salt.
    pub fn generate(password: &str, kdf_params: KdfParams) -> Result<Self, CoreError> {
        Self::derive(password, random_bytes()?, kdf_params)
    }

    pub fn salt(&self) -> &[u8; 16] {
        &self.salt
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }

    /// Encrypt under a new random nonce. Returns `(nonce, ciphertext)`; the
    /// ciphertext carries the 16-byte authentication tag.
    pub fn seal(&self, plaintext: &[u8]) -> Result<([u8; 12], Vec<u8>), CoreError> {
        let nonce: [u8; 12] = random_bytes()?;
        let ciphertext = self
            .cipher()?
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CoreError::Encryption(format!("Encryption failed: {e}")))?;
        Ok((nonce, ciphertext))
    }

    /// Decrypt and verify. A wrong password or tampered data both surface
    /// as `CoreError::Decryption`.
    pub fn open(&self, nonce: &[u8; 12], ciphertext: &[u8]) -> Result<Vec<u8>, CoreError> {
        Ok(self
            .cipher()?
            .decrypt(Nonce::from_slice(nonce), ciphertext)?)
    }

    fn cipher(&self) -> Result<Aes256Gcm, CoreError> {
        Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))
    }
}

/// Cryptographically secure random bytes (salts, nonces).
pub fn random_bytes<const N: usize>() -> Result<[u8; N], CoreError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| CoreError::Encryption(format!("Failed to gather randomness: {e}")))?;
    Ok(buf)
}
