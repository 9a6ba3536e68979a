use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::record::{InvestmentRecord, StoredRecord};

use super::encryption::{KdfParams, RecordCipher};
use super::format::{self, FileHeader, CURRENT_VERSION};
use super::traits::RecordStore;

/// Encrypt records into the INVR file format.
///
/// Flow: records → JSON → AES-256-GCM(cipher) → INVR bytes
pub fn seal_records(records: &[StoredRecord], cipher: &RecordCipher) -> Result<Vec<u8>, CoreError> {
    let plaintext = serde_json::to_vec(records)
        .map_err(|e| CoreError::Serialization(e.to_string()))?;
    let (nonce, ciphertext) = cipher.seal(&plaintext)?;

    let header = FileHeader {
        version: CURRENT_VERSION,
        kdf_params: *cipher.kdf_params(),
        salt: *cipher.salt(),
        nonce,
    };
    Ok(format::encode(&header, &ciphertext))
}

/// Decrypt INVR bytes back into records.
///
/// Flow: INVR bytes → parse header → Argon2id(password, salt) → AES-256-GCM
/// decrypt → JSON → records. The derived cipher is returned so the caller can
/// keep saving under the same key.
pub fn open_records(data: &[u8], password: &str) -> Result<(Vec<StoredRecord>, RecordCipher), CoreError> {
    let (header, ciphertext) = format::decode(data)?;
    let cipher = RecordCipher::derive(password, header.salt, header.kdf_params)?;
    let plaintext = cipher.open(&header.nonce, ciphertext)?;
    let records = serde_json::from_slice(&plaintext)
        .map_err(|e| CoreError::Deserialization(e.to_string()))?;
    Ok((records, cipher))
}

/// Record store persisted to a password-encrypted file.
///
/// All records are held in memory; every insert rewrites the whole file.
/// The file is written to a sibling temp path first and renamed into place.
///
/// Inserts are serialized and do their file I/O synchronously on the calling
/// task, sized for a single user's record volume. Reads only take the
/// in-memory lock, which is never held across a write to disk.
pub struct EncryptedFileStore {
    path: PathBuf,
    cipher: RecordCipher,
    records: RwLock<Vec<StoredRecord>>,
    writer: Mutex<()>,
}

impl std::fmt::Debug for EncryptedFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileStore")
            .field("path", &self.path)
            .field("records", &self.records.read().map(|r| r.len()).unwrap_or(0))
            .finish()
    }
}

impl EncryptedFileStore {
    /// Open `path`, or start an empty store there if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>, password: &str) -> Result<Self, CoreError> {
        Self::open_with_params(path, password, KdfParams::default())
    }

    /// Like [`open`](Self::open); `kdf_params` apply only when a new file is
    /// started (existing files carry their own).
    pub fn open_with_params(
        path: impl AsRef<Path>,
        password: &str,
        kdf_params: KdfParams,
    ) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();

        let (records, cipher) = if path.exists() {
            let bytes = std::fs::read(&path)?;
            open_records(&bytes, password)?
        } else {
            (Vec::new(), RecordCipher::generate(password, kdf_params)?)
        };

        Ok(Self {
            path,
            cipher,
            records: RwLock::new(records),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[StoredRecord]) -> Result<(), CoreError> {
        let bytes = seal_records(records, &self.cipher)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn poisoned<T>(_: PoisonError<T>) -> CoreError {
    CoreError::Storage("file store lock poisoned".into())
}

#[async_trait]
impl RecordStore for EncryptedFileStore {
    fn name(&self) -> &str {
        "encrypted-file"
    }

    async fn find_all(&self) -> Result<Vec<StoredRecord>, CoreError> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    async fn find_by_asset(&self, asset: &str) -> Result<Vec<StoredRecord>, CoreError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .iter()
            .filter(|r| r.record.asset.as_deref() == Some(asset))
            .cloned()
            .collect())
    }

    async fn insert(&self, record: InvestmentRecord) -> Result<StoredRecord, CoreError> {
        let stored = StoredRecord::new(record);
        let _writer = self.writer.lock().map_err(poisoned)?;

        let mut next = self.records.read().map_err(poisoned)?.clone();
        next.push(stored.clone());
        // Memory only changes once the file holds the new record.
        self.persist(&next)?;
        *self.records.write().map_err(poisoned)? = next;
        Ok(stored)
    }
}
