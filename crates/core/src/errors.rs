use thiserror::Error;

/// Everything the engine, the validator and the record stores can fail with.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Aggregation ─────────────────────────────────────────────────
    #[error("Malformed record at index {index}: missing `{field}`")]
    MalformedRecord { index: usize, field: &'static str },

    #[error("No records found for listed asset: {0}")]
    EmptyAssetGroup(String),

    // ── Inserts ─────────────────────────────────────────────────────
    #[error("Record validation failed: {0}")]
    ValidationError(String),

    // ── Record files ────────────────────────────────────────────────
    #[error("Not a valid records file: {0}")]
    InvalidFileFormat(String),

    #[error("Records file version {0} is not supported")]
    UnsupportedVersion(u16),

    #[error("Could not encrypt records: {0}")]
    Encryption(String),

    #[error("Could not decrypt records: wrong password or corrupted file")]
    Decryption,

    #[error("Could not encode records: {0}")]
    Serialization(String),

    #[error("Could not decode records: {0}")]
    Deserialization(String),

    #[error("Record store error: {0}")]
    Storage(String),

    #[error("Records file I/O failed: {0}")]
    FileIO(String),
}

impl CoreError {
    /// `true` when the failure was caused by the data a client sent,
    /// `false` when it is a server-side fault (broken invariant, storage).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::MalformedRecord { .. } | CoreError::ValidationError(_)
        )
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}
