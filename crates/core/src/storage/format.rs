use crate::errors::CoreError;
use super::encryption::KdfParams;

/// Magic bytes identifying an INVR (investment records) file.
pub const MAGIC: &[u8; 4] = b"INVR";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// Header size in bytes:
/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8) = 54
pub const HEADER_SIZE: usize = 54;

/// Header of an encrypted records file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; 16],
    pub nonce: [u8; 12],
}

/// Serialize a header and its ciphertext.
///
/// Layout:
/// ```text
/// [INVR: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext: variable]
/// ```
pub fn encode(header: &FileHeader, ciphertext: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&header.version.to_le_bytes());
    buf.extend_from_slice(&header.kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&header.kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&header.kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(&header.salt);
    buf.extend_from_slice(&header.nonce);
    buf.extend_from_slice(&(ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(ciphertext);
    buf
}

/// Parse raw file bytes into the header and the ciphertext slice.
pub fn decode(data: &[u8]) -> Result<(FileHeader, &[u8]), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a valid INVR file".into(),
        ));
    }

    let mut cursor = Cursor { data, offset: 0 };

    if &cursor.take::<4>()? != MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "missing INVR magic bytes".into(),
        ));
    }

    let version = u16::from_le_bytes(cursor.take()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(cursor.take()?),
        time_cost: u32::from_le_bytes(cursor.take()?),
        parallelism: u32::from_le_bytes(cursor.take()?),
    };
    check_kdf_params(&kdf_params)?;

    let salt = cursor.take::<16>()?;
    let nonce = cursor.take::<12>()?;
    let ciphertext_len = u64::from_le_bytes(cursor.take()?);

    let remaining = data.len() - cursor.offset;
    let ciphertext_len = usize::try_from(ciphertext_len)
        .ok()
        .filter(|&len| len <= remaining)
        .ok_or_else(|| {
            CoreError::InvalidFileFormat(format!(
                "File truncated: expected {ciphertext_len} bytes of ciphertext, got {remaining}"
            ))
        })?;

    let ciphertext = &data[cursor.offset..cursor.offset + ciphertext_len];
    let header = FileHeader {
        version,
        kdf_params,
        salt,
        nonce,
    };
    Ok((header, ciphertext))
}

/// Reject KDF parameters outside safe bounds, so a crafted file cannot make
/// key derivation exhaust memory or CPU.
fn check_kdf_params(p: &KdfParams) -> Result<(), CoreError> {
    // memory_cost: 8 KiB (Argon2 minimum) ..= 1 GiB
    if !(8..=1_048_576).contains(&p.memory_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF memory_cost out of safe range: {} KiB (expected 8..1048576)",
            p.memory_cost
        )));
    }
    if !(1..=20).contains(&p.time_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF time_cost out of safe range: {} (expected 1..20)",
            p.time_cost
        )));
    }
    if !(1..=16).contains(&p.parallelism) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF parallelism out of safe range: {} (expected 1..16)",
            p.parallelism
        )));
    }
    Ok(())
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Cursor<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let bytes = self
            .data
            .get(self.offset..self.offset + N)
            .and_then(|s| <[u8; N]>::try_from(s).ok())
            .ok_or_else(|| CoreError::InvalidFileFormat("Unexpected end of header".into()))?;
        self.offset += N;
        Ok(bytes)
    }
}
