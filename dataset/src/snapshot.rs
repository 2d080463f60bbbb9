use crate::blob::DatasetBlob;
use crc32fast::Hasher;
use rkyv::{AlignedVec, Deserialize};
use sider_core::error::{ErrorCode, SiderError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const SNAPSHOT_MAGIC: &[u8; 4] = b"SDRB";
pub const SNAPSHOT_VERSION: u32 = 1;
/// Format: [Magic: 4 bytes][Version: 4 bytes][CRC: 4 bytes][Len: 8 bytes][Payload: Len bytes]
const HEADER_LEN: usize = 4 + 4 + 4 + 8;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{path} is not a blob snapshot")]
    BadMagic { path: String },
    #[error("{path} has unsupported snapshot version {version}")]
    UnsupportedVersion { path: String, version: u32 },
    #[error("{path} is truncated")]
    Truncated { path: String },
    #[error("Data integrity error in {path} (CRC mismatch)")]
    CrcMismatch { path: String },
    #[error("Corrupt archive in {path}")]
    CorruptArchive { path: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SiderError for SnapshotError {
    fn error_code(&self) -> ErrorCode {
        match self {
            SnapshotError::Io(_) => ErrorCode::Internal,
            SnapshotError::BadMagic { .. } => ErrorCode::DataLoss,
            SnapshotError::UnsupportedVersion { .. } => ErrorCode::FailedPrecondition,
            SnapshotError::Truncated { .. } => ErrorCode::DataLoss,
            SnapshotError::CrcMismatch { .. } => ErrorCode::DataLoss,
            SnapshotError::CorruptArchive { .. } => ErrorCode::DataLoss,
            SnapshotError::Serialization(_) => ErrorCode::Internal,
        }
    }
}

/// Serializes a blob into a framed snapshot image.
pub fn encode(blob: &DatasetBlob) -> Result<Vec<u8>, SnapshotError> {
    let payload = rkyv::to_bytes::<_, 4096>(blob)
        .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

    let mut hasher = Hasher::new();
    hasher.update(&payload);
    let crc = hasher.finalize();

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(SNAPSHOT_MAGIC);
    out.extend_from_slice(&SNAPSHOT_VERSION.to_be_bytes());
    out.extend_from_slice(&crc.to_be_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_be_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Validates a framed snapshot image and deserializes the blob. `label`
/// names the source in errors.
pub fn decode(bytes: &[u8], label: &str) -> Result<DatasetBlob, SnapshotError> {
    let path = label.to_string();
    if bytes.len() < HEADER_LEN {
        return Err(SnapshotError::Truncated { path });
    }
    let (header, rest) = bytes.split_at(HEADER_LEN);
    if &header[0..4] != SNAPSHOT_MAGIC {
        return Err(SnapshotError::BadMagic { path });
    }
    let version = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion { path, version });
    }
    let crc = u32::from_be_bytes([header[8], header[9], header[10], header[11]]);
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&header[12..20]);
    let len = u64::from_be_bytes(len_bytes) as usize;
    if rest.len() < len {
        return Err(SnapshotError::Truncated { path });
    }
    let payload = &rest[..len];

    let mut hasher = Hasher::new();
    hasher.update(payload);
    if hasher.finalize() != crc {
        return Err(SnapshotError::CrcMismatch { path });
    }

    // The archive root must sit on an aligned buffer before validation.
    let mut aligned = AlignedVec::with_capacity(len);
    aligned.extend_from_slice(payload);
    let archived = rkyv::check_archived_root::<DatasetBlob>(&aligned[..])
        .map_err(|_| SnapshotError::CorruptArchive { path: path.clone() })?;
    let blob: DatasetBlob = archived
        .deserialize(&mut rkyv::Infallible)
        .map_err(|_| SnapshotError::CorruptArchive { path })?;
    Ok(blob)
}

/// Directory of blob snapshots keyed by content digest.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, digest: &str) -> PathBuf {
        self.dir.join(format!("blob_{}.rkyv", digest))
    }

    /// Writes the snapshot for `digest`.
    /// Atomically writes to a temp file then renames.
    pub fn save(&self, digest: &str, blob: &DatasetBlob) -> Result<PathBuf, SnapshotError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let path = self.path_for(digest);
        let tmp_path = path.with_extension("tmp");
        let bytes = encode(blob)?;

        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, &path)?;

        info!(
            path = %path.display(),
            records = blob.len(),
            bytes = bytes.len(),
            "wrote blob snapshot"
        );
        Ok(path)
    }

    /// Loads the snapshot for `digest`; `Ok(None)` when none exists.
    pub fn load(&self, digest: &str) -> Result<Option<DatasetBlob>, SnapshotError> {
        let path = self.path_for(digest);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no blob snapshot");
                return Ok(None);
            }
            Err(e) => return Err(SnapshotError::Io(e)),
        };
        let blob = decode(&bytes, &path.display().to_string())?;
        info!(path = %path.display(), records = blob.len(), "loaded blob snapshot");
        Ok(Some(blob))
    }
}
