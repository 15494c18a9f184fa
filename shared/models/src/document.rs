use sha2::{Digest, Sha256};

/// A file received from `POST /api/analyze`, held fully in memory for the
/// lifetime of one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub mime_type: String,
    pub size: usize,
    pub data: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            size: data.len(),
            data,
        }
    }

    /// Hex-encoded SHA-256 of the file contents.
    pub fn content_hash(&self) -> String {
        hex::encode(Sha256::digest(&self.data))
    }

    /// First bytes of the file, used for signature checks.
    pub fn magic(&self) -> &[u8] {
        &self.data[..self.data.len().min(4)]
    }
}
