use crate::utils::{Result, TranslatorError, UploadConfig};
use std::path::Path;

/// An in-memory file ready to be posted to the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadPayload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                TranslatorError::ValidationError(format!("not a file path: {}", path.display()))
            })?;
        Ok(Self { name, bytes })
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Caller-side checks before uploading; the upload itself does not repeat them.
    pub fn validate(&self, limits: &UploadConfig) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(TranslatorError::ValidationError(format!("{} is empty", self.name)));
        }

        let size = self.bytes.len() as u64;
        if size > limits.max_file_bytes {
            return Err(TranslatorError::ValidationError(format!(
                "{} is {} bytes, the limit is {} bytes",
                self.name, size, limits.max_file_bytes
            )));
        }

        let allowed = self
            .extension()
            .map(|ext| limits.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false);
        if !allowed {
            return Err(TranslatorError::ValidationError(format!(
                "unsupported file type: {} (allowed: {})",
                self.name,
                limits.allowed_extensions.join(", ")
            )));
        }

        Ok(())
    }
}
