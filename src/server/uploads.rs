use crate::Result;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

/// File received in a multipart upload. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content_type: String,
    pub raw_bytes: Vec<u8>,
}

/// Upload written to disk under a per-request unique name.
/// The file is deleted when this value drops.
#[derive(Debug)]
pub struct StagedUpload {
    pub request_id: Uuid,
    file: NamedTempFile,
}

impl UploadedDocument {
    /// Writes the upload to `dir` as `upload-<uuid>-<random>.<ext>`.
    pub async fn persist(&self, dir: &Path) -> Result<StagedUpload> {
        tokio::fs::create_dir_all(dir).await?;

        let request_id = Uuid::new_v4();
        let prefix = format!("upload-{request_id}-");
        let suffix = self.extension().map(|ext| format!(".{ext}")).unwrap_or_default();

        let dir = dir.to_path_buf();
        let file = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(&suffix)
                .tempfile_in(dir)
        })
        .await??;
        tokio::fs::write(file.path(), &self.raw_bytes).await?;

        debug!(
            "Staged upload {} ({} bytes, {}) at {}",
            self.filename,
            self.raw_bytes.len(),
            self.content_type,
            file.path().display()
        );

        Ok(StagedUpload { request_id, file })
    }

    /// Lowercased extension of the client filename, if short and alphanumeric.
    fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
    }
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.file.path()).await?)
    }
}
