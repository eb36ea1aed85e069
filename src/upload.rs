// Upload staging - uploaded bytes held in a scoped temporary file
//
// The decoder works on paths, so uploaded audio is written to a temp file in
// the configured directory first. The file keeps the upload's extension for
// container probing and is removed when the guard drops, on every exit path.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::AudioError;

/// Uploaded audio staged on disk for the lifetime of this value
pub struct UploadedAudio {
    file: NamedTempFile,
    original_name: String,
}

impl UploadedAudio {
    /// Write `bytes` to a fresh temp file under `dir` (created if missing)
    pub fn stage(dir: &Path, filename: &str, bytes: &[u8]) -> Result<Self, AudioError> {
        fs::create_dir_all(dir)?;

        let suffix = Path::new(filename)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        log::debug!(
            "[Upload] Staged {} ({} bytes) at {:?}",
            filename,
            bytes.len(),
            file.path()
        );

        Ok(Self {
            file,
            original_name: filename.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }
}
