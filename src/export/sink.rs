use std::path::{Path, PathBuf};

use crate::export::png::ExportArtifact;
use crate::foundation::error::{TwibbonError, TwibbonResult};

/// Destination for finished exports.
pub trait ExportSink {
    /// Persist one artifact and return where it went (a path or a label).
    fn save(&mut self, artifact: &ExportArtifact) -> TwibbonResult<String>;
}

/// Writes exports into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirSink {
    fn save(&mut self, artifact: &ExportArtifact) -> TwibbonResult<String> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            TwibbonError::export_failed(format!(
                "create output dir '{}': {e}",
                self.dir.display()
            ))
        })?;
        let path = self.dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes).map_err(|e| {
            TwibbonError::export_failed(format!("write png '{}': {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "export saved");
        Ok(path.display().to_string())
    }
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    artifacts: Vec<ExportArtifact>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts in save order.
    pub fn artifacts(&self) -> &[ExportArtifact] {
        &self.artifacts
    }
}

impl ExportSink for InMemorySink {
    fn save(&mut self, artifact: &ExportArtifact) -> TwibbonResult<String> {
        self.artifacts.push(artifact.clone());
        Ok(artifact.file_name.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
