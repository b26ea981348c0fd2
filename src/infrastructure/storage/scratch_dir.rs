use std::io;
use std::path::Path;

use tempfile::TempDir;

use crate::domain::EpisodeId;

/// Scratch directory exclusively owned by one pipeline run.
///
/// `cleanup` removes it recursively; dropping it without `cleanup` (a panic
/// or an abandoned run) removes it as well, so no run can leak directories.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn create(root: Option<&Path>, episode: EpisodeId) -> io::Result<Self> {
        let prefix = format!("podscribe-{}-", episode.as_uuid());
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        tracing::debug!(path = %dir.path().display(), "Scratch directory created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory and everything in it, logging on failure.
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Scratch directory removed");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Failed to remove scratch directory"
                );
            }
        }
    }
}
