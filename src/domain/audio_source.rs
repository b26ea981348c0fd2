use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Caller-owned handle to an episode audio file on disk.
///
/// The pipeline only reads the referenced file; it never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    pub path: PathBuf,
    pub duration_ms: u64,
    pub byte_len: u64,
}

impl AudioSource {
    pub fn new(path: impl Into<PathBuf>, duration_ms: u64, byte_len: u64) -> Self {
        Self {
            path: path.into(),
            duration_ms,
            byte_len,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeId(Uuid);

impl EpisodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EpisodeId {
    fn default() -> Self {
        Self::new()
    }
}
