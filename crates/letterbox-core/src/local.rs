//! Store backed by a local checkout of the letters repository.
//!
//! Version tokens are SHA-256 digests of the file bytes. Branches are not
//! modelled: whatever is checked out is what gets read and written.

use crate::error::{LetterboxError, Result};
use crate::io;
use crate::paths;
use crate::store::{Document, FileRef, RepositoryStore, VersionToken, WriteAction, WriteOutcome};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tracing::debug;

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a repository path onto the checkout; it may not climb out of it.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let mut full = self.root.clone();
        for seg in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            if seg == ".." {
                return Err(LetterboxError::InvalidPath(path.to_string()));
            }
            full.push(seg);
        }
        Ok(full)
    }
}

pub fn version_of(data: &[u8]) -> VersionToken {
    let digest = Sha256::digest(data);
    VersionToken(digest.iter().map(|b| format!("{b:02x}")).collect())
}

impl RepositoryStore for LocalStore {
    fn list_files(&self, folder: &str, _branch: &str) -> Result<Vec<FileRef>> {
        let dir = self.resolve(folder)?;
        if !dir.is_dir() {
            debug!(folder, "folder does not exist");
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(FileRef::new(paths::repo_join(folder, &name)));
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    fn read(&self, path: &str, _branch: &str) -> Result<Document> {
        let Some(data) = io::read_if_exists(&self.resolve(path)?)? else {
            return Err(LetterboxError::NotFound(path.to_string()));
        };
        let version = version_of(&data);
        Ok(Document {
            path: path.to_string(),
            text: String::from_utf8(data)?,
            version,
        })
    }

    fn create(&self, path: &str, text: &str, _message: &str, _branch: &str) -> Result<WriteOutcome> {
        let target = self.resolve(path)?;
        if target.exists() {
            return Err(LetterboxError::StaleVersion(path.to_string()));
        }
        io::atomic_write(&target, text.as_bytes())?;
        debug!(path, "created local file");
        Ok(WriteOutcome {
            action: WriteAction::Created,
            path: path.to_string(),
            commit: None,
        })
    }

    fn update(
        &self,
        path: &str,
        text: &str,
        _message: &str,
        _branch: &str,
        version: &VersionToken,
    ) -> Result<WriteOutcome> {
        let target = self.resolve(path)?;
        let Some(current) = io::read_if_exists(&target)? else {
            return Err(LetterboxError::NotFound(path.to_string()));
        };
        if version_of(&current) != *version {
            return Err(LetterboxError::StaleVersion(path.to_string()));
        }
        io::atomic_write(&target, text.as_bytes())?;
        debug!(path, "updated local file");
        Ok(WriteOutcome {
            action: WriteAction::Updated,
            path: path.to_string(),
            commit: None,
        })
    }

    fn describe(&self) -> String {
        format!("local checkout {}", self.root.display())
    }
}
