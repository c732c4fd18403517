//! Repository store capability.
//!
//! Letters live in a repository that is read and written one file at a time.
//! Every read hands back a [`VersionToken`]; an update must present the token
//! it read, and the store refuses the write if the file moved on since.

use crate::error::{LetterboxError, Result};
use crate::paths;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(pub String);

impl VersionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub path: String,
}

impl FileRef {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: paths::file_name(&path).to_string(),
            path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: String,
    pub text: String,
    pub version: VersionToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteAction {
    Created,
    Updated,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteAction::Created => f.write_str("created"),
            WriteAction::Updated => f.write_str("updated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub action: WriteAction,
    pub path: String,
    /// Commit recorded by the store, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

// ---------------------------------------------------------------------------
// RepositoryStore
// ---------------------------------------------------------------------------

pub trait RepositoryStore {
    /// Files directly inside `folder`. A folder that does not exist is empty.
    fn list_files(&self, folder: &str, branch: &str) -> Result<Vec<FileRef>>;

    /// Fails with [`LetterboxError::NotFound`] when `path` does not exist.
    fn read(&self, path: &str, branch: &str) -> Result<Document>;

    fn create(&self, path: &str, text: &str, message: &str, branch: &str) -> Result<WriteOutcome>;

    /// Fails with [`LetterboxError::StaleVersion`] when `version` is not the
    /// file's current version.
    fn update(
        &self,
        path: &str,
        text: &str,
        message: &str,
        branch: &str,
        version: &VersionToken,
    ) -> Result<WriteOutcome>;

    /// Name of the backing store, for logs.
    fn describe(&self) -> String;

    fn list_text_like_files(&self, folder: &str, branch: &str) -> Result<Vec<FileRef>> {
        Ok(self
            .list_files(folder, branch)?
            .into_iter()
            .filter(|f| paths::is_text_like(&f.name))
            .collect())
    }

    /// Update `path` if it exists on `branch`, create it otherwise.
    fn write_or_create(
        &self,
        path: &str,
        text: &str,
        message: &str,
        branch: &str,
    ) -> Result<WriteOutcome> {
        match self.read(path, branch) {
            Ok(existing) => self.update(path, text, message, branch, &existing.version),
            Err(LetterboxError::NotFound(_)) => self.create(path, text, message, branch),
            Err(e) => Err(e),
        }
    }
}

/// Load and deserialize a JSON document from the store.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn RepositoryStore,
    path: &str,
    branch: &str,
) -> Result<(T, VersionToken)> {
    let doc = store.read(path, branch)?;
    let value = serde_json::from_str(&doc.text)?;
    Ok((value, doc.version))
}
