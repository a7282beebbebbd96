//! Persistence collaborator for course content forests.
//!
//! The content forest is always written and read whole: `save_tree` is a
//! full-document overwrite, `load_tree` returns the entire forest or `None`
//! when no content has been saved yet. Failures propagate unchanged; there
//! are no retries here.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use classflow_tree::{CodecError, NodeRecord, decode_forest, encode_forest};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CourseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CourseId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io failed")]
    Io(#[from] io::Error),

    #[error("stored content is malformed")]
    Codec(#[from] CodecError),
}

#[async_trait]
pub trait TreeStore {
    /// `None` means "no saved content yet", not an error.
    async fn load_tree(&self, course: &CourseId) -> Result<Option<Vec<NodeRecord>>, StoreError>;

    /// Full overwrite of the stored forest for this course.
    async fn save_tree(
        &mut self,
        course: &CourseId,
        records: &[NodeRecord],
    ) -> Result<(), StoreError>;
}

/// In-memory store, for tests and local development.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<CourseId, Vec<NodeRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TreeStore for MemoryStore {
    async fn load_tree(&self, course: &CourseId) -> Result<Option<Vec<NodeRecord>>, StoreError> {
        Ok(self.documents.get(course).cloned())
    }

    async fn save_tree(
        &mut self,
        course: &CourseId,
        records: &[NodeRecord],
    ) -> Result<(), StoreError> {
        self.documents.insert(course.clone(), records.to_vec());
        Ok(())
    }
}

/// One JSON document per course under a base directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    base_dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn course_path(&self, course: &CourseId) -> PathBuf {
        self.base_dir.join(format!("{course}.json"))
    }
}

#[async_trait]
impl TreeStore for LocalFileStore {
    async fn load_tree(&self, course: &CourseId) -> Result<Option<Vec<NodeRecord>>, StoreError> {
        let path = self.course_path(course);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        Ok(Some(decode_forest(&json)?))
    }

    async fn save_tree(
        &mut self,
        course: &CourseId,
        records: &[NodeRecord],
    ) -> Result<(), StoreError> {
        let json = encode_forest(records)?;
        tokio::fs::create_dir_all(&self.base_dir).await?;
        let path = self.course_path(course);
        tokio::fs::write(&path, json).await?;
        debug!(course = %course, path = %path.display(), "saved content forest");
        Ok(())
    }
}
