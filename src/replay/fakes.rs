//! In-memory collaborators for exercising the replicator and generator

use super::{RevisionSource, TargetRepositoryWriter};
use crate::error::{AnnotateError, GitError, Result};
use crate::types::{Author, ChangeStatus, FileChange, FileKind, Revision, RevisionSelector};
use std::collections::{BTreeMap, HashMap};

/// A linear history held in memory
#[derive(Debug, Default)]
pub struct MemorySource {
    pub revisions: Vec<Revision>,
    contents: HashMap<(String, String), Vec<u8>>,
    /// Content fetches for this path fail with an IO error
    pub failing_path: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a revision with the given (path, content) changes; `None` content removes
    pub fn push(&mut self, message: &str, changes: &[(&str, Option<&str>)]) -> String {
        let id = format!("{:040x}", self.revisions.len() + 1);
        let mut file_changes = Vec::new();

        for (path, content) in changes {
            let status = match content {
                None => ChangeStatus::Removed,
                Some(_) if self.exists_before(path) => ChangeStatus::Modified,
                Some(_) => ChangeStatus::Added,
            };
            if let Some(content) = content {
                self.contents.insert(
                    (id.clone(), path.to_string()),
                    content.as_bytes().to_vec(),
                );
            }
            file_changes.push(FileChange::new(*path, status));
        }

        self.revisions.push(Revision {
            id: id.clone(),
            message: message.to_string(),
            author: Some(Author {
                name: "Moz Illa".to_string(),
                email: "milla@mozilla.org".to_string(),
                time: 1_500_000_000 + self.revisions.len() as i64,
                offset_minutes: 60,
            }),
            changes: file_changes,
        });
        id
    }

    /// Register a revision whose listed content is absent from the store
    pub fn push_raw(&mut self, revision: Revision) {
        self.revisions.push(revision);
    }

    /// Store content for a revision registered with [`Self::push_raw`]
    pub fn insert_content(&mut self, revision_id: &str, path: &str, content: &[u8]) {
        self.contents
            .insert((revision_id.to_string(), path.to_string()), content.to_vec());
    }

    fn exists_before(&self, path: &str) -> bool {
        let mut exists = false;
        for revision in &self.revisions {
            for change in &revision.changes {
                if change.path == path {
                    exists = change.status != ChangeStatus::Removed;
                }
            }
        }
        exists
    }

    fn position(&self, selector: &RevisionSelector) -> Result<Option<usize>> {
        match selector {
            RevisionSelector::Latest => Ok(self.revisions.len().checked_sub(1)),
            RevisionSelector::Index(i) if *i < self.revisions.len() => Ok(Some(*i)),
            RevisionSelector::Index(i) => Err(GitError::RevisionNotFound(format!("#{}", i)).into()),
            RevisionSelector::Id(id) => self
                .revisions
                .iter()
                .position(|r| &r.id == id)
                .map(Some)
                .ok_or_else(|| GitError::RevisionNotFound(id.clone()).into()),
        }
    }
}

impl RevisionSource for MemorySource {
    fn list_revisions(
        &self,
        start: &RevisionSelector,
        end: &RevisionSelector,
        limit: Option<usize>,
    ) -> Result<Vec<Revision>> {
        let Some(end_pos) = self.position(end)? else {
            return Ok(Vec::new());
        };
        let start_pos = match start {
            RevisionSelector::Index(i) => *i,
            other => self.position(other)?.unwrap_or(0),
        };
        if start_pos > end_pos && !matches!(start, RevisionSelector::Index(_)) {
            return Err(GitError::RevisionNotInRange {
                start: start.to_string(),
                end: end.to_string(),
            }
            .into());
        }

        Ok(self
            .revisions
            .iter()
            .take(end_pos + 1)
            .skip(start_pos)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    fn get_file_content(&self, revision_id: &str, path: &str) -> Result<Option<Vec<u8>>> {
        if self.failing_path.as_deref() == Some(path) {
            return Err(AnnotateError::Io(std::io::Error::other(format!(
                "cannot read {}",
                path
            ))));
        }
        Ok(self
            .contents
            .get(&(revision_id.to_string(), path.to_string()))
            .cloned())
    }
}

/// A commit recorded by [`MemoryTarget`]
#[derive(Debug, Clone)]
pub struct MemoryCommit {
    pub id: String,
    pub parent: Option<String>,
    pub message: String,
    pub author: Option<Author>,
    pub tree: BTreeMap<String, Vec<u8>>,
}

/// A destination that keeps the working tree and commits in memory
#[derive(Debug, Default)]
pub struct MemoryTarget {
    pub files: BTreeMap<String, Vec<u8>>,
    pub kinds: BTreeMap<String, FileKind>,
    /// Every write and delete in call order, as `"write <path>"` / `"delete <path>"`
    pub operations: Vec<String>,
    pub commits: Vec<MemoryCommit>,
    /// The commit with this 0-based position fails
    pub fail_commit_at: Option<usize>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files
            .get(path)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

impl TargetRepositoryWriter for MemoryTarget {
    fn write_file(&mut self, path: &str, content: &[u8], kind: FileKind) -> Result<()> {
        self.operations.push(format!("write {}", path));
        self.files.insert(path.to_string(), content.to_vec());
        self.kinds.insert(path.to_string(), kind);
        Ok(())
    }

    fn delete_file(&mut self, path: &str) -> Result<()> {
        self.operations.push(format!("delete {}", path));
        self.files.remove(path);
        self.kinds.remove(path);
        Ok(())
    }

    fn commit(
        &mut self,
        message: &str,
        author: Option<&Author>,
        parent: Option<&str>,
    ) -> Result<String> {
        if self.fail_commit_at == Some(self.commits.len()) {
            return Err(GitError::CommitFailed("injected failure".to_string()).into());
        }

        let id = format!("derived-{}", self.commits.len());
        self.commits.push(MemoryCommit {
            id: id.clone(),
            parent: parent.map(str::to_string),
            message: message.to_string(),
            author: author.cloned(),
            tree: self.files.clone(),
        });
        Ok(id)
    }
}
