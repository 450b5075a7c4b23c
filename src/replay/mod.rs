//! Linear replay of source revisions into a derived history
//!
//! The replicator only talks to the two collaborator traits below, so the
//! same logic drives git repositories and the in-memory fakes used in tests.

use crate::error::{ReplayError, Result};
use crate::transform::TransformPipeline;
use crate::types::{Author, ChangeStatus, FileKind, ReplayedRevision, Revision, RevisionSelector};
use std::collections::BTreeMap;

/// Read-only access to the history being replayed
pub trait RevisionSource {
    /// Resolve a range into revisions, oldest first, at most `limit` of them
    fn list_revisions(
        &self,
        start: &RevisionSelector,
        end: &RevisionSelector,
        limit: Option<usize>,
    ) -> Result<Vec<Revision>>;

    /// Raw content of `path` at `revision_id`, `None` if the path does not exist there
    fn get_file_content(&self, revision_id: &str, path: &str) -> Result<Option<Vec<u8>>>;
}

/// The single writer of the derived history
pub trait TargetRepositoryWriter {
    /// Store `content` at `path` byte for byte, replacing whatever is there
    fn write_file(&mut self, path: &str, content: &[u8], kind: FileKind) -> Result<()>;

    fn delete_file(&mut self, path: &str) -> Result<()>;

    /// Record everything written or deleted since the previous commit
    ///
    /// `author` is `None` when the source revision has no author information.
    fn commit(
        &mut self,
        message: &str,
        author: Option<&Author>,
        parent: Option<&str>,
    ) -> Result<String>;
}

/// Transformed content of one file, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedWrite {
    pub content: Vec<u8>,
    pub kind: FileKind,
}

/// The content delta and metadata of one derived commit, before it is written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedCommit {
    pub parent: Option<String>,
    pub message: String,
    pub writes: BTreeMap<String, StagedWrite>,
    pub deletions: Vec<String>,
}

/// Settings for [`HistoryReplicator`] beyond the transform itself
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Log progress every this many revisions
    pub log_every: usize,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self { log_every: 50 }
    }
}

/// Replays revisions one by one into a strictly linear chain of commits
pub struct HistoryReplicator<'a, S, W> {
    source: &'a S,
    target: &'a mut W,
    options: ReplayOptions,
}

impl<'a, S, W> HistoryReplicator<'a, S, W>
where
    S: RevisionSource,
    W: TargetRepositoryWriter,
{
    pub fn new(source: &'a S, target: &'a mut W) -> Self {
        Self {
            source,
            target,
            options: ReplayOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReplayOptions) -> Self {
        self.options = options;
        self
    }

    /// Create exactly one derived commit per revision, in order
    ///
    /// Commit `i` has commit `i - 1` as its only parent; the first one has
    /// none. Any failure aborts the replay; commits already created stay.
    pub fn replicate(
        &mut self,
        revisions: &[Revision],
        pipeline: &TransformPipeline,
    ) -> Result<Vec<ReplayedRevision>> {
        let mut replayed = Vec::with_capacity(revisions.len());
        let mut parent: Option<String> = None;

        for (i, revision) in revisions.iter().enumerate() {
            let staged = self.stage(revision, parent.take(), pipeline)?;
            let derived_id = self.apply(&staged, revision.author.as_ref())?;

            tracing::debug!(
                "Replayed {} as {} ({} writes, {} deletions)",
                revision.id,
                derived_id,
                staged.writes.len(),
                staged.deletions.len()
            );

            replayed.push(ReplayedRevision {
                source_id: revision.id.clone(),
                derived_id: derived_id.clone(),
            });
            parent = Some(derived_id);

            if (i + 1) % self.options.log_every.max(1) == 0 {
                tracing::info!("Replayed {}/{} revisions", i + 1, revisions.len());
            }
        }

        tracing::info!("Replay complete: {} revisions", replayed.len());
        Ok(replayed)
    }

    /// Fetch and transform everything the revision touches
    ///
    /// Nothing reaches the writer until the whole revision has been staged,
    /// so a fetch failure never leaves a half-written commit behind.
    pub fn stage(
        &self,
        revision: &Revision,
        parent: Option<String>,
        pipeline: &TransformPipeline,
    ) -> Result<DerivedCommit> {
        let mut staged = DerivedCommit {
            parent,
            message: revision.derived_message(),
            ..Default::default()
        };

        for change in &revision.changes {
            if change.path.is_empty() || change.path.starts_with('/') {
                return Err(ReplayError::InvalidPath {
                    revision: revision.id.clone(),
                    path: change.path.clone(),
                }
                .into());
            }

            match change.status {
                ChangeStatus::Added | ChangeStatus::Modified => {
                    let raw = self
                        .source
                        .get_file_content(&revision.id, &change.path)?
                        .ok_or_else(|| ReplayError::ContentMissing {
                            revision: revision.id.clone(),
                            path: change.path.clone(),
                        })?;
                    let content = match change.kind {
                        FileKind::Symlink => raw,
                        _ => pipeline.transform(&change.path, &raw).into_owned(),
                    };
                    staged.writes.insert(
                        change.path.clone(),
                        StagedWrite {
                            content,
                            kind: change.kind,
                        },
                    );
                }
                ChangeStatus::Removed => staged.deletions.push(change.path.clone()),
            }
        }

        Ok(staged)
    }

    /// Deletions go first: a path can turn from a file into a directory
    /// (or back) within one revision.
    fn apply(&mut self, staged: &DerivedCommit, author: Option<&Author>) -> Result<String> {
        for path in &staged.deletions {
            self.target.delete_file(path)?;
        }
        for (path, write) in &staged.writes {
            self.target.write_file(path, &write.content, write.kind)?;
        }
        self.target
            .commit(&staged.message, author, staged.parent.as_deref())
    }
}

#[cfg(test)]
pub(crate) mod fakes;
