use crate::error::{AnnotateError, GitError, Result};
use crate::replay::RevisionSource;
use crate::types::{Author, ChangeStatus, FileChange, FileKind, Revision, RevisionSelector};
use git2::{Commit, Delta, DiffOptions, FileMode, Oid, Repository, Sort};
use std::path::{Path, PathBuf};

/// Read-only view of a git repository's history
pub struct GitRevisionSource {
    repo: Repository,
    repo_path: PathBuf,
}

impl GitRevisionSource {
    /// Discover and open a git repository from any path within it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let repo = Repository::discover(path).map_err(|e| GitError::OpenFailed {
            path: path.display().to_string(),
            reason: e.message().to_string(),
        })?;
        let repo_path = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();

        tracing::info!("Opened source repository at: {}", repo_path.display());

        Ok(Self { repo, repo_path })
    }

    /// Get the repository root path
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn resolve(&self, rev: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(rev)
            .map_err(|_| GitError::RevisionNotFound(rev.to_string()))?;
        let commit = object
            .peel_to_commit()
            .map_err(|_| GitError::RevisionNotFound(rev.to_string()))?;
        Ok(commit.id())
    }

    /// Ancestry of `end`, root first
    fn ancestry(&self, end: &RevisionSelector) -> Result<Vec<Oid>> {
        let tip = match end {
            RevisionSelector::Latest => match self.repo.head() {
                Ok(head) => head.peel_to_commit()?.id(),
                Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                    tracing::info!("Source repository has no commits");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(e.into()),
            },
            RevisionSelector::Id(rev) => self.resolve(rev)?,
            RevisionSelector::Index(_) => {
                let mut all = self.ancestry(&RevisionSelector::Latest)?;
                return self.truncate_to_index(&mut all, end).map(|()| all);
            }
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(tip)?;

        revwalk
            .map(|oid| oid.map_err(AnnotateError::from))
            .collect()
    }

    fn truncate_to_index(&self, oids: &mut Vec<Oid>, end: &RevisionSelector) -> Result<()> {
        if let RevisionSelector::Index(i) = end {
            if *i >= oids.len() {
                return Err(GitError::RevisionNotFound(end.to_string()).into());
            }
            oids.truncate(i + 1);
        }
        Ok(())
    }

    fn start_offset(
        &self,
        oids: &[Oid],
        start: &RevisionSelector,
        end: &RevisionSelector,
    ) -> Result<usize> {
        match start {
            RevisionSelector::Index(i) => Ok(*i),
            RevisionSelector::Latest => Ok(oids.len().saturating_sub(1)),
            RevisionSelector::Id(rev) => {
                let oid = self.resolve(rev)?;
                oids.iter()
                    .position(|o| *o == oid)
                    .ok_or_else(|| {
                        GitError::RevisionNotInRange {
                            start: rev.clone(),
                            end: end.to_string(),
                        }
                        .into()
                    })
            }
        }
    }

    /// Build a [`Revision`] from a commit, diffing against its first parent
    fn extract_revision(&self, commit: &Commit) -> Result<Revision> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut diff_opts = DiffOptions::new();
        diff_opts.ignore_submodules(true);
        let diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_opts))?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let status = match delta.status() {
                Delta::Added | Delta::Copied => ChangeStatus::Added,
                Delta::Modified | Delta::Typechange => ChangeStatus::Modified,
                Delta::Deleted => ChangeStatus::Removed,
                other => {
                    tracing::debug!("Ignoring {:?} delta in {}", other, commit.id());
                    continue;
                }
            };

            let (file, status) = match status {
                ChangeStatus::Removed => (delta.old_file(), status),
                // A file that became a submodule leaves the derived tree
                _ if delta.new_file().mode() == FileMode::Commit
                    && delta.old_file().mode() != FileMode::Commit
                    && delta.status() == Delta::Typechange =>
                {
                    (delta.old_file(), ChangeStatus::Removed)
                }
                _ => (delta.new_file(), status),
            };
            if file.mode() == FileMode::Commit {
                continue;
            }

            let Some(bytes) = file.path_bytes() else { continue };
            let Ok(path) = std::str::from_utf8(bytes) else {
                tracing::warn!(
                    "Skipping non-UTF-8 path {} in {}",
                    String::from_utf8_lossy(bytes),
                    commit.id()
                );
                continue;
            };
            changes.push(FileChange::new(path, status).with_kind(file_kind(file.mode())));
        }

        let author = commit.author();
        let author = Some(Author {
            name: author.name().unwrap_or("Unknown").to_string(),
            email: author.email().unwrap_or("").to_string(),
            time: author.when().seconds(),
            offset_minutes: author.when().offset_minutes(),
        });

        Ok(Revision {
            id: commit.id().to_string(),
            message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            author,
            changes,
        })
    }
}

fn file_kind(mode: FileMode) -> FileKind {
    match mode {
        FileMode::BlobExecutable => FileKind::Executable,
        FileMode::Link => FileKind::Symlink,
        _ => FileKind::Regular,
    }
}

impl RevisionSource for GitRevisionSource {
    fn list_revisions(
        &self,
        start: &RevisionSelector,
        end: &RevisionSelector,
        limit: Option<usize>,
    ) -> Result<Vec<Revision>> {
        let oids = self.ancestry(end)?;
        let offset = self.start_offset(&oids, start, end)?;

        tracing::info!(
            "Resolved range {}..{} to {} of {} revisions",
            start,
            end,
            oids.len().saturating_sub(offset).min(limit.unwrap_or(usize::MAX)),
            oids.len()
        );

        let mut revisions = Vec::new();
        for oid in oids
            .iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
        {
            let commit = self.repo.find_commit(*oid)?;
            revisions.push(self.extract_revision(&commit)?);

            if revisions.len() % 50 == 0 {
                tracing::debug!("Extracted {} revisions", revisions.len());
            }
        }

        Ok(revisions)
    }

    fn get_file_content(&self, revision_id: &str, path: &str) -> Result<Option<Vec<u8>>> {
        let oid = Oid::from_str(revision_id)
            .map_err(|_| GitError::RevisionNotFound(revision_id.to_string()))?;
        let tree = self.repo.find_commit(oid)?.tree()?;

        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match entry.to_object(&self.repo)?.into_blob() {
            Ok(blob) => Ok(Some(blob.content().to_vec())),
            Err(_) => Ok(None),
        }
    }
}
