use super::lock::DestinationLock;
use crate::error::{GitError, Result};
use crate::replay::TargetRepositoryWriter;
use crate::types::{Author, FileKind};
use git2::{Index, IndexEntry, IndexTime, Oid, Repository, Signature, Time};
use std::fs;
use std::path::{Path, PathBuf};

/// Identity used when a source revision carries no author
#[derive(Debug, Clone)]
pub struct FallbackIdentity {
    pub name: String,
    pub email: String,
}

impl Default for FallbackIdentity {
    fn default() -> Self {
        Self {
            name: "microannotate".to_string(),
            email: "microannotate@localhost".to_string(),
        }
    }
}

/// Writes the derived history into a fresh, non-bare git repository
///
/// Writes and deletions land in both the working tree and the index, so
/// the checkout always mirrors the last derived commit.
pub struct GitTargetWriter {
    repo: Repository,
    index: Index,
    workdir: PathBuf,
    fallback: FallbackIdentity,
    _lock: DestinationLock,
}

impl GitTargetWriter {
    /// Create (or reopen) the destination repository at `path`
    ///
    /// The destination must not have any commit yet.
    pub fn init<P: AsRef<Path>>(path: P, fallback: FallbackIdentity) -> Result<Self> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;

        let repo = Repository::init(path).map_err(|e| GitError::InitFailed {
            path: path.display().to_string(),
            reason: e.message().to_string(),
        })?;
        let lock = DestinationLock::acquire(repo.path())?;

        if repo.head().is_ok() {
            return Err(GitError::DestinationNotEmpty(path.display().to_string()).into());
        }

        let workdir = repo
            .workdir()
            .ok_or_else(|| GitError::InitFailed {
                path: path.display().to_string(),
                reason: "repository has no working directory".to_string(),
            })?
            .to_path_buf();
        let index = repo.index()?;

        tracing::info!("Initialized destination repository at: {}", workdir.display());

        Ok(Self {
            repo,
            index,
            workdir,
            fallback,
            _lock: lock,
        })
    }

    /// Get the working directory of the destination
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Remove files sitting where a directory of `path` has to go
    fn clear_ancestors(&mut self, path: &str) -> Result<()> {
        let mut prefix = String::new();
        let components: Vec<&str> = path.split('/').collect();
        for component in &components[..components.len().saturating_sub(1)] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(component);

            let full_path = self.workdir.join(&prefix);
            match fs::symlink_metadata(&full_path) {
                Ok(meta) if meta.is_dir() => continue,
                Ok(_) => {
                    tracing::debug!("Replacing file {} with a directory", prefix);
                    fs::remove_file(&full_path)?;
                    if self.index.get_path(Path::new(&prefix), 0).is_some() {
                        self.index.remove_path(Path::new(&prefix))?;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Remove directories left empty by a deletion, up to the working directory
    fn prune_empty_parents(&self, deleted: &Path) -> Result<()> {
        let mut dir = deleted.parent();
        while let Some(current) = dir {
            if current == self.workdir || !current.starts_with(&self.workdir) {
                break;
            }
            if fs::read_dir(current)?.next().is_some() {
                break;
            }
            fs::remove_dir(current)?;
            dir = current.parent();
        }
        Ok(())
    }

    fn signature(&self, author: Option<&Author>) -> Result<Signature<'static>> {
        let signature = match author {
            Some(author) => Signature::new(
                &author.name,
                &author.email,
                &Time::new(author.time, author.offset_minutes),
            )?,
            None => Signature::now(&self.fallback.name, &self.fallback.email)?,
        };
        Ok(signature)
    }
}

impl TargetRepositoryWriter for GitTargetWriter {
    fn write_file(&mut self, path: &str, content: &[u8], kind: FileKind) -> Result<()> {
        self.clear_ancestors(path)?;

        let full_path = self.workdir.join(path);
        match fs::symlink_metadata(&full_path) {
            Ok(meta) if meta.is_dir() => {
                fs::remove_dir_all(&full_path)?;
                self.index.remove_dir(Path::new(path), 0)?;
            }
            Ok(_) => fs::remove_file(&full_path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_worktree_file(&full_path, content, kind)?;

        // Blob bytes are exactly `content`: no attribute or autocrlf filtering
        let entry = IndexEntry {
            ctime: IndexTime::new(0, 0),
            mtime: IndexTime::new(0, 0),
            dev: 0,
            ino: 0,
            mode: index_mode(kind),
            uid: 0,
            gid: 0,
            file_size: 0,
            id: Oid::zero(),
            flags: 0,
            flags_extended: 0,
            path: path.as_bytes().to_vec(),
        };
        self.index.add_frombuffer(&entry, content)?;
        Ok(())
    }

    fn delete_file(&mut self, path: &str) -> Result<()> {
        let full_path = self.workdir.join(path);
        match fs::remove_file(&full_path) {
            Ok(()) => self.prune_empty_parents(&full_path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Deleting {} which is not in the destination", path);
            }
            Err(e) => return Err(e.into()),
        }
        if self.index.get_path(Path::new(path), 0).is_some() {
            self.index.remove_path(Path::new(path))?;
        }
        Ok(())
    }

    fn commit(
        &mut self,
        message: &str,
        author: Option<&Author>,
        parent: Option<&str>,
    ) -> Result<String> {
        self.index.write()?;
        let tree_id = self.index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent_commit = match parent {
            Some(id) => {
                let oid = Oid::from_str(id)
                    .map_err(|_| GitError::CommitFailed(format!("invalid parent id {}", id)))?;
                Some(self.repo.find_commit(oid)?)
            }
            None => None,
        };
        let parents: Vec<_> = parent_commit.iter().collect();

        let signature = self.signature(author)?;
        let oid = self
            .repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )
            .map_err(|e| GitError::CommitFailed(e.message().to_string()))?;

        Ok(oid.to_string())
    }
}

fn index_mode(kind: FileKind) -> u32 {
    match kind {
        FileKind::Regular => 0o100644,
        FileKind::Executable => 0o100755,
        FileKind::Symlink => 0o120000,
    }
}

#[cfg(unix)]
fn write_worktree_file(path: &Path, content: &[u8], kind: FileKind) -> Result<()> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::fs::{PermissionsExt, symlink};

    match kind {
        FileKind::Symlink => symlink(OsStr::from_bytes(content), path)?,
        FileKind::Executable => {
            fs::write(path, content)?;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
        }
        FileKind::Regular => fs::write(path, content)?,
    }
    Ok(())
}

#[cfg(not(unix))]
fn write_worktree_file(path: &Path, content: &[u8], _kind: FileKind) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}
