//! Shared data model: revisions, changed files, range selectors and transform flags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Literal prefix of the provenance footer appended to every derived commit message
pub const PROVENANCE_PREFIX: &str = "UltraBlame original commit: ";

/// How a file changed in a revision relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeStatus {
    Added,
    Modified,
    Removed,
}

/// Tree entry kind of a file, carried through to the derived commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    #[default]
    Regular,
    Executable,
    /// Content is the link target and is never transformed
    Symlink,
}

/// A single changed path inside a revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Repository-relative path using `/` separators
    pub path: String,
    pub status: ChangeStatus,
    pub kind: FileKind,
}

impl FileChange {
    pub fn new(path: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
            kind: FileKind::Regular,
        }
    }

    pub fn with_kind(mut self, kind: FileKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Identity and timestamp of whoever authored a source revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
    /// Seconds since the Unix epoch
    pub time: i64,
    /// Offset from UTC in minutes
    pub offset_minutes: i32,
}

/// One historical snapshot of the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Canonical id in the source VCS (full hex for git)
    pub id: String,
    /// Original commit message, verbatim
    pub message: String,
    pub author: Option<Author>,
    /// Changed paths, unique within the revision
    pub changes: Vec<FileChange>,
}

impl Revision {
    /// Message of the derived commit: original message, blank line, provenance footer
    pub fn derived_message(&self) -> String {
        format!("{}\n\n{}{}", self.message, PROVENANCE_PREFIX, self.id)
    }
}

/// Selects one end of a revision range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionSelector {
    /// 0-based position in the ancestor-first sequence
    Index(usize),
    /// Anything the source VCS can resolve (hash, short hash, branch, ...)
    Id(String),
    /// The most recent revision
    Latest,
}

impl FromStr for RevisionSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") || s == "tip" {
            return Ok(RevisionSelector::Latest);
        }
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
            && let Ok(index) = s.parse()
        {
            return Ok(RevisionSelector::Index(index));
        }
        Ok(RevisionSelector::Id(s.to_string()))
    }
}

impl fmt::Display for RevisionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionSelector::Index(i) => write!(f, "#{}", i),
            RevisionSelector::Id(id) => write!(f, "{}", id),
            RevisionSelector::Latest => write!(f, "latest"),
        }
    }
}

/// Which lexical transforms to apply to every touched file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Explode content into one token per line
    #[serde(default)]
    pub tokenize: bool,
    /// Strip comments while keeping the line count
    #[serde(default)]
    pub remove_comments: bool,
}

impl TransformConfig {
    pub fn new(tokenize: bool, remove_comments: bool) -> Self {
        Self {
            tokenize,
            remove_comments,
        }
    }

    /// True when neither transform is enabled
    pub fn is_identity(&self) -> bool {
        !self.tokenize && !self.remove_comments
    }
}

/// Provenance of one derived commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayedRevision {
    pub source_id: String,
    pub derived_id: String,
}

#[cfg(test)]
mod tests;
