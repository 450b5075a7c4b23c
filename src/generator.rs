//! Range resolution and end-to-end replay
//!
//! [`generate`] is the entry point: it opens the source, prepares the
//! destination, resolves the requested range and hands everything to the
//! [`HistoryReplicator`].

use crate::config::Config;
use crate::error::Result;
use crate::git::{GitRevisionSource, GitTargetWriter};
use crate::replay::{HistoryReplicator, ReplayOptions, RevisionSource, TargetRepositoryWriter};
use crate::transform::{LanguageRegistry, TransformPipeline};
use crate::types::{ReplayedRevision, RevisionSelector, TransformConfig};
use std::path::Path;
use std::time::Instant;

/// A range of source revisions to replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    pub start: RevisionSelector,
    pub end: RevisionSelector,
    /// Replay at most this many revisions, counted from `start`
    pub limit: Option<usize>,
}

impl Default for RevisionRange {
    fn default() -> Self {
        Self {
            start: RevisionSelector::Index(0),
            end: RevisionSelector::Latest,
            limit: None,
        }
    }
}

/// Replay `source_path`'s history into a new repository at `dest_path`
///
/// An empty range (including `limit == Some(0)`) leaves the destination
/// initialized but without commits.
pub fn generate(
    source_path: &Path,
    dest_path: &Path,
    rev_start: RevisionSelector,
    rev_end: RevisionSelector,
    limit: Option<usize>,
    tokenize: bool,
    remove_comments: bool,
) -> Result<Vec<ReplayedRevision>> {
    let config = Config {
        transform: TransformConfig::new(tokenize, remove_comments),
        ..Default::default()
    };
    let range = RevisionRange {
        start: rev_start,
        end: rev_end,
        limit,
    };

    generate_with_config(source_path, dest_path, &range, &config)
}

/// Same as [`generate`], with transform flags, aliases and identities from `config`
pub fn generate_with_config(
    source_path: &Path,
    dest_path: &Path,
    range: &RevisionRange,
    config: &Config,
) -> Result<Vec<ReplayedRevision>> {
    let start_time = Instant::now();

    let source = GitRevisionSource::open(source_path)?;
    let mut target = GitTargetWriter::init(dest_path, config.fallback_identity())?;
    let pipeline = TransformPipeline::new(config.registry()?, config.transform);

    let replayed = replay_range(
        &source,
        &mut target,
        range,
        &pipeline,
        config.replay_options(),
    )?;

    tracing::info!(
        "Replayed {} revisions from {} into {} in {:.2?}",
        replayed.len(),
        source.repo_path().display(),
        target.workdir().display(),
        start_time.elapsed()
    );

    Ok(replayed)
}

/// Resolve `range` against `source` and replay it into `target`
pub fn replay_range<S, W>(
    source: &S,
    target: &mut W,
    range: &RevisionRange,
    pipeline: &TransformPipeline,
    options: ReplayOptions,
) -> Result<Vec<ReplayedRevision>>
where
    S: RevisionSource,
    W: TargetRepositoryWriter,
{
    let mut revisions = source.list_revisions(&range.start, &range.end, range.limit)?;
    if let Some(limit) = range.limit {
        revisions.truncate(limit);
    }

    tracing::info!(
        "Replaying {} revisions (tokenize={}, remove_comments={})",
        revisions.len(),
        pipeline.config().tokenize,
        pipeline.config().remove_comments
    );

    HistoryReplicator::new(source, target)
        .with_options(options)
        .replicate(&revisions, pipeline)
}

/// Pipeline with only the built-in languages
pub fn default_pipeline(tokenize: bool, remove_comments: bool) -> TransformPipeline {
    TransformPipeline::new(
        LanguageRegistry::new(),
        TransformConfig::new(tokenize, remove_comments),
    )
}
