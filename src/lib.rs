//! # microannotate - Token-level history for fine-grained blame
//!
//! Replays the history of a git repository into a new repository, rewriting
//! every touched file through a language-aware lexical transform. With
//! tokenization enabled each token ends up on its own line, so ordinary
//! line-based blame on the derived repository attributes individual tokens
//! instead of whole lines. Comment removal keeps comment churn out of the
//! signal.
//!
//! ## Architecture
//!
//! ```text
//! generate ──► RevisionSource (git) ──► HistoryReplicator ──► TargetRepositoryWriter (git)
//!                                             │
//!                                      TransformPipeline
//!                                             │
//!                        LanguageRegistry ─ strip ─ tokenize
//! ```
//!
//! Every derived commit has exactly one parent (the previous derived commit)
//! and a message ending in `UltraBlame original commit: <id>`.
//!
//! ## Modules
//!
//! - [`generator`]: range resolution and the `generate` entry point
//! - [`replay`]: collaborator traits and the linear replicator
//! - [`transform`]: language profiles, comment stripping and tokenization
//! - [`git`]: git2-backed source and destination
//! - [`config`]: configuration with environment variable support
//! - [`types`]: revisions, selectors and transform flags
//! - [`error`]: error types and result aliases
//!
//! ## Usage Example
//!
//! ```no_run
//! use microannotate::{RevisionSelector, generate};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     generate(
//!         Path::new("/src/repo"),
//!         Path::new("/tmp/tokenized"),
//!         RevisionSelector::Index(0),
//!         RevisionSelector::Latest,
//!         None,
//!         true,
//!         true,
//!     )?;
//!     Ok(())
//! }
//! ```

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// Range resolution and end-to-end replay
pub mod generator;

/// Git-backed revision source and destination writer
pub mod git;

/// Platform-specific configuration paths
pub mod paths;

/// Linear history replay over collaborator traits
pub mod replay;

/// Comment stripping, tokenization and language profiles
pub mod transform;

/// Revisions, selectors and transform flags
pub mod types;

pub use error::{AnnotateError, Result};
pub use generator::{RevisionRange, generate, generate_with_config};
pub use types::{RevisionSelector, TransformConfig};
