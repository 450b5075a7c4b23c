//! Git-backed collaborators for history replay
//!
//! Provides a read-only revision source over an existing repository and a
//! single-writer target that builds the derived repository.

/// Advisory lock on the destination repository
pub mod lock;
/// Revision enumeration and content access over a source repository
pub mod source;
/// Commit creation in the destination repository
pub mod writer;

pub use lock::DestinationLock;
pub use source::GitRevisionSource;
pub use writer::{FallbackIdentity, GitTargetWriter};
