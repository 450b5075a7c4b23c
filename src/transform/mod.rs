//! Language-aware lexical transforms applied to file contents
//!
//! Provides extension-based profile lookup, comment stripping and
//! tokenization, composed per file by [`TransformPipeline`].

/// Comment stripping state machine
pub mod comments;
/// Extension to lexical profile registry
pub mod language;
/// One-token-per-line rewriting
pub mod tokenizer;

pub use comments::strip;
pub use language::{LanguageProfile, LanguageRegistry};
pub use tokenizer::{Tokens, tokenize};

use crate::types::TransformConfig;
use std::borrow::Cow;

/// Applies comment stripping and/or tokenization to individual files
///
/// The output for a file depends only on its path's extension, its raw
/// content and the configuration.
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    registry: LanguageRegistry,
    config: TransformConfig,
}

impl TransformPipeline {
    pub fn new(registry: LanguageRegistry, config: TransformConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> TransformConfig {
        self.config
    }

    /// Transform the content of the file at `path`
    ///
    /// Unknown extensions and content that is not valid UTF-8 come back
    /// byte-identical.
    pub fn transform<'a>(&self, path: &str, content: &'a [u8]) -> Cow<'a, [u8]> {
        if self.config.is_identity() {
            return Cow::Borrowed(content);
        }

        let profile = self.registry.profile_for_path(path);
        if profile.is_passthrough() {
            return Cow::Borrowed(content);
        }

        let Ok(text) = std::str::from_utf8(content) else {
            tracing::debug!("Passing through non UTF-8 content of {}", path);
            return Cow::Borrowed(content);
        };

        Cow::Owned(self.transform_text(text, profile).into_bytes())
    }

    fn transform_text(&self, text: &str, profile: &LanguageProfile) -> String {
        let stripped = if self.config.remove_comments {
            Cow::Owned(strip(text, profile))
        } else {
            Cow::Borrowed(text)
        };

        if self.config.tokenize {
            tokenize(&stripped, profile)
        } else {
            stripped.into_owned()
        }
    }
}
