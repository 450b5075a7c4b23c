//! Lexical profile selection from file extensions

use std::collections::HashMap;

/// Punctuation kept as standalone tokens by every built-in profile
const RETAINED_PUNCTUATION: &[char] = &['#', '/', '*', '"', '\'', '(', ')', '{', '}', '[', ']'];

/// Lexical rules for one family of file extensions
#[derive(Debug)]
pub struct LanguageProfile {
    /// Human-readable family name
    pub name: &'static str,
    /// Markers starting a comment that runs to the end of the line
    pub line_comments: &'static [&'static str],
    /// (open, close) delimiters of block comments
    pub block_comments: &'static [(&'static str, &'static str)],
    /// Characters that open and close string literals
    pub string_delimiters: &'static [char],
    /// `'x'` and `'\x'` are character literals while a lone `'` is not a delimiter
    pub char_literals: bool,
    /// Characters that form word tokens
    pub is_word: fn(char) -> bool,
    /// Punctuation emitted as single-character tokens
    pub punctuation: &'static [char],
}

impl LanguageProfile {
    /// A profile with no rules at all; transforms through it are the identity
    pub fn is_passthrough(&self) -> bool {
        self.line_comments.is_empty()
            && self.block_comments.is_empty()
            && self.string_delimiters.is_empty()
            && self.punctuation.is_empty()
    }

    /// True if `c` is kept as a standalone token
    pub fn retains(&self, c: char) -> bool {
        self.punctuation.contains(&c)
    }
}

/// Letters, digits and underscore
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn never(_: char) -> bool {
    false
}

/// Identity profile used for every unknown extension
pub static PASSTHROUGH: LanguageProfile = LanguageProfile {
    name: "pass-through",
    line_comments: &[],
    block_comments: &[],
    string_delimiters: &[],
    char_literals: false,
    is_word: never,
    punctuation: &[],
};

pub static C_LIKE: LanguageProfile = LanguageProfile {
    name: "C-like",
    line_comments: &["//"],
    block_comments: &[("/*", "*/")],
    string_delimiters: &['"', '\''],
    char_literals: false,
    is_word: is_word_char,
    punctuation: RETAINED_PUNCTUATION,
};

// Single quotes are lifetimes as often as char literals, so only `"` opens a string
// and char literals are matched as whole units.
pub static RUST: LanguageProfile = LanguageProfile {
    name: "Rust",
    line_comments: &["//"],
    block_comments: &[("/*", "*/")],
    string_delimiters: &['"'],
    char_literals: true,
    is_word: is_word_char,
    punctuation: RETAINED_PUNCTUATION,
};

pub static HASH_COMMENT: LanguageProfile = LanguageProfile {
    name: "hash-comment",
    line_comments: &["#"],
    block_comments: &[],
    string_delimiters: &['"', '\''],
    char_literals: false,
    is_word: is_word_char,
    punctuation: RETAINED_PUNCTUATION,
};

/// Built-in profile for an extension, case-sensitive
pub fn builtin_profile(extension: &str) -> Option<&'static LanguageProfile> {
    let profile = match extension {
        "c" | "h" | "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" | "inl" | "m" | "mm" => &C_LIKE,
        "java" | "cs" | "go" | "kt" | "kts" | "scala" | "swift" => &C_LIKE,
        "js" | "jsm" | "mjs" | "cjs" | "jsx" | "ts" | "tsx" => &C_LIKE,
        "idl" | "webidl" | "ipdl" => &C_LIKE,
        "rs" => &RUST,
        "py" | "sh" | "bash" | "pl" | "pm" | "rb" | "yaml" | "yml" | "toml" | "cmake" => {
            &HASH_COMMENT
        }
        _ => return None,
    };

    Some(profile)
}

/// Extension of a path: the text after the final `.` of its last component
pub fn extension_of(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Maps extensions to profiles, falling back to [`PASSTHROUGH`]
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    aliases: HashMap<String, &'static LanguageProfile>,
}

impl LanguageRegistry {
    /// Registry with only the built-in table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry where each alias extension reuses the profile of a built-in extension
    ///
    /// Returns the first alias target that is not a built-in extension as the error.
    pub fn with_aliases<'a, I>(aliases: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut registry = Self::new();
        for (alias, target) in aliases {
            let profile = builtin_profile(target).ok_or_else(|| target.clone())?;
            registry.aliases.insert(alias.clone(), profile);
        }
        Ok(registry)
    }

    /// Profile for an extension; unknown extensions get [`PASSTHROUGH`]
    pub fn profile_for(&self, extension: &str) -> &'static LanguageProfile {
        builtin_profile(extension)
            .or_else(|| self.aliases.get(extension).copied())
            .unwrap_or(&PASSTHROUGH)
    }

    /// Profile for a repository path, by its extension
    pub fn profile_for_path(&self, path: &str) -> &'static LanguageProfile {
        match extension_of(path) {
            Some(ext) => self.profile_for(ext),
            None => &PASSTHROUGH,
        }
    }
}
