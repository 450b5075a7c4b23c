//! One-token-per-line rewriting

use super::language::LanguageProfile;

/// Iterator over the tokens of a text under a profile
///
/// A token is a maximal run of word characters or a single retained
/// punctuation character. Everything else separates tokens.
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
    profile: &'a LanguageProfile,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str, profile: &'a LanguageProfile) -> Self {
        Self {
            text,
            pos: 0,
            profile,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let is_word = self.profile.is_word;

        while let Some(c) = self.text[self.pos..].chars().next() {
            let start = self.pos;
            self.pos += c.len_utf8();

            if is_word(c) {
                let run = self.text[self.pos..]
                    .find(|c: char| !is_word(c))
                    .unwrap_or(self.text.len() - self.pos);
                self.pos += run;
                return Some(&self.text[start..self.pos]);
            }
            if self.profile.retains(c) {
                return Some(&self.text[start..self.pos]);
            }
        }

        None
    }
}

/// Rewrite `text` as one token per line, each followed by `\n`
///
/// The original line structure is discarded. The pass-through profile
/// returns the input unchanged.
pub fn tokenize(text: &str, profile: &LanguageProfile) -> String {
    if profile.is_passthrough() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() * 2);
    for token in Tokens::new(text, profile) {
        out.push_str(token);
        out.push('\n');
    }
    out
}
