//! Comment removal that keeps every line terminator in place
//!
//! The scanner is a small state machine over the input. String literals are
//! tracked so that comment markers inside them are left alone, and every
//! `\n` (with a preceding `\r`, if any) is copied through even from inside a
//! comment, so the output has exactly as many lines as the input.

use super::language::LanguageProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InString(char),
    InLineComment,
    InBlockComment(&'static str),
}

/// Comment opener found at the current position
enum Opener {
    Line(&'static str),
    Block(&'static str, &'static str),
}

impl Opener {
    fn len(&self) -> usize {
        match self {
            Opener::Line(marker) => marker.len(),
            Opener::Block(open, _) => open.len(),
        }
    }
}

/// Longest comment opener that `rest` starts with
fn find_opener(rest: &str, profile: &LanguageProfile) -> Option<Opener> {
    let line = profile
        .line_comments
        .iter()
        .copied()
        .filter(|marker| rest.starts_with(*marker))
        .map(Opener::Line);
    let block = profile
        .block_comments
        .iter()
        .copied()
        .filter(|(open, _)| rest.starts_with(*open))
        .map(|(open, close)| Opener::Block(open, close));

    line.chain(block).max_by_key(Opener::len)
}

/// True for `\n`, and for a `\r` that starts a `\r\n` pair
fn is_line_break(rest: &str) -> bool {
    rest.starts_with('\n') || rest.starts_with("\r\n")
}

/// Byte length of the character literal `rest` starts with, if any
///
/// Accepts `'x'` and escapes such as `'\''`, `'\n'` or `'\u{1F600}'`; a
/// lifetime like `'a` is not a literal.
fn char_literal_len(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    if chars.next()?.1 != '\'' {
        return None;
    }
    match chars.next()? {
        (_, '\\') => {
            chars.next()?;
            chars
                .take_while(|(_, c)| *c != '\n')
                .take(10)
                .find(|(_, c)| *c == '\'')
                .map(|(i, _)| i + 1)
        }
        (_, '\'' | '\n') => None,
        (_, _) => match chars.next()? {
            (i, '\'') => Some(i + 1),
            _ => None,
        },
    }
}

/// Remove comments from `text` according to `profile`
///
/// Comment text (including the markers) is dropped, line terminators are
/// kept, and everything else is copied through unchanged. An unterminated
/// string or comment simply runs to the end of the input.
pub fn strip(text: &str, profile: &LanguageProfile) -> String {
    if profile.is_passthrough() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Normal;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        match state {
            State::Normal => {
                if let Some(opener) = find_opener(rest, profile) {
                    rest = &rest[opener.len()..];
                    state = match opener {
                        Opener::Line(_) => State::InLineComment,
                        Opener::Block(_, close) => State::InBlockComment(close),
                    };
                    continue;
                }
                if profile.char_literals
                    && let Some(len) = char_literal_len(rest)
                {
                    out.push_str(&rest[..len]);
                    rest = &rest[len..];
                    continue;
                }
                if profile.string_delimiters.contains(&c) {
                    state = State::InString(c);
                }
                out.push(c);
            }
            State::InString(delimiter) => {
                out.push(c);
                if c == '\\' {
                    rest = &rest[c.len_utf8()..];
                    if let Some(escaped) = rest.chars().next() {
                        out.push(escaped);
                        rest = &rest[escaped.len_utf8()..];
                    }
                    continue;
                }
                if c == delimiter {
                    state = State::Normal;
                }
            }
            State::InLineComment => {
                if is_line_break(rest) {
                    out.push(c);
                }
                if c == '\n' {
                    state = State::Normal;
                }
            }
            State::InBlockComment(close) => {
                if rest.starts_with(close) {
                    rest = &rest[close.len()..];
                    state = State::Normal;
                    continue;
                }
                if is_line_break(rest) {
                    out.push(c);
                }
            }
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}
