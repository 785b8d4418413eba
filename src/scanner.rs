//! Comment-aware scanning of variable-BF source.
//!
//! A comment starts at `#` and runs up to (not including) the next newline.
//! Inside a comment every character is taken literally, so variables and
//! operators there are neither substituted nor executed.

use std::str::Chars;

pub const COMMENT_START: char = '#';

/// The eight instructions of the target language.
pub const OPERATORS: [char; 8] = ['>', '<', '+', '-', '.', ',', '[', ']'];

// Fullwidth look-alikes for the operators, same order as OPERATORS
const SANITIZED: [char; 8] = ['＞', '＜', '＋', '－', '．', '，', '［', '］'];

pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

/// Replaces an operator with a look-alike that the target language ignores.
pub fn sanitize(c: char) -> char {
    match OPERATORS.iter().position(|&op| op == c) {
        Some(i) => SANITIZED[i],
        None => c,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Code,
    /// The `#` that opens (or sits inside) a comment
    CommentStart,
    Comment,
}

/// Classifies each character of a source text in a single pass.
pub struct Scanner<'a> {
    chars: Chars<'a>,
    in_comment: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Scanner {
            chars: text.chars(),
            in_comment: false,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = (char, Class);

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next()?;
        let class = if self.in_comment && c == '\n' {
            self.in_comment = false;
            Class::Code
        } else if c == COMMENT_START {
            self.in_comment = true;
            Class::CommentStart
        } else if self.in_comment {
            Class::Comment
        } else {
            Class::Code
        };
        Some((c, class))
    }
}

/// Drops every comment, including its `#`. Newlines are kept.
pub fn strip_comments(text: &str) -> String {
    Scanner::new(text)
        .filter(|&(_, class)| class == Class::Code)
        .map(|(c, _)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classes(text: &str) -> Vec<Class> {
        Scanner::new(text).map(|(_, class)| class).collect()
    }

    #[test]
    fn test_comment_runs_to_newline() {
        use Class::*;
        assert_eq!(
            classes("a#b+\nc"),
            vec![Code, CommentStart, Comment, Comment, Code, Code]
        );
    }

    #[test]
    fn test_hash_inside_comment_stays_in_comment() {
        use Class::*;
        assert_eq!(classes("#x#y"), vec![CommentStart, Comment, CommentStart, Comment]);
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("#c\na+b"), "\na+b");
        assert_eq!(strip_comments("a+ # move x>y\nb-"), "a+ \nb-");
        assert_eq!(strip_comments("x#unterminated"), "x");
        assert_eq!(strip_comments(""), "");
    }

    #[test]
    fn test_sanitize_covers_every_operator() {
        for op in OPERATORS {
            let s = sanitize(op);
            assert_ne!(s, op);
            assert!(!is_operator(s));
        }
        assert_eq!(sanitize('a'), 'a');
        assert_eq!(sanitize('#'), '#');
    }
}
