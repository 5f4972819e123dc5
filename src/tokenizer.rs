//! Splitting of caret buffer content into tokens.
//!
//! Separators are consumed by the split. Closers produce zero-width split
//! points on both sides, so each closer ends up as a token of its own.
//! Splitting is a sticky scan over character boundaries: at each
//! position the separator pattern is tried first, then the closer split
//! points. A zero-width split where the previous piece ended is skipped,
//! which keeps leading closers from producing an empty first piece.
//!
//! ```
//! use formula::tokenizer::Tokenizer;
//!
//! let tokenizer = Tokenizer::new(&[" ".to_string()], "+-").unwrap();
//! assert_eq!(tokenizer.split("1+2 x"), vec!["1", "+", "2", "x"]);
//! ```

use std::borrow::Cow;

use regex::Regex;

use crate::error::FormulaResult;

/// Key name of the Enter separator.
pub const ENTER: &str = "Enter";

/// Map a configured separator to the text it matches.
///
/// `"Enter"` is the Enter key; in pasted or added text it is a line feed.
pub fn separator_text(separator: &str) -> Cow<'_, str> {
    if separator == ENTER {
        Cow::Borrowed("\n")
    } else {
        Cow::Borrowed(separator)
    }
}

/// Compiled split rules for one formula input.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Anchored alternation of all escaped separators.
    separators: Option<Regex>,
    closers: Vec<char>,
}

impl Tokenizer {
    /// Build the split rules from configured separators and closers.
    ///
    /// Empty separators are ignored.
    pub fn new(separators: &[String], closers: &str) -> FormulaResult<Self> {
        let alternatives: Vec<String> = separators
            .iter()
            .map(|separator| separator_text(separator))
            .filter(|text| !text.is_empty())
            .map(|text| regex::escape(&text))
            .collect();

        let separators = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("^(?:{})", alternatives.join("|")))?)
        };

        Ok(Self {
            separators,
            closers: closers.chars().collect(),
        })
    }

    /// Whether `c` is a configured closer.
    pub fn is_closer(&self, c: char) -> bool {
        self.closers.contains(&c)
    }

    /// Configured closers in declaration order.
    pub fn closers(&self) -> &[char] {
        &self.closers
    }

    /// Split `content` into token texts.
    ///
    /// Adjacent triggers yield empty pieces; they are kept. An empty
    /// input yields a single empty piece, so callers must not split an
    /// empty buffer.
    pub fn split<'a>(&self, content: &'a str) -> Vec<&'a str> {
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut position = 0;

        while position < content.len() {
            match self.split_end_at(content, position) {
                Some(end) if end != start => {
                    pieces.push(&content[start..position]);
                    start = end;
                    position = end;
                }
                _ => {
                    position += content[position..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                }
            }
        }

        pieces.push(&content[start..]);
        pieces
    }

    /// End offset of a split match starting exactly at `position`.
    fn split_end_at(&self, content: &str, position: usize) -> Option<usize> {
        if let Some(pattern) = &self.separators {
            if let Some(found) = pattern.find(&content[position..]) {
                return Some(position + found.end());
            }
        }

        let after_closer = content[..position]
            .chars()
            .next_back()
            .is_some_and(|c| self.is_closer(c));
        let before_closer = content[position..]
            .chars()
            .next()
            .is_some_and(|c| self.is_closer(c));

        (after_closer || before_closer).then_some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_tokenizer() -> Tokenizer {
        Tokenizer::new(&[" ".to_string(), ENTER.to_string()], "+-*/()%^").unwrap()
    }

    #[test]
    fn test_plain_content_is_one_piece() {
        assert_eq!(default_tokenizer().split("price"), vec!["price"]);
    }

    #[test]
    fn test_closers_stand_alone() {
        let tokenizer = default_tokenizer();
        assert_eq!(tokenizer.split("1+2"), vec!["1", "+", "2"]);
        assert_eq!(tokenizer.split("+"), vec!["+"]);
        assert_eq!(tokenizer.split("a+"), vec!["a", "+"]);
        assert_eq!(tokenizer.split("+a"), vec!["+", "a"]);
        assert_eq!(tokenizer.split("++"), vec!["+", "+"]);
        assert_eq!(tokenizer.split("(a*b)"), vec!["(", "a", "*", "b", ")"]);
    }

    #[test]
    fn test_separators_are_consumed() {
        let tokenizer = default_tokenizer();
        assert_eq!(tokenizer.split("a b"), vec!["a", "b"]);
        assert_eq!(tokenizer.split("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_adjacent_separators_keep_empty_pieces() {
        let tokenizer = default_tokenizer();
        assert_eq!(tokenizer.split("a  b"), vec!["a", "", "b"]);
        assert_eq!(tokenizer.split(" a"), vec!["", "a"]);
        assert_eq!(tokenizer.split("a "), vec!["a", ""]);
    }

    #[test]
    fn test_separator_next_to_closer() {
        let tokenizer = default_tokenizer();
        assert_eq!(tokenizer.split("a +"), vec!["a", "+"]);
        assert_eq!(tokenizer.split("+ a"), vec!["+", "a"]);
        assert_eq!(tokenizer.split("1 + 2"), vec!["1", "+", "2"]);
    }

    #[test]
    fn test_regex_metacharacters_are_escaped() {
        let tokenizer = Tokenizer::new(&[".".to_string(), "|".to_string()], "$").unwrap();
        assert_eq!(tokenizer.split("a.b|c$d"), vec!["a", "b", "c", "$", "d"]);
    }

    #[test]
    fn test_multichar_separator() {
        let tokenizer = Tokenizer::new(&[", ".to_string()], "").unwrap();
        assert_eq!(tokenizer.split("a, b,c"), vec!["a", "b,c"]);
    }

    #[test]
    fn test_empty_separators_ignored() {
        let tokenizer = Tokenizer::new(&[String::new()], "+").unwrap();
        assert_eq!(tokenizer.split("ab+c"), vec!["ab", "+", "c"]);
    }

    #[test]
    fn test_multibyte_content() {
        let tokenizer = Tokenizer::new(&[" ".to_string()], "×").unwrap();
        assert_eq!(tokenizer.split("prix×qté é"), vec!["prix", "×", "qté", "é"]);
    }

    #[test]
    fn test_enter_is_not_literal() {
        let tokenizer = default_tokenizer();
        assert_eq!(tokenizer.split("Enter"), vec!["Enter"]);
        assert_eq!(separator_text(ENTER), "\n");
        assert_eq!(separator_text(" "), " ");
    }

    #[test]
    fn test_is_closer() {
        let tokenizer = default_tokenizer();
        assert!(tokenizer.is_closer('%'));
        assert!(!tokenizer.is_closer('a'));
        assert_eq!(tokenizer.closers().len(), 8);
    }
}
