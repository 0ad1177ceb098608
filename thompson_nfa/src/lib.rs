//! Thompson NFA construction, compilation and simulation
//!
//! This library compiles a small extended-regular-expression dialect into a
//! Thompson NFA and simulates it one character at a time, tracking every
//! live parse at once. Matching is leftmost-longest and never backtracks, so
//! run time is bounded by (number of states) × (length of input).
//!
//! Supported syntax: literals, `.`, `\d`, `\w`, `\\`, `[abc]`, `[^abc]`,
//! grouping with `(...)`, alternation with `|`, and the quantifiers `*`, `+`,
//! `?`, `{n}`, `{n,}` and `{n,m}`. Line anchors `^` and `$` are not part of
//! the automaton; strip them with [`Anchors::split`] and pass them to the
//! search routines instead.
//!
//! ```
//! use thompson_nfa::{compile, find_matches, Anchors};
//!
//! let (anchors, pattern) = Anchors::split("(ab)+c");
//! let nfa = compile(pattern).unwrap();
//! let line: Vec<char> = "xxababc abc".chars().collect();
//! let spans: Vec<(usize, usize)> = find_matches(&nfa, &line, anchors)
//!     .iter()
//!     .map(|m| (m.start, m.len))
//!     .collect();
//! assert_eq!(spans, vec![(2, 5), (8, 3)]);
//! ```

#[macro_use]
mod macros;

pub mod compiler;
pub mod matcher;
pub mod nfa;
pub mod sparse_set;

pub use compiler::{Compiler, MAX_REPETITION};
pub use matcher::{Anchors, Match, Matcher};
pub use nfa::{Fragment, Predicate, State, StateId, Transition, NFA};

/// The result of compiling a pattern to a Thompson NFA
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during compilation.
///
/// Positions count characters (not bytes) from the start of the pattern
/// passed to the compiler, i.e. after anchors have been stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A complete expression was followed by more input, e.g. a stray `)`
    UnexpectedTrailingInput { ch: char, pos: usize },
    /// `(` at `pos` was never closed
    UnclosedGroup { pos: usize },
    /// `[` at `pos` was never closed
    UnclosedCharacterClass { pos: usize },
    /// `{` at `pos` was never closed
    UnclosedQuantifierBound { pos: usize },
    /// `\` at `pos` escapes something other than `d`, `w` or `\`.
    /// `ch` is `None` when the backslash ends the pattern.
    UnsupportedEscape { ch: Option<char>, pos: usize },
    /// Malformed or out of range content inside `{}`.
    /// `ch` is the offending character when there is one.
    InvalidQuantifierBound { pos: usize, ch: Option<char> },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            CompileError::UnexpectedTrailingInput { ch, pos } => {
                write!(f, "unexpected {:?} at position {}", ch, pos)
            }
            CompileError::UnclosedGroup { pos } => {
                write!(f, "unclosed '(' opened at position {}", pos)
            }
            CompileError::UnclosedCharacterClass { pos } => {
                write!(f, "unclosed '[' opened at position {}", pos)
            }
            CompileError::UnclosedQuantifierBound { pos } => {
                write!(f, "unclosed '{{' opened at position {}", pos)
            }
            CompileError::UnsupportedEscape { ch: Some(ch), pos } => {
                write!(f, "unsupported escape '\\{}' at position {}", ch, pos)
            }
            CompileError::UnsupportedEscape { ch: None, pos } => {
                write!(f, "dangling '\\' at position {}", pos)
            }
            CompileError::InvalidQuantifierBound { pos, ch: Some(ch) } => {
                write!(f, "invalid repetition bound: unexpected {:?} at position {}", ch, pos)
            }
            CompileError::InvalidQuantifierBound { pos, ch: None } => write!(
                f,
                "invalid repetition bound at position {} (bounds must satisfy n <= m <= {})",
                pos, MAX_REPETITION
            ),
        }
    }
}

impl std::error::Error for CompileError {}

/// Compile `pattern` (without line anchors) into an NFA
pub fn compile(pattern: &str) -> CompileResult<NFA> {
    Compiler::new().compile(pattern)
}

/// Find all leftmost-longest, non-overlapping matches of `nfa` in `line`
pub fn find_matches(nfa: &NFA, line: &[char], anchors: Anchors) -> Vec<Match> {
    Matcher::new(nfa).find_all(line, anchors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = compile("ab)").unwrap_err();
        assert_eq!(err.to_string(), "unexpected ')' at position 2");

        let err = compile("a\\").unwrap_err();
        assert_eq!(err.to_string(), "dangling '\\' at position 1");

        let err = compile("x{").unwrap_err();
        assert_eq!(err.to_string(), "unclosed '{' opened at position 1");
    }

    #[test]
    fn test_nfa_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NFA>();
    }

    #[test]
    fn test_find_matches_shorthand() {
        let nfa = compile("\\d+").unwrap();
        let line: Vec<char> = "a1b22c333".chars().collect();
        let found: Vec<(usize, usize)> = find_matches(&nfa, &line, Anchors::NONE)
            .into_iter()
            .map(|m| (m.start, m.len))
            .collect();
        assert_eq!(found, vec![(1, 1), (3, 2), (6, 3)]);
    }
}
