use std::ops::Range;

use crate::nfa::{Fragment, StateId, NFA};
use crate::sparse_set::SparseSets;

/// Line anchors stripped from a pattern before compilation.
///
/// Anchors steer where the matcher looks; they never become part of the
/// automaton.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anchors {
    /// The pattern started with `^`
    pub start: bool,
    /// The pattern ended with `$`
    pub end: bool,
}

impl Anchors {
    pub const NONE: Anchors = Anchors {
        start: false,
        end: false,
    };

    /// Strip a leading `^` and a trailing `$` from `pattern`.
    ///
    /// A trailing `$` preceded by an odd number of backslashes is escaped
    /// and stays in the pattern.
    pub fn split(pattern: &str) -> (Anchors, &str) {
        let mut anchors = Anchors::NONE;
        let mut rest = pattern;

        if let Some(stripped) = rest.strip_prefix('^') {
            anchors.start = true;
            rest = stripped;
        }
        if let Some(stripped) = rest.strip_suffix('$') {
            let backslashes = stripped.chars().rev().take_while(|&c| c == '\\').count();
            if backslashes % 2 == 0 {
                anchors.end = true;
                rest = stripped;
            }
        }

        (anchors, rest)
    }
}

/// A match span, in characters, within one line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub len: usize,
}

impl Match {
    pub fn new(start: usize, len: usize) -> Self {
        Match { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// A matcher that simulates a Thompson NFA against input.
///
/// All alternatives are tracked at once in a set of live states, so every
/// query runs in time proportional to (states × input length). The state
/// sets are owned by the matcher and reused between calls; create one
/// matcher per thread.
pub struct Matcher<'a> {
    nfa: &'a NFA,
    start: StateId,
    accept: StateId,
    sets: SparseSets,
    stack: Vec<StateId>,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the whole automaton compiled into `nfa`
    pub fn new(nfa: &'a NFA) -> Self {
        Self::with_root(nfa, nfa.start(), nfa.accept())
    }

    /// Create a matcher for one fragment of `nfa`
    pub fn for_fragment(nfa: &'a NFA, fragment: &Fragment) -> Self {
        Self::with_root(nfa, fragment.start(), fragment.accept())
    }

    fn with_root(nfa: &'a NFA, start: StateId, accept: StateId) -> Self {
        Self {
            nfa,
            start,
            accept,
            sets: SparseSets::new(nfa.len()),
            stack: Vec::new(),
        }
    }

    /// Length of the longest prefix of `haystack` the automaton accepts
    pub fn longest_match(&mut self, haystack: &[char]) -> Option<usize> {
        self.walk(haystack, true)
    }

    /// Length of the shortest prefix of `haystack` the automaton accepts
    pub fn shortest_match(&mut self, haystack: &[char]) -> Option<usize> {
        self.walk(haystack, false)
    }

    /// Check if the entire input matches
    pub fn is_full_match(&mut self, haystack: &[char]) -> bool {
        self.longest_match(haystack) == Some(haystack.len())
    }

    /// Run the automaton from position 0 of `haystack`, recording where the
    /// accept state is live. Stops at the first such position unless
    /// `longest` is set, and always stops once no state is live.
    fn walk(&mut self, haystack: &[char], longest: bool) -> Option<usize> {
        if self.nfa.is_empty() {
            return None;
        }
        let (nfa, start, accept) = (self.nfa, self.start, self.accept);
        let sets = &mut self.sets;
        let stack = &mut self.stack;

        sets.curr.clear();
        sets.curr.insert(start);
        nfa.close_over(&mut sets.curr, stack);

        let mut best = None;
        if sets.curr.contains(accept) {
            best = Some(0);
            if !longest {
                return best;
            }
        }

        for (i, &ch) in haystack.iter().enumerate() {
            nfa.step(&sets.curr, ch, &mut sets.next);
            nfa.close_over(&mut sets.next, stack);
            sets.swap();

            if sets.curr.is_empty() {
                break;
            }
            if sets.curr.contains(accept) {
                best = Some(i + 1);
                if !longest {
                    break;
                }
            }
        }

        best
    }

    /// Returns true if `line` contains a match.
    ///
    /// Unlike [`Matcher::find`] this stops at the first accepting position
    /// instead of looking for the longest match.
    pub fn is_match(&mut self, line: &[char], anchors: Anchors) -> bool {
        let attempt = |matcher: &mut Self, rest: &[char]| {
            if anchors.end {
                matcher.is_full_match(rest)
            } else {
                matcher.shortest_match(rest).is_some()
            }
        };

        if anchors.start {
            return attempt(self, line);
        }
        (0..=line.len()).any(|start| attempt(self, &line[start..]))
    }

    /// Find the leftmost match in `line`, reported with its longest length
    pub fn find(&mut self, line: &[char], anchors: Anchors) -> Option<Match> {
        self.find_from(line, 0, anchors)
    }

    /// Find the leftmost match starting at or after `from`
    fn find_from(&mut self, line: &[char], from: usize, anchors: Anchors) -> Option<Match> {
        if anchors.start {
            if from > 0 {
                return None;
            }
            let len = self.longest_match(line)?;
            if anchors.end && len != line.len() {
                return None;
            }
            return Some(Match::new(0, len));
        }

        for start in from..=line.len() {
            let rest = &line[start..];
            match self.longest_match(rest) {
                Some(len) if !anchors.end || len == rest.len() => {
                    return Some(Match::new(start, len));
                }
                _ => {}
            }
        }

        None
    }

    /// Find all non-overlapping matches in `line`, left to right.
    ///
    /// Each match is the leftmost one at or after the end of the previous
    /// match, with its longest length. After an empty match the scan resumes
    /// one character further on. A start-anchored search makes exactly one
    /// attempt, at offset 0.
    pub fn find_all(&mut self, line: &[char], anchors: Anchors) -> Vec<Match> {
        if anchors.start {
            return self.find(line, anchors).into_iter().collect();
        }

        let mut matches = Vec::new();
        let mut pos = 0;

        while pos <= line.len() {
            let Some(m) = self.find_from(line, pos, anchors) else {
                break;
            };
            pos = if m.is_empty() { m.start + 1 } else { m.end() };
            matches.push(m);
        }

        trace!("{} matches in a line of {} chars", matches.len(), line.len());
        matches
    }
}
