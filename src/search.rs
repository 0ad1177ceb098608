use std::io;

use anyhow::Context;
use thompson_nfa::{Anchors, Matcher, NFA};

use crate::input;
use crate::printer::Printer;

/// A pattern compiled once and searched against every line of every input
pub struct Searcher {
    nfa: NFA,
    anchors: Anchors,
}

impl Searcher {
    pub fn new(pattern: &str) -> anyhow::Result<Searcher> {
        let (anchors, body) = Anchors::split(pattern);
        let nfa = thompson_nfa::compile(body)
            .with_context(|| format!("invalid pattern {:?}", pattern))?;
        log::debug!("pattern {:?}: {:?}, {} states", pattern, anchors, nfa.len());
        Ok(Searcher { nfa, anchors })
    }

    /// Search `haystack` line by line, printing what matches.
    /// Returns the number of matching lines.
    pub fn search(&self, label: &str, haystack: &[u8], printer: &mut Printer) -> io::Result<u64> {
        let mut matcher = Matcher::new(&self.nfa);
        let wants_spans = printer.wants_spans();
        let mut count = 0;

        for line in input::lines(haystack) {
            let line: Vec<char> = String::from_utf8_lossy(line).chars().collect();
            if wants_spans {
                let matches = matcher.find_all(&line, self.anchors);
                if matches.is_empty() {
                    continue;
                }
                printer.print(label, &line, &matches)?;
            } else {
                if !matcher.is_match(&line, self.anchors) {
                    continue;
                }
                printer.print(label, &line, &[])?;
            }
            count += 1;
        }

        Ok(count)
    }
}
