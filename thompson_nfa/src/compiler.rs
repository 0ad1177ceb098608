use crate::nfa::{Fragment, Predicate, NFA};
use crate::{CompileError, CompileResult};

/// Largest count accepted inside a `{n,m}` bound.
///
/// Every counted repetition is expanded into copies of its operand, so this
/// caps how far a single quantifier can grow the automaton.
pub const MAX_REPETITION: u32 = 1000;

/// Compiler that parses a pattern and builds a Thompson NFA from it.
///
/// The grammar, parsed by recursive descent with one character of lookahead:
///
/// ```text
/// expression := term ('|' term)*
/// term       := factor*
/// factor     := atom ('*' | '+' | '?' | '{' bound '}')?
/// bound      := N | N ',' | N ',' M
/// atom       := '(' expression ')' | '.' | '\' ('d' | 'w' | '\') | class | literal
/// class      := '[' '^'? char* ']'
/// ```
pub struct Compiler {
    nfa: NFA,
    pattern: Vec<char>,
    pos: usize,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self {
            nfa: NFA::new(),
            pattern: Vec::new(),
            pos: 0,
        }
    }

    /// Compile `pattern` to a Thompson NFA.
    ///
    /// Line anchors are not recognized here; a leading `^` or trailing `$`
    /// is matched literally.
    pub fn compile(mut self, pattern: &str) -> CompileResult<NFA> {
        self.pattern = pattern.chars().collect();
        self.pos = 0;

        let fragment = self.parse_expression()?;
        if let Some(ch) = self.peek() {
            return Err(CompileError::UnexpectedTrailingInput { ch, pos: self.pos });
        }
        self.nfa.set_root(fragment);

        debug!("compiled {:?} into {} states", pattern, self.nfa.len());
        trace!("{:?}", self.nfa);
        Ok(self.nfa)
    }

    fn peek(&self) -> Option<char> {
        self.pattern.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() != Some(ch) {
            return false;
        }
        self.pos += 1;
        true
    }

    /// term ('|' term)*, folded left
    fn parse_expression(&mut self) -> CompileResult<Fragment> {
        let mut left = self.parse_term()?;
        while self.eat('|') {
            let right = self.parse_term()?;
            left = self.nfa.alternate(left, right);
        }
        Ok(left)
    }

    /// A possibly empty run of factors, ending at ')' or '|' or end of input
    fn parse_term(&mut self) -> CompileResult<Fragment> {
        let mut term: Option<Fragment> = None;

        while let Some(ch) = self.peek() {
            if ch == ')' || ch == '|' {
                break;
            }
            let factor = self.parse_factor()?;
            term = Some(match term {
                None => factor,
                Some(left) => self.nfa.concat(left, factor),
            });
        }

        Ok(match term {
            Some(term) => term,
            None => self.nfa.epsilon(),
        })
    }

    /// An atom and at most one quantifier
    fn parse_factor(&mut self) -> CompileResult<Fragment> {
        let atom = self.parse_atom()?;

        let fragment = match self.peek() {
            Some('*') => {
                self.pos += 1;
                self.nfa.star(atom)
            }
            Some('+') => {
                self.pos += 1;
                self.nfa.plus(atom)
            }
            Some('?') => {
                self.pos += 1;
                self.nfa.question(atom)
            }
            Some('{') => {
                let open = self.pos;
                self.pos += 1;
                let (min, max) = self.parse_bound(open)?;
                self.compile_counted(atom, min, max)
            }
            _ => atom,
        };
        Ok(fragment)
    }

    fn parse_atom(&mut self) -> CompileResult<Fragment> {
        let pos = self.pos;
        let Some(ch) = self.bump() else {
            return Ok(self.nfa.epsilon());
        };

        match ch {
            '(' => {
                let expression = self.parse_expression()?;
                if !self.eat(')') {
                    return Err(CompileError::UnclosedGroup { pos });
                }
                Ok(expression)
            }
            '.' => Ok(self.nfa.predicate(Predicate::Any)),
            '\\' => match self.bump() {
                Some('d') => Ok(self.nfa.predicate(Predicate::AsciiDigit)),
                Some('w') => Ok(self.nfa.predicate(Predicate::AsciiWord)),
                Some('\\') => Ok(self.nfa.literal('\\')),
                ch => Err(CompileError::UnsupportedEscape { ch, pos }),
            },
            '[' => self.parse_class(pos),
            ch => Ok(self.nfa.literal(ch)),
        }
    }

    /// Everything up to the next ']' is a member; no ranges, no escapes
    fn parse_class(&mut self, open: usize) -> CompileResult<Fragment> {
        let negated = self.eat('^');
        let mut chars = Vec::new();

        loop {
            match self.bump() {
                Some(']') => break,
                Some(ch) => chars.push(ch),
                None => return Err(CompileError::UnclosedCharacterClass { pos: open }),
            }
        }

        Ok(self.nfa.predicate(Predicate::set(chars, negated)))
    }

    /// Parse the inside of `{...}`, leaving the cursor after the '}'.
    ///
    /// Returns `(n, Some(m))` for `{n,m}` and `{n}` (as `m == n`), and
    /// `(n, None)` for the unbounded `{n,}`.
    fn parse_bound(&mut self, open: usize) -> CompileResult<(u32, Option<u32>)> {
        let close = match self.pattern[self.pos..].iter().position(|&c| c == '}') {
            Some(offset) => self.pos + offset,
            None => return Err(CompileError::UnclosedQuantifierBound { pos: open }),
        };

        let mut at = self.pos;
        let min = self.parse_count(&mut at, close)?;
        let max = if at < close && self.pattern[at] == ',' {
            at += 1;
            if at == close {
                None
            } else {
                Some(self.parse_count(&mut at, close)?)
            }
        } else {
            Some(min)
        };

        if at != close {
            return Err(CompileError::InvalidQuantifierBound {
                pos: at,
                ch: Some(self.pattern[at]),
            });
        }
        if matches!(max, Some(max) if max < min) {
            return Err(CompileError::InvalidQuantifierBound { pos: open, ch: None });
        }

        self.pos = close + 1;
        Ok((min, max))
    }

    /// A run of ASCII digits starting at `*at` and ending before `end`
    fn parse_count(&self, at: &mut usize, end: usize) -> CompileResult<u32> {
        let start = *at;
        let mut value: u32 = 0;

        while *at < end {
            let Some(digit) = self.pattern[*at].to_digit(10) else {
                break;
            };
            value = value.saturating_mul(10).saturating_add(digit);
            *at += 1;
        }

        if *at == start {
            return Err(CompileError::InvalidQuantifierBound {
                pos: start,
                ch: self.pattern.get(start).copied(),
            });
        }
        if value > MAX_REPETITION {
            return Err(CompileError::InvalidQuantifierBound { pos: start, ch: None });
        }
        Ok(value)
    }

    /// Compile counted repetition {n}, {n,} and {n,m}.
    ///
    /// `min` required copies are followed either by one starred copy
    /// (unbounded) or by `max - min` separately optional copies. Every copy
    /// is cloned from the untouched atom before any of them is wired up.
    fn compile_counted(&mut self, atom: Fragment, min: u32, max: Option<u32>) -> Fragment {
        let optional = match max {
            Some(max) => max - min,
            None => 1,
        };
        let total = (min + optional) as usize;
        if total == 0 {
            return self.nfa.epsilon();
        }

        let mut copies = Vec::with_capacity(total);
        copies.push(atom);
        for _ in 1..total {
            let copy = self.nfa.clone_fragment(&copies[0]);
            copies.push(copy);
        }

        let mut result: Option<Fragment> = None;
        for (i, copy) in copies.into_iter().enumerate() {
            let piece = if i < min as usize {
                copy
            } else if max.is_none() {
                self.nfa.star(copy)
            } else {
                self.nfa.question(copy)
            };
            result = Some(match result {
                None => piece,
                Some(left) => self.nfa.concat(left, piece),
            });
        }

        match result {
            Some(fragment) => fragment,
            None => self.nfa.epsilon(),
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
