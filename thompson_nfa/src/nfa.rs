use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::sparse_set::SparseSet;

/// A state ID in the NFA
pub type StateId = usize;

/// A character test carried by a consuming transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// `.`
    Any,
    /// A literal character
    Equals(char),
    /// `[abc]` or, when negated, `[^abc]`
    InSet { chars: Arc<[char]>, negated: bool },
    /// `\d`
    AsciiDigit,
    /// `\w`
    AsciiWord,
}

impl Predicate {
    /// Create a character class predicate from its members
    pub fn set<I: IntoIterator<Item = char>>(chars: I, negated: bool) -> Self {
        Predicate::InSet {
            chars: chars.into_iter().collect(),
            negated,
        }
    }

    /// Returns true if this predicate holds for `ch`
    #[inline]
    pub fn matches(&self, ch: char) -> bool {
        match *self {
            Predicate::Any => true,
            Predicate::Equals(c) => ch == c,
            Predicate::InSet { ref chars, negated } => chars.contains(&ch) != negated,
            Predicate::AsciiDigit => ch.is_ascii_digit(),
            Predicate::AsciiWord => ch.is_ascii_alphanumeric() || ch == '_',
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Predicate::Any => write!(f, "."),
            Predicate::Equals(c) => write!(f, "{:?}", c),
            Predicate::InSet { ref chars, negated } => {
                write!(f, "[")?;
                if negated {
                    write!(f, "^")?;
                }
                for c in chars.iter() {
                    write!(f, "{}", c.escape_debug())?;
                }
                write!(f, "]")
            }
            Predicate::AsciiDigit => write!(f, "\\d"),
            Predicate::AsciiWord => write!(f, "\\w"),
        }
    }
}

/// An edge between two states
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The character test, or `None` for an epsilon transition
    pub predicate: Option<Predicate>,
    /// The state this edge leads to
    pub target: StateId,
}

impl Transition {
    /// Create a transition that consumes no input
    pub fn epsilon(target: StateId) -> Self {
        Transition {
            predicate: None,
            target,
        }
    }

    /// Create a transition that consumes one character satisfying `predicate`
    pub fn consuming(predicate: Predicate, target: StateId) -> Self {
        Transition {
            predicate: Some(predicate),
            target,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.predicate.is_none()
    }
}

/// A Thompson NFA state: an ordered list of outgoing transitions
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    pub transitions: Vec<Transition>,
}

/// A sub-automaton delimited by a start and an accept state.
///
/// Fragments are deliberately neither `Copy` nor `Clone`. The combinators on
/// [`NFA`] consume their operands because they append transitions to the
/// operands' accept states; a second, independent copy can only be made with
/// [`NFA::clone_fragment`].
#[derive(Debug, PartialEq, Eq)]
pub struct Fragment {
    start: StateId,
    accept: StateId,
}

impl Fragment {
    fn new(start: StateId, accept: StateId) -> Self {
        Fragment { start, accept }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }
}

/// An arena of states plus the fragment recognizing the whole pattern.
///
/// States are only ever appended, so a `StateId` stays valid for the life of
/// the arena and cycles are just indices pointing backwards.
#[derive(Clone, PartialEq, Eq)]
pub struct NFA {
    states: Vec<State>,
    start: StateId,
    accept: StateId,
}

impl NFA {
    /// Create a new empty NFA
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            start: 0,
            accept: 0,
        }
    }

    /// Number of states in the arena
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Start state of the whole automaton
    pub fn start(&self) -> StateId {
        self.start
    }

    /// Accept state of the whole automaton
    pub fn accept(&self) -> StateId {
        self.accept
    }

    /// Make `fragment` the automaton searched by [`crate::Matcher::new`]
    pub fn set_root(&mut self, fragment: Fragment) {
        self.start = fragment.start;
        self.accept = fragment.accept;
    }

    /// Add a new state without transitions and return its ID
    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::default());
        self.states.len() - 1
    }

    /// Append a transition to `from`, after any it already has
    pub fn add_transition(&mut self, from: StateId, transition: Transition) {
        self.states[from].transitions.push(transition);
    }

    /// Connect two states with an epsilon transition
    fn connect(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, Transition::epsilon(to));
    }

    /// start →(ε)→ accept
    pub fn epsilon(&mut self) -> Fragment {
        let start = self.add_state();
        let accept = self.add_state();
        self.connect(start, accept);
        Fragment::new(start, accept)
    }

    /// start →(p)→ accept
    pub fn predicate(&mut self, predicate: Predicate) -> Fragment {
        let start = self.add_state();
        let accept = self.add_state();
        self.add_transition(start, Transition::consuming(predicate, accept));
        Fragment::new(start, accept)
    }

    pub fn literal(&mut self, ch: char) -> Fragment {
        self.predicate(Predicate::Equals(ch))
    }

    /// A followed by B
    pub fn concat(&mut self, a: Fragment, b: Fragment) -> Fragment {
        self.connect(a.accept, b.start);
        Fragment::new(a.start, b.accept)
    }

    /// A or B
    pub fn alternate(&mut self, a: Fragment, b: Fragment) -> Fragment {
        let start = self.add_state();
        let accept = self.add_state();

        self.connect(start, a.start);
        self.connect(start, b.start);
        self.connect(a.accept, accept);
        self.connect(b.accept, accept);

        Fragment::new(start, accept)
    }

    /// Zero or more A
    pub fn star(&mut self, a: Fragment) -> Fragment {
        let start = self.add_state();
        let accept = self.add_state();

        self.connect(start, a.start);
        self.connect(start, accept);
        // Loop back for repeated matches
        self.connect(a.accept, a.start);
        self.connect(a.accept, accept);

        Fragment::new(start, accept)
    }

    /// One or more A
    pub fn plus(&mut self, a: Fragment) -> Fragment {
        let start = self.add_state();
        let accept = self.add_state();

        self.connect(start, a.start);
        self.connect(a.accept, a.start);
        self.connect(a.accept, accept);

        Fragment::new(start, accept)
    }

    /// Zero or one A
    pub fn question(&mut self, a: Fragment) -> Fragment {
        let start = self.add_state();
        let accept = self.add_state();

        self.connect(start, a.start);
        self.connect(start, accept);
        self.connect(a.accept, accept);

        Fragment::new(start, accept)
    }

    /// Copy every state reachable from `fragment` into fresh states.
    ///
    /// Each original state is copied exactly once, no matter how many edges
    /// (including loop back-edges) reach it, and the copies' transitions point
    /// only at other copies. Predicates are shared with the original.
    pub fn clone_fragment(&mut self, fragment: &Fragment) -> Fragment {
        let mut map: HashMap<StateId, StateId> = HashMap::new();
        let mut order = Vec::new();
        let mut stack = vec![fragment.accept, fragment.start];

        while let Some(old) = stack.pop() {
            if map.contains_key(&old) {
                continue;
            }
            map.insert(old, self.add_state());
            order.push(old);
            for transition in &self.states[old].transitions {
                if !map.contains_key(&transition.target) {
                    stack.push(transition.target);
                }
            }
        }

        for old in order {
            let transitions = self.states[old]
                .transitions
                .iter()
                .map(|t| Transition {
                    predicate: t.predicate.clone(),
                    target: map[&t.target],
                })
                .collect();
            self.states[map[&old]].transitions = transitions;
        }

        Fragment::new(map[&fragment.start], map[&fragment.accept])
    }

    /// Expand `set` in place to its epsilon closure.
    ///
    /// `stack` is scratch space; its contents are discarded.
    pub fn close_over(&self, set: &mut SparseSet, stack: &mut Vec<StateId>) {
        stack.clear();
        stack.extend(set.iter());

        while let Some(state_id) = stack.pop() {
            for transition in &self.states[state_id].transitions {
                if transition.is_epsilon() && set.insert(transition.target) {
                    stack.push(transition.target);
                }
            }
        }
    }

    /// Get epsilon closure of a set of states
    pub fn epsilon_closure(&self, states: &[StateId]) -> SparseSet {
        let mut closure = SparseSet::new(self.len());
        for &id in states {
            closure.insert(id);
        }
        self.close_over(&mut closure, &mut Vec::new());
        closure
    }

    /// Replace `to` with the states reachable from `from` by consuming `ch`
    pub fn step(&self, from: &SparseSet, ch: char, to: &mut SparseSet) {
        to.clear();
        for state_id in from.iter() {
            for transition in &self.states[state_id].transitions {
                if let Some(ref predicate) = transition.predicate {
                    if predicate.matches(ch) {
                        to.insert(transition.target);
                    }
                }
            }
        }
    }
}

impl Default for NFA {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NFA(start: {}, accept: {})", self.start, self.accept)?;
        for (id, state) in self.states.iter().enumerate() {
            write!(f, "  {:>3}:", id)?;
            if state.transitions.is_empty() {
                write!(f, " -")?;
            }
            for transition in &state.transitions {
                match transition.predicate {
                    None => write!(f, " ε -> {}", transition.target)?,
                    Some(ref p) => write!(f, " {} -> {}", p, transition.target)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
