use std::collections::BTreeSet;

use super::{AutomatonKind, FiniteAutomaton, Semantics, StateId};

/// Transitions of an [`NFA`] lead to a set of states.
#[derive(Clone, Copy, Default, Hash, Eq, PartialEq)]
pub struct NFASemantics;

impl std::fmt::Debug for NFASemantics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NFA (set of targets)")
    }
}

impl Semantics for NFASemantics {
    type Target = BTreeSet<StateId>;
    const KIND: AutomatonKind = AutomatonKind::Nfa;
    const EPSILON_TRANSITIONS: bool = false;

    fn targets(target: &Self::Target) -> impl Iterator<Item = &StateId> + '_ {
        target.iter()
    }
}

/// A nondeterministic finite automaton (NFA) maps every state and symbol to a set of successors. Its symbols
/// may span several characters, it accepts a word if one of the states that are active after reading the word
/// is final.
pub type NFA = FiniteAutomaton<NFASemantics>;

impl NFA {
    /// Returns the successors of `state` on `symbol`, which is empty if there is no transition.
    pub fn successors(&self, state: &str, symbol: &str) -> impl Iterator<Item = &StateId> + '_ {
        self.target(state, symbol).into_iter().flatten()
    }
}
