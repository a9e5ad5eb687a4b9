use std::collections::BTreeSet;

use tracing::trace;

use super::{AutomatonError, AutomatonKind, FiniteAutomaton, Semantics, StateId};
use crate::{alphabet::EPSILON, Show};

/// Transitions of an [`ENFA`] lead to a set of states, epsilon transitions are allowed.
#[derive(Clone, Copy, Default, Hash, Eq, PartialEq)]
pub struct ENFASemantics;

impl std::fmt::Debug for ENFASemantics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ENFA (set of targets, epsilon moves)")
    }
}

impl Semantics for ENFASemantics {
    type Target = BTreeSet<StateId>;
    const KIND: AutomatonKind = AutomatonKind::Enfa;
    const EPSILON_TRANSITIONS: bool = true;

    fn targets(target: &Self::Target) -> impl Iterator<Item = &StateId> + '_ {
        target.iter()
    }
}

/// A nondeterministic finite automaton with epsilon transitions (ENFA). Transitions on [`EPSILON`] can be
/// taken at any time without reading input.
pub type ENFA = FiniteAutomaton<ENFASemantics>;

impl ENFA {
    /// Computes the epsilon-closure of `states`, i.e. the smallest superset that contains every state
    /// reachable through zero or more epsilon transitions. Uses an explicit stack and terminates
    /// on epsilon cycles, since every state is pushed at most once.
    pub fn epsilon_closure<'a, I>(&self, states: I) -> Result<BTreeSet<StateId>, AutomatonError>
    where
        I: IntoIterator<Item = &'a StateId>,
    {
        let mut closure = BTreeSet::new();
        let mut stack = vec![];
        for q in states {
            if closure.insert(q.clone()) {
                stack.push(q.clone());
            }
        }

        while let Some(q) = stack.pop() {
            for p in self.declared_targets(&q, EPSILON)? {
                if closure.insert(p.clone()) {
                    stack.push(p.clone());
                }
            }
        }
        trace!("epsilon closure is {}", closure.show());
        Ok(closure)
    }
}
