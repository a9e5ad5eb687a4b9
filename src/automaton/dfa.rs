use super::{FiniteAutomaton, MalformedAutomaton, Semantics, StateId};
use crate::automaton::AutomatonKind;

/// Transitions of a [`DFA`] lead to a single state.
#[derive(Clone, Copy, Default, Hash, Eq, PartialEq)]
pub struct DFASemantics;

impl std::fmt::Debug for DFASemantics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DFA (single target)")
    }
}

impl Semantics for DFASemantics {
    type Target = StateId;
    const KIND: AutomatonKind = AutomatonKind::Dfa;
    const EPSILON_TRANSITIONS: bool = false;

    fn targets(target: &Self::Target) -> impl Iterator<Item = &StateId> + '_ {
        std::iter::once(target)
    }

    fn validate(automaton: &FiniteAutomaton<Self>) -> Result<(), MalformedAutomaton> {
        if let Some(symbol) = automaton
            .alphabet
            .universe()
            .find(|sym| sym.chars().count() != 1)
        {
            return Err(MalformedAutomaton::MultiCharacterSymbol(symbol.clone()));
        }
        for (origin, row) in &automaton.transitions {
            for (symbol, target) in row {
                if !automaton.states.contains(target) {
                    return Err(MalformedAutomaton::UnknownTransitionTarget {
                        origin: origin.clone(),
                        symbol: symbol.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A deterministic finite automaton (DFA) reads its input one character at a time, every state has at most one
/// successor per symbol. It accepts a word if it reads the word entirely and ends up in a final state.
pub type DFA = FiniteAutomaton<DFASemantics>;

impl DFA {
    /// Returns the successor of `state` on `symbol`, if there is one.
    pub fn successor(&self, state: &str, symbol: &str) -> Option<&StateId> {
        self.target(state, symbol)
    }

    /// Returns the final states.
    pub fn accepting_states(&self) -> impl Iterator<Item = &StateId> + '_ {
        self.final_states.iter()
    }

    /// Returns the states that are not final.
    pub fn rejecting_states(&self) -> impl Iterator<Item = &StateId> + '_ {
        self.states.iter().filter(|q| !self.final_states.contains(*q))
    }

    /// Returns `true` if every state has a successor on every symbol.
    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|q| {
            self.alphabet
                .universe()
                .all(|sym| self.successor(q, sym).is_some())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::scenario_a_dfa};

    #[test]
    fn successors_and_completeness() {
        let dfa = scenario_a_dfa();
        assert_eq!(dfa.successor("q0", "1"), Some(&"q1".to_string()));
        assert_eq!(dfa.successor("q0", "2"), None);
        assert!(dfa.is_complete());
        assert_eq!(dfa.accepting_states().collect::<Vec<_>>(), vec!["q1"]);
        assert_eq!(dfa.rejecting_states().collect::<Vec<_>>(), vec!["q0"]);

        let partial = DFA::builder()
            .with_states(["p", "q"])
            .with_alphabet(["a"])
            .with_edges([("p", "a", "q")])
            .into_dfa("p")
            .unwrap();
        assert!(!partial.is_complete());
    }

    #[test]
    fn dfa_symbols_are_single_characters() {
        let result = DFA::builder()
            .with_states(["p"])
            .with_alphabet(["ab"])
            .into_dfa("p");
        assert_eq!(
            result,
            Err(MalformedAutomaton::MultiCharacterSymbol("ab".into()).into())
        );
    }

    #[test]
    fn dfa_targets_must_be_declared() {
        let result = DFA::builder()
            .with_states(["p"])
            .with_alphabet(["a"])
            .with_edges([("p", "a", "r")])
            .into_dfa("p");
        assert!(matches!(
            result,
            Err(AutomatonError::MalformedAutomaton(
                MalformedAutomaton::UnknownTransitionTarget { .. }
            ))
        ));
    }
}
