use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

use super::{
    Automaton, AutomatonError, AutomatonKind, FiniteAutomaton, MalformedAutomaton, Semantics,
    StateId, Transitions, DFA, ENFA, NFA,
};
use crate::alphabet::{is_epsilon, Alphabet, Symbol, EPSILON};

/// Helper struct for the construction of automata. It stores the declared states, the alphabet, a list of
/// edges and the final states; all of it is validated when the builder is finished.
///
/// # Example
///
/// We want to create a DFA with two states `q0` and `q1` over the alphabet `{0, 1}`, where reading `1`
/// always leads to `q1` and reading `0` always leads to `q0`. Further, `q0` should be initial and `q1`
/// should be final.
/// ```
/// use automata_sim::prelude::*;
///
/// let dfa = DFA::builder()
///     .with_states(["q0", "q1"])
///     .with_alphabet(["0", "1"])
///     .with_edges([("q0", "0", "q0"), ("q0", "1", "q1"), ("q1", "0", "q0"), ("q1", "1", "q1")])
///     .with_final_states(["q1"])
///     .into_dfa("q0") // q0 is the initial state
///     .unwrap();
/// assert!(dfa.accepts("0101").unwrap());
/// ```
///
/// Edges labelled with the empty string or [`EPSILON`] are epsilon transitions, only [`ENFA`]s may have them.
#[derive(Clone, Debug, Default)]
pub struct AutomatonBuilder {
    states: BTreeSet<StateId>,
    symbols: Vec<Symbol>,
    edges: Vec<(StateId, Symbol, StateId)>,
    final_states: BTreeSet<StateId>,
}

impl AutomatonBuilder {
    /// Declares the given states.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Adds the given symbols to the alphabet.
    pub fn with_alphabet<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Adds edges, given as `(origin, symbol, target)` triples.
    pub fn with_edges<I, P, A, Q>(mut self, edges: I) -> Self
    where
        I: IntoIterator<Item = (P, A, Q)>,
        P: Into<StateId>,
        A: Into<Symbol>,
        Q: Into<StateId>,
    {
        self.edges.extend(
            edges
                .into_iter()
                .map(|(p, a, q)| (p.into(), a.into(), q.into())),
        );
        self
    }

    /// Adds a single edge.
    pub fn add_edge(
        &mut self,
        origin: impl Into<StateId>,
        symbol: impl Into<Symbol>,
        target: impl Into<StateId>,
    ) -> &mut Self {
        self.edges.push((origin.into(), symbol.into(), target.into()));
        self
    }

    /// Marks the given states as final.
    pub fn with_final_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateId>,
    {
        self.final_states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Builds a [`DFA`] with the given initial state. Two edges that leave the same state on the same
    /// symbol towards different targets make the automaton malformed.
    pub fn into_dfa(self, initial: impl Into<StateId>) -> Result<DFA, AutomatonError> {
        let mut transitions: Transitions<StateId> = BTreeMap::new();
        for (origin, symbol, target) in self.edges {
            let symbol = normalize(symbol);
            match transitions.entry(origin.clone()).or_default().entry(symbol) {
                Entry::Vacant(entry) => {
                    entry.insert(target);
                }
                Entry::Occupied(entry) if *entry.get() == target => {}
                Entry::Occupied(entry) => {
                    return Err(MalformedAutomaton::NonDeterministicTransition {
                        origin,
                        symbol: entry.key().clone(),
                    }
                    .into())
                }
            }
        }
        FiniteAutomaton::new(
            self.states,
            Alphabet::new(self.symbols),
            transitions,
            initial.into(),
            self.final_states,
        )
    }

    /// Builds an [`NFA`] with the given initial state, edges with the same origin and symbol are merged.
    pub fn into_nfa(self, initial: impl Into<StateId>) -> Result<NFA, AutomatonError> {
        self.into_nondeterministic(initial.into())
    }

    /// Builds an [`ENFA`] with the given initial state, edges with the same origin and symbol are merged.
    pub fn into_enfa(self, initial: impl Into<StateId>) -> Result<ENFA, AutomatonError> {
        self.into_nondeterministic(initial.into())
    }

    /// Builds an automaton of the given `kind`.
    pub fn into_automaton(
        self,
        kind: AutomatonKind,
        initial: impl Into<StateId>,
    ) -> Result<Automaton, AutomatonError> {
        Ok(match kind {
            AutomatonKind::Dfa => Automaton::Dfa(self.into_dfa(initial)?),
            AutomatonKind::Nfa => Automaton::Nfa(self.into_nfa(initial)?),
            AutomatonKind::Enfa => Automaton::Enfa(self.into_enfa(initial)?),
        })
    }

    fn into_nondeterministic<S>(self, initial: StateId) -> Result<FiniteAutomaton<S>, AutomatonError>
    where
        S: Semantics<Target = BTreeSet<StateId>>,
    {
        let mut transitions: Transitions<BTreeSet<StateId>> = BTreeMap::new();
        for (origin, symbol, target) in self.edges {
            transitions
                .entry(origin)
                .or_default()
                .entry(normalize(symbol))
                .or_default()
                .insert(target);
        }
        FiniteAutomaton::new(
            self.states,
            Alphabet::new(self.symbols),
            transitions,
            initial,
            self.final_states,
        )
    }
}

fn normalize(symbol: Symbol) -> Symbol {
    if is_epsilon(&symbol) {
        EPSILON.to_string()
    } else {
        symbol
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn conflicting_dfa_edges_are_malformed() {
        let result = AutomatonBuilder::default()
            .with_states(["p", "q"])
            .with_alphabet(["a"])
            .with_edges([("p", "a", "p"), ("p", "a", "p"), ("p", "a", "q")])
            .into_dfa("p");
        assert_eq!(
            result,
            Err(MalformedAutomaton::NonDeterministicTransition {
                origin: "p".into(),
                symbol: "a".into()
            }
            .into())
        );
    }

    #[test]
    fn declarations_are_checked() {
        let builder = AutomatonBuilder::default()
            .with_states(["p", "q"])
            .with_alphabet(["a"])
            .with_edges([("p", "a", "q")]);

        assert_eq!(
            builder.clone().into_nfa("r").unwrap_err(),
            MalformedAutomaton::UnknownInitialState("r".into()).into()
        );
        assert_eq!(
            builder.clone().with_final_states(["z"]).into_nfa("p").unwrap_err(),
            MalformedAutomaton::UnknownFinalState("z".into()).into()
        );
        assert_eq!(
            builder.clone().with_edges([("x", "a", "p")]).into_nfa("p").unwrap_err(),
            MalformedAutomaton::UnknownTransitionSource("x".into()).into()
        );
        assert_eq!(
            builder.clone().with_edges([("p", "b", "p")]).into_nfa("p").unwrap_err(),
            MalformedAutomaton::UnknownSymbol {
                origin: "p".into(),
                symbol: "b".into()
            }
            .into()
        );
        assert_eq!(
            builder.clone().with_alphabet([""]).into_enfa("p").unwrap_err(),
            MalformedAutomaton::EmptySymbol.into()
        );
        assert_eq!(
            builder.with_alphabet([EPSILON]).into_enfa("p").unwrap_err(),
            MalformedAutomaton::EpsilonInAlphabet.into()
        );
    }

    #[test]
    fn empty_and_full_final_sets_are_legal() {
        let none = AutomatonBuilder::default()
            .with_states(["p"])
            .with_alphabet(["a"])
            .into_automaton(AutomatonKind::Nfa, "p")
            .unwrap();
        assert!(none.final_states().is_empty());

        let all = AutomatonBuilder::default()
            .with_states(["p", "q"])
            .with_alphabet(["a"])
            .with_final_states(["p", "q"])
            .into_automaton(AutomatonKind::Dfa, "p")
            .unwrap();
        assert_eq!(all.final_states(), all.states());
    }

    #[test]
    fn epsilon_labels_are_normalized() {
        let mut builder = ENFA::builder().with_states(["p", "q"]).with_alphabet(["a"]);
        builder.add_edge("p", "", "q").add_edge("p", EPSILON, "p");
        let enfa = builder.into_enfa("p").unwrap();
        assert_eq!(enfa.target("p", EPSILON).map(|t| t.len()), Some(2));
        assert_eq!(enfa.target("p", ""), None);
    }
}
