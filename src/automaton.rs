use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{Debug, Display},
};

use itertools::Itertools;
use tracing::debug;

use crate::{
    alphabet::{Alphabet, Symbol, EPSILON},
    math::Set,
    Show,
};

mod builder;
pub use builder::AutomatonBuilder;

mod error;
pub use error::{AutomatonError, MalformedAutomaton};

mod dfa;
pub use dfa::{DFASemantics, DFA};

mod nfa;
pub use nfa::{NFASemantics, NFA};

mod enfa;
pub use enfa::{ENFASemantics, ENFA};

/// States are identified by opaque labels. Labels are compared lexicographically wherever a
/// canonical choice between states has to be made.
pub type StateId = String;

/// The transition function of an automaton, mapping a state and a symbol to some target. Pairs
/// without an entry have no transition.
pub type Transitions<T> = BTreeMap<StateId, BTreeMap<Symbol, T>>;

/// Names the three kinds of automata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AutomatonKind {
    /// Deterministic finite automaton.
    #[cfg_attr(feature = "serde", serde(rename = "DFA"))]
    Dfa,
    /// Nondeterministic finite automaton.
    #[cfg_attr(feature = "serde", serde(rename = "NFA"))]
    Nfa,
    /// Nondeterministic finite automaton with epsilon transitions.
    #[cfg_attr(feature = "serde", serde(rename = "ENFA"))]
    Enfa,
}

impl Display for AutomatonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AutomatonKind::Dfa => "DFA",
            AutomatonKind::Nfa => "NFA",
            AutomatonKind::Enfa => "ENFA",
        };
        write!(f, "{name}")
    }
}

/// Determines what a transition of a [`FiniteAutomaton`] leads to and which additional structural
/// requirements the automaton has to satisfy.
pub trait Semantics: Clone + Copy + Default + Debug + Eq {
    /// What a state and a symbol are mapped to, either a single state or a set of states.
    type Target: Clone + Debug + Eq;
    /// The kind of automaton this describes.
    const KIND: AutomatonKind;
    /// Whether transitions on [`EPSILON`] are allowed.
    const EPSILON_TRANSITIONS: bool;

    /// Iterates over the states contained in a target.
    fn targets(target: &Self::Target) -> impl Iterator<Item = &StateId> + '_;

    /// Checks the requirements that are specific to the kind of automaton. The checks that are
    /// common to all kinds have already been performed when this is called.
    fn validate(_automaton: &FiniteAutomaton<Self>) -> Result<(), MalformedAutomaton> {
        Ok(())
    }
}

/// A finite automaton with the shape that all kinds share. The [`Semantics`] determine the kind,
/// usually one of the aliases [`DFA`], [`NFA`] or [`ENFA`] is used.
///
/// Values can only be obtained through validated construction, after which they are immutable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FiniteAutomaton<S: Semantics> {
    pub(crate) states: BTreeSet<StateId>,
    pub(crate) alphabet: Alphabet,
    pub(crate) transitions: Transitions<S::Target>,
    pub(crate) initial: StateId,
    pub(crate) final_states: BTreeSet<StateId>,
    pub(crate) semantics: S,
}

impl<S: Semantics> FiniteAutomaton<S> {
    /// Creates an empty [`AutomatonBuilder`].
    pub fn builder() -> AutomatonBuilder {
        AutomatonBuilder::default()
    }

    /// Assembles an automaton from its parts and checks that they fit together. Fails with
    /// [`AutomatonError::MalformedAutomaton`] if some state or symbol is used without being declared.
    pub fn new(
        states: BTreeSet<StateId>,
        alphabet: Alphabet,
        transitions: Transitions<S::Target>,
        initial: StateId,
        final_states: BTreeSet<StateId>,
    ) -> Result<Self, AutomatonError> {
        let automaton = Self {
            states,
            alphabet,
            transitions,
            initial,
            final_states,
            semantics: S::default(),
        };
        automaton.validate()?;
        debug!(
            "built {} with {} states over {}",
            S::KIND,
            automaton.size(),
            automaton.alphabet.show()
        );
        Ok(automaton)
    }

    fn validate(&self) -> Result<(), MalformedAutomaton> {
        if !self.states.contains(&self.initial) {
            return Err(MalformedAutomaton::UnknownInitialState(self.initial.clone()));
        }
        if let Some(q) = self.final_states.iter().find(|q| !self.states.contains(*q)) {
            return Err(MalformedAutomaton::UnknownFinalState(q.clone()));
        }
        for symbol in self.alphabet.universe() {
            if symbol.is_empty() {
                return Err(MalformedAutomaton::EmptySymbol);
            }
            if symbol == EPSILON {
                return Err(MalformedAutomaton::EpsilonInAlphabet);
            }
        }
        for (origin, row) in &self.transitions {
            if !self.states.contains(origin) {
                return Err(MalformedAutomaton::UnknownTransitionSource(origin.clone()));
            }
            for symbol in row.keys() {
                if symbol == EPSILON {
                    if !S::EPSILON_TRANSITIONS {
                        return Err(MalformedAutomaton::EpsilonTransition {
                            kind: S::KIND,
                            origin: origin.clone(),
                        });
                    }
                } else if !self.alphabet.contains(symbol) {
                    return Err(MalformedAutomaton::UnknownSymbol {
                        origin: origin.clone(),
                        symbol: symbol.clone(),
                    });
                }
            }
        }
        S::validate(self)
    }

    /// The kind of `self`.
    pub fn kind(&self) -> AutomatonKind {
        S::KIND
    }

    /// Gives a reference to the semantics.
    pub fn semantics(&self) -> &S {
        &self.semantics
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// All declared states in lexicographic order.
    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    /// The alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The transition function.
    pub fn transitions(&self) -> &Transitions<S::Target> {
        &self.transitions
    }

    /// The initial state.
    pub fn initial_state(&self) -> &StateId {
        &self.initial
    }

    /// The final (accepting) states.
    pub fn final_states(&self) -> &BTreeSet<StateId> {
        &self.final_states
    }

    /// Returns `true` if `state` is final.
    pub fn is_final(&self, state: &str) -> bool {
        self.final_states.contains(state)
    }

    /// Looks up where `state` leads on `symbol`, `None` means that there is no transition.
    pub fn target(&self, state: &str, symbol: &str) -> Option<&S::Target> {
        self.transitions.get(state).and_then(|row| row.get(symbol))
    }

    /// Iterates over all edges `(origin, symbol, target)`, where every state of a nondeterministic
    /// target yields its own edge.
    pub fn edges(&self) -> impl Iterator<Item = (&StateId, &Symbol, &StateId)> + '_ {
        self.transitions.iter().flat_map(|(origin, row)| {
            row.iter()
                .flat_map(move |(symbol, target)| S::targets(target).map(move |q| (origin, symbol, q)))
        })
    }

    /// Collects the targets of `origin` on `symbol`, failing with
    /// [`AutomatonError::InconsistentTransition`] if one of them is not a declared state.
    pub(crate) fn declared_targets(
        &self,
        origin: &str,
        symbol: &str,
    ) -> Result<Vec<&StateId>, AutomatonError> {
        let Some(target) = self.target(origin, symbol) else {
            return Ok(vec![]);
        };
        S::targets(target)
            .map(|q| {
                if self.states.contains(q) {
                    Ok(q)
                } else {
                    Err(AutomatonError::InconsistentTransition {
                        origin: origin.to_string(),
                        symbol: symbol.to_string(),
                        target: q.clone(),
                    })
                }
            })
            .collect()
    }

    /// Computes the set of states that can be reached from the initial state by a depth-first
    /// traversal along all transitions.
    pub fn reachable_states(&self) -> BTreeSet<StateId> {
        let mut seen: Set<&StateId> = Set::default();
        seen.insert(&self.initial);
        let mut stack = vec![&self.initial];
        while let Some(q) = stack.pop() {
            let Some(row) = self.transitions.get(q) else {
                continue;
            };
            for p in row.values().flat_map(|target| S::targets(target)) {
                if seen.insert(p) {
                    stack.push(p);
                }
            }
        }
        seen.into_iter().cloned().collect()
    }

    /// Returns a string representation of the transition table. Every state has one row, which
    /// starts with the state (prefixed by `→` if it is initial and `*` if it is final). Missing
    /// transitions are shown as `-`.
    pub fn transition_table(&self) -> String {
        let symbols = self
            .alphabet
            .universe()
            .map(|sym| sym.as_str())
            .chain(S::EPSILON_TRANSITIONS.then_some(EPSILON))
            .collect_vec();

        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(symbols.iter().map(|s| s.to_string())),
        );
        for q in &self.states {
            let mut row = vec![format!(
                "{}{}{}",
                if *q == self.initial { "→" } else { "" },
                if self.is_final(q) { "*" } else { "" },
                q
            )];
            for sym in &symbols {
                row.push(match self.target(q, sym) {
                    Some(target) => S::targets(target).join(", "),
                    None => "-".to_string(),
                });
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

/// An automaton of any of the three kinds. Every operation matches on the kind exhaustively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Automaton {
    /// A deterministic automaton.
    Dfa(DFA),
    /// A nondeterministic automaton.
    Nfa(NFA),
    /// A nondeterministic automaton with epsilon transitions.
    Enfa(ENFA),
}

/// Evaluates `$body` with `$inner` bound to the automaton wrapped by each variant.
macro_rules! on_kind {
    ($automaton:expr, $inner:ident => $body:expr) => {
        match $automaton {
            $crate::automaton::Automaton::Dfa($inner) => $body,
            $crate::automaton::Automaton::Nfa($inner) => $body,
            $crate::automaton::Automaton::Enfa($inner) => $body,
        }
    };
}
pub(crate) use on_kind;

impl Automaton {
    /// The kind of the wrapped automaton.
    pub fn kind(&self) -> AutomatonKind {
        on_kind!(self, a => a.kind())
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        on_kind!(self, a => a.size())
    }

    /// All declared states.
    pub fn states(&self) -> &BTreeSet<StateId> {
        on_kind!(self, a => a.states())
    }

    /// The alphabet.
    pub fn alphabet(&self) -> &Alphabet {
        on_kind!(self, a => a.alphabet())
    }

    /// The initial state.
    pub fn initial_state(&self) -> &StateId {
        on_kind!(self, a => a.initial_state())
    }

    /// The final states.
    pub fn final_states(&self) -> &BTreeSet<StateId> {
        on_kind!(self, a => a.final_states())
    }

    /// All edges `(origin, symbol, target)`, epsilon edges are labelled with [`EPSILON`].
    pub fn edges(&self) -> Vec<(&StateId, &Symbol, &StateId)> {
        on_kind!(self, a => a.edges().collect())
    }

    /// See [`FiniteAutomaton::transition_table`].
    pub fn transition_table(&self) -> String {
        on_kind!(self, a => a.transition_table())
    }

    /// Returns the wrapped [`DFA`], if `self` is deterministic.
    pub fn as_dfa(&self) -> Option<&DFA> {
        match self {
            Automaton::Dfa(dfa) => Some(dfa),
            Automaton::Nfa(_) | Automaton::Enfa(_) => None,
        }
    }
}

impl From<DFA> for Automaton {
    fn from(value: DFA) -> Self {
        Automaton::Dfa(value)
    }
}

impl From<NFA> for Automaton {
    fn from(value: NFA) -> Self {
        Automaton::Nfa(value)
    }
}

impl From<ENFA> for Automaton {
    fn from(value: ENFA) -> Self {
        Automaton::Enfa(value)
    }
}
