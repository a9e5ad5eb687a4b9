use thiserror::Error;

use super::{AutomatonKind, StateId};
use crate::alphabet::Symbol;

/// Abstracts the errors that operations on automata can report. Rejecting an input is not an
/// error, it is the ordinary outcome of a [`crate::Run`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AutomatonError {
    /// The parts of an automaton do not fit together.
    #[error("malformed automaton: {0}")]
    MalformedAutomaton(#[from] MalformedAutomaton),
    /// A transition that is taken during a simulation leads to a state that was never declared.
    #[error("transition from `{origin}` on `{symbol}` leads to undeclared state `{target}`")]
    InconsistentTransition {
        /// The state the transition starts in.
        origin: StateId,
        /// The symbol that was read.
        symbol: Symbol,
        /// The undeclared target.
        target: StateId,
    },
    /// The operation does not exist for this kind of automaton.
    #[error("cannot {operation} an automaton of kind {kind}")]
    UnsupportedAutomatonKind {
        /// The kind the operation was attempted on.
        kind: AutomatonKind,
        /// Name of the operation.
        operation: &'static str,
    },
}

/// Names the structural requirement that a malformed automaton violates.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[allow(missing_docs)]
pub enum MalformedAutomaton {
    #[error("initial state `{0}` is not a declared state")]
    UnknownInitialState(StateId),
    #[error("final state `{0}` is not a declared state")]
    UnknownFinalState(StateId),
    #[error("transition source `{0}` is not a declared state")]
    UnknownTransitionSource(StateId),
    #[error("transition from `{origin}` on `{symbol}` targets undeclared state `{target}`")]
    UnknownTransitionTarget {
        origin: StateId,
        symbol: Symbol,
        target: StateId,
    },
    #[error("transition from `{origin}` uses symbol `{symbol}`, which is not in the alphabet")]
    UnknownSymbol { origin: StateId, symbol: Symbol },
    #[error("alphabet contains the empty symbol")]
    EmptySymbol,
    #[error("alphabet contains the reserved epsilon symbol")]
    EpsilonInAlphabet,
    #[error("{kind} cannot have epsilon transitions, but `{origin}` has one")]
    EpsilonTransition { kind: AutomatonKind, origin: StateId },
    #[error("symbol `{0}` of a DFA consists of more than one character")]
    MultiCharacterSymbol(Symbol),
    #[error("DFA has more than one target from `{origin}` on `{symbol}`")]
    NonDeterministicTransition { origin: StateId, symbol: Symbol },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_parts() {
        let err = AutomatonError::from(MalformedAutomaton::UnknownInitialState("q9".into()));
        assert_eq!(
            err.to_string(),
            "malformed automaton: initial state `q9` is not a declared state"
        );
        let err = AutomatonError::UnsupportedAutomatonKind {
            kind: AutomatonKind::Nfa,
            operation: "minimize",
        };
        assert_eq!(err.to_string(), "cannot minimize an automaton of kind NFA");
    }
}
