//! Library for simulating and minimizing finite automata in Rust.
//!
//! An automaton consists of a finite set of states, an alphabet, a transition function, one initial state
//! and a set of final states. The crate distinguishes three kinds of automata, which share this shape and
//! only differ in what a transition leads to: a [`DFA`] maps a state and a symbol to at most one successor,
//! an [`NFA`] maps it to a set of successors and an [`ENFA`] additionally allows transitions on the reserved
//! epsilon symbol [`alphabet::EPSILON`], which can be taken without reading any input. The tagged
//! [`Automaton`] type wraps all three kinds, such that every operation has to decide what to do for each of them.
//!
//! Symbols of an [`Alphabet`] are strings, which may consist of more than one character. Nondeterministic
//! automata read their input by repeatedly taking the shortest prefix of the remaining input that is a
//! symbol of the alphabet (see [`Alphabet::match_at`]). Note that this is not a longest-match tokenizer: over
//! the alphabet `{"0", "01"}`, the input `"01"` is split into `"0"` and `"1"`.
//!
//! The most important entry points are
//! - [`AutomatonBuilder`], which collects states, symbols and edges and validates them upon finishing,
//! - [`RawAutomaton`] together with [`validate_and_build`], which turns a structural description (as it
//!   may come from a JSON payload) into an [`Automaton`],
//! - [`Simulate`], which runs an automaton on some input and returns a [`Run`] consisting of the verdict and
//!   a sequence of visited states,
//! - [`DFA::minimize`], which computes an equivalent DFA without unreachable or equivalent states.
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_sim::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "minimize")]
    pub use super::minimization::TableFilling;
    pub use super::{
        alphabet::{self, Alphabet, Symbol, EPSILON},
        automaton::{
            Automaton, AutomatonBuilder, AutomatonError, AutomatonKind, DFASemantics,
            ENFASemantics, FiniteAutomaton, MalformedAutomaton, NFASemantics, Semantics, StateId,
            Transitions, DFA, ENFA, NFA,
        },
        description::{RawAutomaton, RawTargets},
        dot::Dottable,
        math,
        run::{Frontier, Run, RunHistory, RunPath},
        simulation::Simulate,
        Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with alphabets of multi-character symbols.
pub mod alphabet;
pub use alphabet::Alphabet;

/// Defines the three kinds of automata, the tagged [`Automaton`] and their validated construction.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::{Automaton, AutomatonBuilder, AutomatonError, DFA, ENFA, NFA};

/// Runs and the history of a nondeterministic simulation.
pub mod run;
pub use run::{Run, RunPath};

/// Acceptance checking for every kind of automaton.
pub mod simulation;
pub use simulation::Simulate;

/// The structural description of an automaton, as it is handed over by an outer layer.
pub mod description;
pub use description::RawAutomaton;

/// Output in the graphviz DOT format.
pub mod dot;

/// Contains the table-filling minimization of deterministic automata. This is feature gated behind the
/// `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

/// Implements the generation of random deterministic automata.
#[cfg(feature = "random")]
pub mod random;

use std::collections::BTreeSet;

use itertools::Itertools;

/// Checks the given description for consistency and turns it into an [`Automaton`] of the described kind.
pub fn validate_and_build(raw: RawAutomaton) -> Result<Automaton, AutomatonError> {
    raw.build()
}

/// Runs `automaton` on `input`, see [`Simulate::simulate`].
pub fn simulate(automaton: &Automaton, input: &str) -> Result<Run, AutomatonError> {
    automaton.simulate(input)
}

/// Minimizes `automaton`, which fails with [`AutomatonError::UnsupportedAutomatonKind`] if it is not a [`DFA`].
#[cfg(feature = "minimize")]
pub fn minimize(automaton: &Automaton) -> Result<Automaton, AutomatonError> {
    automaton.minimize()
}

/// Helper trait which can be used to display states, sets of states and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that should be its label,
    /// for a set of states something like {q0, q1}.
    fn show(&self) -> String;
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl<S: Show> Show for BTreeSet<S> {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().map(Show::show).join(", "))
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        format!("[{}]", self.iter().map(Show::show).join(", "))
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
