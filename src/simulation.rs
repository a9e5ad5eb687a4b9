use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::{
    automaton::{on_kind, Automaton, AutomatonError, FiniteAutomaton, Semantics, StateId},
    run::{Frontier, Run, RunHistory, RunPath},
    Show, DFA, ENFA, NFA,
};

/// Implementors can be run on a word, deciding whether they accept it.
pub trait Simulate {
    /// Runs `self` on `input` and returns the verdict together with a path of visited states. Rejection
    /// is an ordinary outcome, an error is only reported if a transition that is taken leads to an
    /// undeclared state.
    fn simulate(&self, input: &str) -> Result<Run, AutomatonError>;

    /// Returns only the verdict of [`Simulate::simulate`].
    fn accepts(&self, input: &str) -> Result<bool, AutomatonError> {
        Ok(self.simulate(input)?.accepted())
    }
}

impl Simulate for DFA {
    /// Reads `input` character by character. Reading stops as soon as a character is not a symbol
    /// or there is no transition for it, the word is rejected then and the path ends in the state where
    /// reading stopped.
    fn simulate(&self, input: &str) -> Result<Run, AutomatonError> {
        let mut current = &self.initial;
        let mut path = vec![current.clone()];
        let mut buf = [0u8; 4];

        for (position, chr) in input.char_indices() {
            let symbol: &str = chr.encode_utf8(&mut buf);
            if !self.alphabet.contains(symbol) {
                trace!("{symbol} at position {position} is not a symbol, rejecting");
                return Ok(Run::rejected(Some(RunPath::from(path))));
            }
            let Some(next) = self.successor(current, symbol) else {
                trace!("no transition from {current} on {symbol}, rejecting");
                return Ok(Run::rejected(Some(RunPath::from(path))));
            };
            current = next;
            path.push(current.clone());
        }

        let accepted = self.is_final(current);
        debug!("DFA ends in {current} on \"{input}\", accepted: {accepted}");
        Ok(Run::new(accepted, Some(RunPath::from(path))))
    }
}

impl Simulate for NFA {
    fn simulate(&self, input: &str) -> Result<Run, AutomatonError> {
        let start = BTreeSet::from([self.initial.clone()]);
        simulate_nondeterministic(self, start, input, |targets| {
            Ok(targets.into_iter().cloned().collect())
        })
    }
}

impl Simulate for ENFA {
    /// Works like the simulation of an [`NFA`], except that the initial state set and every set of
    /// targets are replaced by their epsilon-closure.
    fn simulate(&self, input: &str) -> Result<Run, AutomatonError> {
        let start = self.epsilon_closure([&self.initial])?;
        simulate_nondeterministic(self, start, input, |targets| self.epsilon_closure(targets))
    }
}

impl Simulate for Automaton {
    fn simulate(&self, input: &str) -> Result<Run, AutomatonError> {
        on_kind!(self, a => a.simulate(input))
    }
}

/// Reads `input` symbol by symbol, where symbols are found with [`crate::Alphabet::tokenize`]. For each symbol,
/// every active state is mapped to its targets (passed through `close`) and these individual sets are recorded
/// in a [`Frontier`] before they are merged into the new set of active states. Reading stops with a rejection
/// when no symbol matches or no state remains active, there is no backtracking over other ways of splitting
/// the input.
fn simulate_nondeterministic<S, F>(
    automaton: &FiniteAutomaton<S>,
    start: BTreeSet<StateId>,
    input: &str,
    close: F,
) -> Result<Run, AutomatonError>
where
    S: Semantics,
    F: Fn(Vec<&StateId>) -> Result<BTreeSet<StateId>, AutomatonError>,
{
    let mut active = start;
    let mut history = RunHistory::default();

    for token in automaton.alphabet.tokenize(input) {
        let symbol = match token {
            Ok(symbol) => symbol,
            Err(position) => {
                trace!("no symbol matches at position {position}, rejecting");
                return Ok(Run::rejected(None));
            }
        };

        let mut frontier = Frontier::new();
        for state in &active {
            let targets = close(automaton.declared_targets(state, symbol)?)?;
            frontier.insert(state.clone(), targets);
        }
        active = frontier.values().flatten().cloned().collect();
        trace!("read {symbol}, active states are now {}", active.show());
        history.push(frontier);

        if active.is_empty() {
            trace!("no state is active after reading {symbol}, rejecting");
            return Ok(Run::rejected(None));
        }
    }

    let accepted = active.iter().any(|q| automaton.is_final(q));
    debug!(
        "{} ends in {} on \"{input}\" after {} steps, accepted: {accepted}",
        S::KIND,
        active.show(),
        history.len()
    );
    let path = history.reconstruct(&automaton.initial, &automaton.final_states);
    Ok(Run::new(accepted, path))
}
