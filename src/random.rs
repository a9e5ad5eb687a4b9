use std::collections::BTreeSet;

use tracing::trace;

use crate::{
    automaton::{StateId, Transitions},
    Alphabet, DFA,
};

/// The alphabet `{0, 1, ..., symbols - 1}`, at most ten symbols are supported.
fn digit_alphabet(symbols: usize) -> Alphabet {
    assert!(symbols <= 10, "Alphabet is too large");
    Alphabet::new((0..symbols).map(|i| i.to_string()))
}

/// Generates a random [`DFA`] with `size` states `q0, q1, ...` over the alphabet `{0, ..., symbols - 1}`, see
/// [`generate_random_dfa_with`].
pub fn generate_random_dfa(symbols: usize, size: usize, missing: f64) -> DFA {
    generate_random_dfa_with(&mut fastrand::Rng::new(), symbols, size, missing)
}

/// Generate a random [`DFA`] of size `size` by randomly drawing transitions from the given `rng`.
/// The algorithm is as follows:
/// 1. Start with `size` states and no transitions, `q0` is the initial state.
/// 2. For each state and each symbol, leave out the transition with probability `missing`, otherwise
///    draw a target state uniformly.
/// 3. Every state is final with probability one half.
///
/// Note that there may be unreachable states, which makes the result a good input for minimization.
pub fn generate_random_dfa_with(
    rng: &mut fastrand::Rng,
    symbols: usize,
    size: usize,
    missing: f64,
) -> DFA {
    assert!(size > 0, "A DFA needs at least one state");
    let alphabet = digit_alphabet(symbols);
    let states: BTreeSet<StateId> = (0..size).map(|i| format!("q{i}")).collect();

    let mut transitions: Transitions<StateId> = Transitions::new();
    for q in &states {
        for sym in alphabet.universe() {
            if rng.f64() < missing {
                continue;
            }
            transitions
                .entry(q.clone())
                .or_default()
                .insert(sym.clone(), format!("q{}", rng.usize(..size)));
        }
    }
    let final_states = states.iter().filter(|_| rng.bool()).cloned().collect();
    trace!("generated random DFA with {size} states");

    DFA {
        states,
        alphabet,
        transitions,
        initial: "q0".to_string(),
        final_states,
        semantics: Default::default(),
    }
}
