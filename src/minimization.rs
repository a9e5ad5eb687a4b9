mod table_filling;
pub use table_filling::TableFilling;

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::{
    automaton::{Automaton, AutomatonError, StateId, Transitions},
    math::{Map, Partition},
    Show, DFA,
};

impl DFA {
    /// Computes an equivalent DFA without unreachable states in which no two states are equivalent.
    /// First, all states that cannot be reached from the initial state are dropped. The remaining states are
    /// then compared using the table-filling algorithm, and finally each class of equivalent states is merged
    /// into its lexicographically smallest member.
    ///
    /// Missing transitions remain missing, unless some other member of the class has a transition on the
    /// symbol, in which case the merged state takes that one.
    pub fn minimize(&self) -> DFA {
        let reachable = self.reachable_states();
        debug!(
            "{} of {} states are reachable: {}",
            reachable.len(),
            self.size(),
            reachable.show()
        );

        let mut table = TableFilling::new(self, &reachable);
        let passes = table.refine();
        trace!(
            "table filling stabilized after {passes} passes\n{}",
            table.show()
        );

        self.quotient(&table.partition())
    }

    /// Merges every class of `partition` into its smallest member. The partition must consist of equivalent,
    /// reachable states and contain the initial state.
    fn quotient(&self, partition: &Partition<StateId>) -> DFA {
        let representative: Map<&StateId, &StateId> = partition
            .iter()
            .filter_map(|class| class.first().map(|rep| (class, rep)))
            .flat_map(|(class, rep)| class.iter().map(move |q| (q, rep)))
            .collect();

        let mut states = BTreeSet::new();
        let mut final_states = BTreeSet::new();
        let mut transitions: Transitions<StateId> = BTreeMap::new();
        for class in partition {
            let Some(rep) = class.first() else {
                continue;
            };
            states.insert(rep.clone());
            if class.iter().any(|q| self.is_final(q)) {
                final_states.insert(rep.clone());
            }
            for q in class {
                let Some(row) = self.transitions.get(q) else {
                    continue;
                };
                for (symbol, target) in row {
                    if let Some(target) = representative.get(target) {
                        transitions
                            .entry(rep.clone())
                            .or_default()
                            .entry(symbol.clone())
                            .or_insert_with(|| (*target).clone());
                    }
                }
            }
        }

        let initial = representative
            .get(&self.initial)
            .map_or_else(|| self.initial.clone(), |rep| (*rep).clone());
        debug!(
            "merged {} states into {}",
            representative.len(),
            states.len()
        );

        DFA {
            states,
            alphabet: self.alphabet.clone(),
            transitions,
            initial,
            final_states,
            semantics: self.semantics,
        }
    }
}

impl Automaton {
    /// Minimizes the wrapped automaton if it is a [`DFA`], see [`DFA::minimize`]. Nondeterministic
    /// automata cannot be minimized and yield [`AutomatonError::UnsupportedAutomatonKind`].
    pub fn minimize(&self) -> Result<Automaton, AutomatonError> {
        match self {
            Automaton::Dfa(dfa) => Ok(Automaton::Dfa(dfa.minimize())),
            Automaton::Nfa(_) | Automaton::Enfa(_) => Err(AutomatonError::UnsupportedAutomatonKind {
                kind: self.kind(),
                operation: "minimize",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::*};

    fn same_language(left: &DFA, right: &DFA, max_len: usize) {
        for word in binary_words(max_len) {
            assert_eq!(
                left.accepts(&word).unwrap(),
                right.accepts(&word).unwrap(),
                "disagreement on {word:?}"
            );
        }
    }

    #[test_log::test]
    fn duplicated_counters_are_merged() {
        let dfa = duplicated_counter_dfa();
        let min = dfa.minimize();
        assert_eq!(dfa.size(), 6);
        assert_eq!(min.size(), 4);
        assert_eq!(
            min.states().iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["q0", "q1", "q2", "q3"]
        );
        assert_eq!(min.initial_state(), "q0");
        assert_eq!(min.successor("q1", "0"), Some(&"q1".to_string()));
        assert_eq!(min.successor("q2", "0"), Some(&"q2".to_string()));
        assert_eq!(min.successor("q1", "1"), Some(&"q2".to_string()));
        same_language(&dfa, &min, 8);
    }

    #[test]
    fn unreachable_states_are_dropped() {
        let dfa = DFA::builder()
            .with_states(["a", "b", "island", "z"])
            .with_alphabet(["0", "1"])
            .with_edges([
                ("a", "0", "b"),
                ("a", "1", "a"),
                ("b", "0", "b"),
                ("b", "1", "a"),
                ("island", "0", "z"),
                ("z", "1", "a"),
            ])
            .with_final_states(["b", "z"])
            .into_dfa("a")
            .unwrap();
        let min = dfa.minimize();
        assert!(!min.states().contains("island"));
        assert!(!min.states().contains("z"));
        assert_eq!(min.size(), 2);
        same_language(&dfa, &min, 6);
    }

    #[test]
    fn single_class_automaton() {
        let dfa = DFA::builder()
            .with_states(["x", "y", "u"])
            .with_alphabet(["0"])
            .with_edges([("x", "0", "y"), ("y", "0", "x"), ("u", "0", "x")])
            .with_final_states(["x", "y", "u"])
            .into_dfa("y")
            .unwrap();
        let min = dfa.minimize();
        assert_eq!(min.size(), 1);
        assert_eq!(min.initial_state(), "x");
        assert!(min.is_final("x"));
        assert_eq!(min.successor("x", "0"), Some(&"x".to_string()));
    }

    #[test]
    fn partial_dfa_keeps_missing_transitions_meaningful() {
        let dfa = DFA::builder()
            .with_states(["p", "q", "r"])
            .with_alphabet(["0", "1"])
            .with_edges([("p", "0", "q"), ("p", "1", "r")])
            .with_final_states(["q", "r"])
            .into_dfa("p")
            .unwrap();
        let min = dfa.minimize();
        assert_eq!(min.size(), 2);
        assert!(!min.is_complete());
        same_language(&dfa, &min, 4);
    }

    #[test]
    fn minimization_is_idempotent() {
        let min = duplicated_counter_dfa().minimize();
        let again = min.minimize();
        assert_eq!(again.size(), min.size());
        assert_eq!(again, min);
    }

    #[test]
    fn nondeterministic_kinds_are_unsupported() {
        assert_eq!(
            Automaton::from(scenario_c_enfa()).minimize(),
            Err(AutomatonError::UnsupportedAutomatonKind {
                kind: AutomatonKind::Enfa,
                operation: "minimize"
            })
        );
        let min = Automaton::from(scenario_a_dfa()).minimize().unwrap();
        assert_eq!(min.size(), 2);
    }

    #[cfg(feature = "random")]
    #[test]
    fn random_dfas_keep_their_language() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..50 {
            let dfa = crate::random::generate_random_dfa_with(&mut rng, 2, 7, 0.2);
            let min = dfa.minimize();
            assert!(min.size() <= dfa.size());
            assert!(min.states().is_subset(&dfa.reachable_states()));
            assert_eq!(min.minimize().size(), min.size());
            same_language(&dfa, &min, 7);
        }
    }
}
